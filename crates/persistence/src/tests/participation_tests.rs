// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bandbook_domain::Role;

use super::{ACTOR, create_requested_engagement, create_test_band, create_test_user, slot};
use crate::Persistence;

#[test]
fn test_parties_are_participants_in_their_roles() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (band_id, user_id, engagement_id) = create_requested_engagement(&mut persistence);

    assert!(persistence.is_participant(engagement_id, Role::Band, band_id).unwrap());
    assert!(persistence.is_participant(engagement_id, Role::User, user_id).unwrap());
}

#[test]
fn test_role_must_match_side() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (band_id, user_id, engagement_id) = create_requested_engagement(&mut persistence);

    assert!(!persistence.is_participant(engagement_id, Role::User, band_id).unwrap());
    assert!(!persistence.is_participant(engagement_id, Role::Band, user_id).unwrap());
}

#[test]
fn test_stranger_is_not_participant() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (_, _, engagement_id) = create_requested_engagement(&mut persistence);
    let stranger: i64 = create_test_user(&mut persistence, "stranger");

    assert!(!persistence.is_participant(engagement_id, Role::User, stranger).unwrap());
}

#[test]
fn test_open_slot_has_no_user_participant() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let band_id: i64 = create_test_band(&mut persistence, "band");
    let user_id: i64 = create_test_user(&mut persistence, "user");
    let engagement_id: i64 = persistence
        .insert_open_slot(band_id, &slot("2099-06-01T20:00:00"), ACTOR)
        .unwrap();

    assert!(persistence.is_participant(engagement_id, Role::Band, band_id).unwrap());
    assert!(!persistence.is_participant(engagement_id, Role::User, user_id).unwrap());
}

#[test]
fn test_missing_engagement_has_no_participants() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let band_id: i64 = create_test_band(&mut persistence, "band");

    assert!(!persistence.is_participant(404, Role::Band, band_id).unwrap());
}

#[test]
fn test_list_engagements_for_each_side() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (band_id, user_id, engagement_id) = create_requested_engagement(&mut persistence);
    persistence
        .insert_open_slot(band_id, &slot("2099-09-01T20:00:00"), ACTOR)
        .unwrap();

    let band_rows = persistence.list_engagements_for(Role::Band, band_id).unwrap();
    let user_rows = persistence.list_engagements_for(Role::User, user_id).unwrap();

    assert_eq!(band_rows.len(), 2);
    assert_eq!(user_rows.len(), 1);
    assert_eq!(user_rows[0].engagement_id, engagement_id);
}
