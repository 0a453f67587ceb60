// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for opening, closing and listing slots.

use bandbook_domain::SlotTime;
use bandbook_persistence::Persistence;

use super::helpers::{
    SLOT, create_requested_engagement, open, register, request, setup_test_persistence,
};
use crate::{
    ApiError, AvailabilityResponse, Credentials, OpenSlotRequest, WriteResponse, close_slot,
    list_band_availability, open_slot,
};

fn band_id(persistence: &mut Persistence, username: &str) -> i64 {
    persistence
        .get_principal_by_username(bandbook_domain::PrincipalKind::Band, username)
        .unwrap()
        .unwrap()
        .principal_id
}

#[test]
fn test_open_slot_stores_canonical_datetime() {
    let mut persistence = setup_test_persistence();
    let band: Credentials = register(&mut persistence, "band", "the-band");

    let request: OpenSlotRequest = OpenSlotRequest {
        credentials: band,
        datetime: String::from("2099-06-01 20:00"),
    };
    let response: WriteResponse = open_slot(&mut persistence, &request).unwrap();

    let engagement = persistence
        .get_engagement(response.engagement_id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(engagement.event_datetime, SLOT);
    assert_eq!(engagement.status, "open");
}

#[test]
fn test_open_slot_in_the_past_creates_nothing() {
    let mut persistence = setup_test_persistence();
    let band: Credentials = register(&mut persistence, "band", "the-band");

    let request: OpenSlotRequest = OpenSlotRequest {
        credentials: band,
        datetime: String::from("2000-01-01T10:00:00"),
    };
    let result = open_slot(&mut persistence, &request);

    assert!(matches!(
        result,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "datetime"
    ));
    let id: i64 = band_id(&mut persistence, "the-band");
    assert!(persistence.list_open_slots(id, None).unwrap().is_empty());
}

#[test]
fn test_open_slot_rejects_malformed_datetime() {
    let mut persistence = setup_test_persistence();
    let band: Credentials = register(&mut persistence, "band", "the-band");

    let request: OpenSlotRequest = OpenSlotRequest {
        credentials: band,
        datetime: String::from("next friday"),
    };

    assert!(matches!(
        open_slot(&mut persistence, &request),
        Err(ApiError::InvalidInput { .. })
    ));
}

#[test]
fn test_open_slot_requires_band_credentials() {
    let mut persistence = setup_test_persistence();
    let user: Credentials = register(&mut persistence, "user", "the-user");

    let request: OpenSlotRequest = OpenSlotRequest {
        credentials: user,
        datetime: SLOT.to_string(),
    };

    assert!(matches!(
        open_slot(&mut persistence, &request),
        Err(ApiError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_open_same_instant_twice_conflicts() {
    let mut persistence = setup_test_persistence();
    let band: Credentials = register(&mut persistence, "band", "the-band");
    open(&mut persistence, &band, SLOT);

    let request: OpenSlotRequest = OpenSlotRequest {
        credentials: band,
        datetime: String::from("2099-06-01T20:00"),
    };

    assert!(matches!(
        open_slot(&mut persistence, &request),
        Err(ApiError::Conflict { .. })
    ));
}

#[test]
fn test_two_bands_may_share_an_instant() {
    let mut persistence = setup_test_persistence();
    let first: Credentials = register(&mut persistence, "band", "first-band");
    let second: Credentials = register(&mut persistence, "band", "second-band");

    let a: i64 = open(&mut persistence, &first, SLOT);
    let b: i64 = open(&mut persistence, &second, SLOT);

    assert_ne!(a, b);
}

#[test]
fn test_close_slot_then_reopen() {
    let mut persistence = setup_test_persistence();
    let band: Credentials = register(&mut persistence, "band", "the-band");
    let engagement_id: i64 = open(&mut persistence, &band, SLOT);

    close_slot(&mut persistence, engagement_id, &band).unwrap();

    assert!(persistence.get_engagement(engagement_id).unwrap().is_none());
    let reopened: i64 = open(&mut persistence, &band, SLOT);
    assert_ne!(reopened, engagement_id);
}

#[test]
fn test_close_missing_slot_is_not_found() {
    let mut persistence = setup_test_persistence();
    let band: Credentials = register(&mut persistence, "band", "the-band");

    assert!(matches!(
        close_slot(&mut persistence, 4242, &band),
        Err(ApiError::NotFound { .. })
    ));
}

#[test]
fn test_close_other_bands_slot_is_forbidden() {
    let mut persistence = setup_test_persistence();
    let owner: Credentials = register(&mut persistence, "band", "the-band");
    let rival: Credentials = register(&mut persistence, "band", "rival-band");
    let engagement_id: i64 = open(&mut persistence, &owner, SLOT);

    assert!(matches!(
        close_slot(&mut persistence, engagement_id, &rival),
        Err(ApiError::Forbidden { .. })
    ));
    assert!(persistence.get_engagement(engagement_id).unwrap().is_some());
}

#[test]
fn test_close_requested_slot_is_invalid_state() {
    let mut persistence = setup_test_persistence();
    let booked = create_requested_engagement(&mut persistence);

    let result = close_slot(&mut persistence, booked.engagement_id, &booked.band);

    assert!(matches!(result, Err(ApiError::InvalidState { .. })));
    let engagement = persistence
        .get_engagement(booked.engagement_id)
        .unwrap()
        .unwrap();
    assert_eq!(engagement.status, "requested");
}

#[test]
fn test_availability_lists_only_open_future_slots() {
    let mut persistence = setup_test_persistence();
    let band: Credentials = register(&mut persistence, "band", "the-band");
    let user: Credentials = register(&mut persistence, "user", "the-user");
    let id: i64 = band_id(&mut persistence, "the-band");

    persistence
        .insert_open_slot(id, &SlotTime::parse("2001-01-01T12:00:00").unwrap(), "seed")
        .unwrap();
    let later: i64 = open(&mut persistence, &band, "2099-09-01T18:00:00");
    let earlier: i64 = open(&mut persistence, &band, "2099-07-01T18:00:00");
    open(&mut persistence, &band, SLOT);
    request(&mut persistence, &user, "the-band", SLOT).unwrap();

    let response: AvailabilityResponse =
        list_band_availability(&mut persistence, "the-band").unwrap();

    assert_eq!(response.display_name, "Display the-band");
    let ids: Vec<i64> = response.slots.iter().map(|s| s.engagement_id).collect();
    assert_eq!(ids, vec![earlier, later]);
    assert_eq!(response.slots[0].datetime, "2099-07-01T18:00:00");
}

#[test]
fn test_availability_for_unknown_band() {
    let mut persistence = setup_test_persistence();

    assert!(matches!(
        list_band_availability(&mut persistence, "ghost"),
        Err(ApiError::NotFound { .. })
    ));
}
