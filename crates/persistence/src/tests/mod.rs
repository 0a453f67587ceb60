// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod participation_tests;

use bandbook::Transition;
use bandbook_domain::{EngagementStatus, PrincipalKind, SlotTime};

use crate::{Persistence, SlotClaim};

pub const ACTOR: &str = "test-actor";

pub fn create_test_band(persistence: &mut Persistence, username: &str) -> i64 {
    create_test_band_in(persistence, username, "Lisbon")
}

pub fn create_test_band_in(persistence: &mut Persistence, username: &str, city: &str) -> i64 {
    persistence
        .create_principal(
            PrincipalKind::Band,
            username,
            "Test Band",
            "band-password-1",
            Some(city),
        )
        .unwrap()
}

pub fn create_test_user(persistence: &mut Persistence, username: &str) -> i64 {
    persistence
        .create_principal(
            PrincipalKind::User,
            username,
            "Test User",
            "user-password-1",
            None,
        )
        .unwrap()
}

pub fn slot(value: &str) -> SlotTime {
    SlotTime::parse(value).unwrap()
}

pub fn create_test_claim(user_id: i64) -> SlotClaim {
    SlotClaim {
        user_id,
        price: 2000,
        category: String::from("wedding"),
        description: String::from("Evening reception"),
        city: String::from("Lisbon"),
        address: String::from("Rua Augusta 1"),
        latitude: Some(38.71),
        longitude: Some(-9.14),
    }
}

pub const fn step(from: EngagementStatus, to: EngagementStatus) -> Transition {
    Transition {
        from,
        to,
        clears_decision: matches!(from, EngagementStatus::Requested),
    }
}

/// Opens a slot and claims it, returning `(band_id, user_id, engagement_id)`.
pub fn create_requested_engagement(persistence: &mut Persistence) -> (i64, i64, i64) {
    let band_id: i64 = create_test_band(persistence, "the-band");
    let user_id: i64 = create_test_user(persistence, "the-user");
    let at: SlotTime = slot("2099-06-01T20:00:00");

    persistence.insert_open_slot(band_id, &at, ACTOR).unwrap();
    let engagement_id: i64 = persistence
        .claim_open_slot(band_id, &at, &create_test_claim(user_id), ACTOR)
        .unwrap()
        .unwrap();

    (band_id, user_id, engagement_id)
}
