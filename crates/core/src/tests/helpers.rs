// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Command;
use bandbook_domain::{Decision, EventDetails, SlotTime};

pub const BAND_ID: i64 = 10;
pub const USER_ID: i64 = 20;
pub const ENGAGEMENT_ID: i64 = 1;

pub fn create_test_slot() -> SlotTime {
    SlotTime::parse("2099-01-01T20:00").unwrap()
}

pub fn create_test_details(category: &str) -> EventDetails {
    EventDetails::new(category, "First dance at nine", "Athens", "Ermou 1").unwrap()
}

pub fn open_slot() -> Command {
    Command::OpenSlot {
        band_id: BAND_ID,
        slot: create_test_slot(),
    }
}

pub fn request_slot() -> Command {
    Command::RequestSlot {
        band_id: BAND_ID,
        slot: create_test_slot(),
        user_id: USER_ID,
        details: create_test_details("wedding"),
    }
}

pub fn decide(decision: Decision) -> Command {
    Command::Decide {
        engagement_id: ENGAGEMENT_ID,
        decision,
    }
}

pub fn close_slot() -> Command {
    Command::CloseSlot {
        engagement_id: ENGAGEMENT_ID,
    }
}

pub fn complete() -> Command {
    Command::Complete {
        engagement_id: ENGAGEMENT_ID,
    }
}

pub fn cancel() -> Command {
    Command::Cancel {
        engagement_id: ENGAGEMENT_ID,
    }
}
