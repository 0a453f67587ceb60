// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bandbook_domain::{Decision, EventDetails, SlotTime};

/// A command represents caller intent as data only.
///
/// Commands are the only way to request engagement changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Publish availability for a band at a slot time.
    OpenSlot {
        /// The owning band.
        band_id: i64,
        /// The slot being offered.
        slot: SlotTime,
    },
    /// Withdraw an unclaimed slot.
    CloseSlot {
        /// The engagement to remove.
        engagement_id: i64,
    },
    /// Claim a band's open slot for an event.
    RequestSlot {
        /// The band whose slot is claimed.
        band_id: i64,
        /// The slot being claimed.
        slot: SlotTime,
        /// The requesting user.
        user_id: i64,
        /// What the user is booking.
        details: EventDetails,
    },
    /// Accept or decline a pending request.
    Decide {
        /// The engagement being decided.
        engagement_id: i64,
        /// The band's verdict.
        decision: Decision,
    },
    /// Mark a confirmed engagement as performed.
    Complete {
        /// The engagement to complete.
        engagement_id: i64,
    },
    /// Call off a confirmed engagement.
    Cancel {
        /// The engagement to cancel.
        engagement_id: i64,
    },
}

impl Command {
    /// A stable name for logging and error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenSlot { .. } => "open_slot",
            Self::CloseSlot { .. } => "close_slot",
            Self::RequestSlot { .. } => "request_slot",
            Self::Decide { .. } => "decide",
            Self::Complete { .. } => "complete",
            Self::Cancel { .. } => "cancel",
        }
    }
}
