// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bandbook_domain::{EngagementStatus, Role};

/// The parts of a stored engagement the workflow decides on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementSnapshot {
    /// The engagement identifier.
    pub engagement_id: i64,
    /// The performing band.
    pub band_id: i64,
    /// The requesting user, absent while the engagement is open.
    pub user_id: Option<i64>,
    /// The current status.
    pub status: EngagementStatus,
}

impl EngagementSnapshot {
    /// Returns true if `principal_id` is the party acting in `role`.
    ///
    /// This is the identity check behind both the authorization guard and
    /// the participation index. An open engagement has no user party.
    #[must_use]
    pub fn is_party(&self, principal_id: i64, role: Role) -> bool {
        match role {
            Role::Band => self.band_id == principal_id,
            Role::User => self.user_id == Some(principal_id),
        }
    }
}

/// A single status change the store must apply conditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The status the write must still observe.
    pub from: EngagementStatus,
    /// The status the write installs.
    pub to: EngagementStatus,
    /// Whether the decision column is cleared.
    pub clears_decision: bool,
}

/// What the store should do for a command against an engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Apply the transition with `WHERE status = from`.
    Apply(Transition),
    /// Delete the row with `WHERE status = 'open'`.
    Remove,
    /// Nothing to do; the engagement already reached a terminal status.
    NoOp {
        /// The terminal status observed.
        status: EngagementStatus,
    },
}
