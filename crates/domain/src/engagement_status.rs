// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engagement lifecycle states and transition rules.
//!
//! An engagement starts `open` when a band publishes availability and
//! moves forward only:
//!
//! ```text
//! open -> requested -> confirmed -> completed
//!              |            |
//!              v            v
//!          rejected     cancelled
//! ```
//!
//! Removing an open slot deletes the row and is not a status transition.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle status of an engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStatus {
    /// Published availability, not yet claimed by a user.
    Open,
    /// Claimed by a user and awaiting the band's decision.
    Requested,
    /// Accepted by the band.
    Confirmed,
    /// Declined by the band. Terminal for this row.
    Rejected,
    /// Performed and counted for accounting.
    Completed,
    /// Called off after confirmation.
    Cancelled,
}

impl EngagementStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Open,
        Self::Requested,
        Self::Confirmed,
        Self::Rejected,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Requested => "requested",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns true if no workflow transition leaves this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Cancelled)
    }

    /// Returns true if the engagement still occupies its band's time slot.
    ///
    /// At most one active engagement may exist per band and slot time.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::Requested | Self::Confirmed)
    }

    /// Checks whether the lifecycle has an edge from this status to `target`.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Requested)
                | (Self::Requested, Self::Confirmed | Self::Rejected)
                | (Self::Confirmed, Self::Completed | Self::Cancelled)
        )
    }

    /// Validates a transition from this status to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if this status is
    /// terminal or the lifecycle has no such edge.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: String::from("engagement is already in a terminal state"),
            });
        }

        if !self.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: target.as_str().to_string(),
                reason: String::from("transition not permitted by the engagement lifecycle"),
            });
        }

        Ok(())
    }
}

impl FromStr for EngagementStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "requested" => Ok(Self::Requested),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidEngagementStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for EngagementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A band's verdict on a requested engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Accept the request.
    Confirmed,
    /// Decline the request.
    Rejected,
}

impl Decision {
    /// The status an engagement moves to under this decision.
    #[must_use]
    pub const fn target_status(&self) -> EngagementStatus {
        match self {
            Self::Confirmed => EngagementStatus::Confirmed,
            Self::Rejected => EngagementStatus::Rejected,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for Decision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidDecision(s.to_string())),
        }
    }
}
