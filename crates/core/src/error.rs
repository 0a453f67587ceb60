// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bandbook_domain::{DomainError, EngagementStatus};

/// Errors produced by the booking workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated (malformed or out-of-range input).
    DomainViolation(DomainError),
    /// No engagement or slot matches the request.
    NotFound(String),
    /// The slot is held by another engagement or a racing request won it.
    Conflict(String),
    /// The engagement's current status does not allow the action.
    InvalidState {
        /// The attempted action.
        action: &'static str,
        /// The status the engagement was found in.
        status: EngagementStatus,
    },
    /// The caller is not the party the action requires.
    Forbidden {
        /// The attempted action.
        action: &'static str,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::InvalidState { action, status } => {
                write!(f, "Cannot {action}: engagement is {status}")
            }
            Self::Forbidden { action } => {
                write!(f, "Forbidden: caller may not {action} this engagement")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
