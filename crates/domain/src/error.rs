// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Username is empty or malformed.
    InvalidUsername(String),
    /// Display name is empty or too long.
    InvalidDisplayName(String),
    /// Principal kind is not one of the known kinds.
    InvalidPrincipalKind(String),
    /// Engagement role is not `band` or `user`.
    InvalidRole(String),
    /// The stored or supplied engagement status is unknown.
    InvalidEngagementStatus(String),
    /// A decision other than `confirmed` or `rejected` was supplied.
    InvalidDecision(String),
    /// A status transition is not permitted by the lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// Failed to parse a slot date/time.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// The slot date/time is not strictly in the future.
    SlotNotInFuture {
        /// The canonical slot value.
        slot: String,
    },
    /// A required event detail is missing or too long.
    InvalidEventDetail {
        /// The offending field.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// Latitude or longitude is out of range.
    InvalidCoordinates {
        /// The latitude supplied.
        latitude: String,
        /// The longitude supplied.
        longitude: String,
    },
    /// Message body is empty or too long.
    InvalidMessage(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUsername(msg) => write!(f, "Invalid username: {msg}"),
            Self::InvalidDisplayName(msg) => write!(f, "Invalid display name: {msg}"),
            Self::InvalidPrincipalKind(kind) => {
                write!(
                    f,
                    "Invalid principal kind: '{kind}'. Must be 'band', 'user' or 'admin'"
                )
            }
            Self::InvalidRole(role) => {
                write!(f, "Invalid role: '{role}'. Must be 'band' or 'user'")
            }
            Self::InvalidEngagementStatus(status) => {
                write!(f, "Invalid engagement status: '{status}'")
            }
            Self::InvalidDecision(decision) => {
                write!(
                    f,
                    "Invalid decision: '{decision}'. Must be 'confirmed' or 'rejected'"
                )
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition from '{from}' to '{to}': {reason}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::SlotNotInFuture { slot } => {
                write!(f, "Invalid date {slot}. Must be a valid future date")
            }
            Self::InvalidEventDetail { field, reason } => {
                write!(f, "Invalid {field}: {reason}")
            }
            Self::InvalidCoordinates {
                latitude,
                longitude,
            } => {
                write!(f, "Coordinates out of range: lat={latitude}, lon={longitude}")
            }
            Self::InvalidMessage(msg) => write!(f, "Invalid message: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
