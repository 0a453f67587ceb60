// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use bandbook::CoreError;
use bandbook_domain::DomainError;
use bandbook_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Credentials did not resolve to a principal.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller is not the party the action requires.
    Forbidden {
        /// The action that was attempted.
        action: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The slot or record is held by someone else.
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// The engagement's status does not allow the action.
    InvalidState {
        /// A human-readable description of the refused transition.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Forbidden { action } => {
                write!(f, "Forbidden: caller may not {action} this engagement")
            }
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::InvalidState { message } => write!(f, "Invalid state: {message}"),
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

fn invalid_input(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::InvalidUsername(_) => invalid_input("username", &err),
        DomainError::InvalidDisplayName(_) => invalid_input("display_name", &err),
        DomainError::InvalidPrincipalKind(_) => invalid_input("kind", &err),
        DomainError::InvalidRole(_) => invalid_input("role", &err),
        DomainError::InvalidEngagementStatus(_) => invalid_input("status", &err),
        DomainError::InvalidDecision(_) => invalid_input("decision", &err),
        DomainError::InvalidStatusTransition { .. } => ApiError::InvalidState {
            message: err.to_string(),
        },
        DomainError::DateParseError { .. } | DomainError::SlotNotInFuture { .. } => {
            invalid_input("datetime", &err)
        }
        DomainError::InvalidEventDetail { field, .. } => invalid_input(field, &err),
        DomainError::InvalidCoordinates { .. } => invalid_input("coordinates", &err),
        DomainError::InvalidMessage(_) => invalid_input("body", &err),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotFound(message) => ApiError::NotFound {
            resource_type: String::from("Engagement"),
            message,
        },
        CoreError::Conflict(message) => ApiError::Conflict { message },
        CoreError::InvalidState { .. } => ApiError::InvalidState {
            message: err.to_string(),
        },
        CoreError::Forbidden { action } => ApiError::Forbidden {
            action: action.to_string(),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint failures surface as conflicts; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::UniqueViolation(message)
        | PersistenceError::ConstraintViolation(message) => ApiError::Conflict { message },
        PersistenceError::NotFound(message) => ApiError::NotFound {
            resource_type: String::from("Record"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
