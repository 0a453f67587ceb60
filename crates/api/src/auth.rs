// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Credential resolution, the authorization guard and the participation index.
//!
//! There are no sessions. Every call that acts on behalf of a principal
//! carries a username and password, and they are checked again each time.

use bandbook::EngagementSnapshot;
use bandbook_domain::{PrincipalKind, Role};
use bandbook_persistence::{Persistence, PrincipalData};
use tracing::debug;

use crate::error::{ApiError, translate_persistence_error};

/// A username and password pair supplied with a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The login name.
    pub username: String,
    /// The plain-text password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A principal whose credentials have been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// The stored principal id.
    pub principal_id: i64,
    /// The account kind the credentials were checked against.
    pub kind: PrincipalKind,
    /// The login name.
    pub username: String,
    /// The name shown to other parties.
    pub display_name: String,
}

impl Principal {
    /// The label written to the transition log for this principal.
    #[must_use]
    pub fn actor_label(&self) -> String {
        format!("{}:{}", self.kind, self.username)
    }
}

fn principal_from(kind: PrincipalKind, data: PrincipalData) -> Principal {
    Principal {
        principal_id: data.principal_id,
        kind,
        username: data.username,
        display_name: data.display_name,
    }
}

/// Resolves credentials to a principal of the given kind.
///
/// An unknown username and a wrong password both yield `None`.
///
/// # Errors
///
/// Returns an error only if the lookup or hash check itself fails.
pub fn resolve_credentials(
    persistence: &mut Persistence,
    kind: PrincipalKind,
    credentials: &Credentials,
) -> Result<Option<Principal>, ApiError> {
    let Some(data) = persistence
        .get_principal_by_username(kind, credentials.username.trim())
        .map_err(translate_persistence_error)?
    else {
        debug!(kind = kind.as_str(), username = %credentials.username, "Unknown principal");
        return Ok(None);
    };

    let valid: bool = persistence
        .verify_password(&credentials.password, &data.password_hash)
        .map_err(translate_persistence_error)?;

    if !valid {
        debug!(kind = kind.as_str(), username = %credentials.username, "Password mismatch");
        return Ok(None);
    }

    Ok(Some(principal_from(kind, data)))
}

/// Resolves credentials or fails with `AuthenticationFailed`.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` if the credentials do not
/// resolve, or an internal error if the lookup fails.
pub fn authenticate(
    persistence: &mut Persistence,
    kind: PrincipalKind,
    credentials: &Credentials,
) -> Result<Principal, ApiError> {
    resolve_credentials(persistence, kind, credentials)?.ok_or_else(|| {
        ApiError::AuthenticationFailed {
            reason: format!("Invalid {kind} username or password"),
        }
    })
}

/// Checks that an already-resolved principal is the `role` party of an engagement.
#[must_use]
pub fn authorize_principal(
    principal: &Principal,
    role: Role,
    engagement: &EngagementSnapshot,
) -> bool {
    principal.kind == role.principal_kind() && engagement.is_party(principal.principal_id, role)
}

/// The authorization guard.
///
/// Resolves `credentials` as a principal acting in `role` and checks that
/// it is that party of `engagement`. Credentials that do not resolve are
/// simply not authorized.
///
/// # Errors
///
/// Returns an error only if the credential lookup fails.
pub fn authorize(
    persistence: &mut Persistence,
    credentials: &Credentials,
    role: Role,
    engagement: &EngagementSnapshot,
) -> Result<bool, ApiError> {
    let principal: Option<Principal> =
        resolve_credentials(persistence, role.principal_kind(), credentials)?;

    Ok(principal.is_some_and(|p| authorize_principal(&p, role, engagement)))
}

/// The participation index.
///
/// Returns true if the principal named `username` is the `role` party of
/// the engagement. Unknown principals and missing engagements are not
/// participants.
///
/// # Errors
///
/// Returns an error if the lookup fails.
pub fn is_participant(
    persistence: &mut Persistence,
    engagement_id: i64,
    role: Role,
    username: &str,
) -> Result<bool, ApiError> {
    let Some(principal) = persistence
        .get_principal_by_username(role.principal_kind(), username)
        .map_err(translate_persistence_error)?
    else {
        return Ok(false);
    };

    persistence
        .is_participant(engagement_id, role, principal.principal_id)
        .map_err(translate_persistence_error)
}
