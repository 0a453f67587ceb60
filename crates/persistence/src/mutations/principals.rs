// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Principal mutations.

use bandbook_domain::PrincipalKind;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::diesel_schema::principals;
use crate::error::PersistenceError;

/// Creates a new principal.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `kind` - Band, user or admin
/// * `username` - The login name, unique per kind
/// * `display_name` - The name shown to other parties
/// * `password` - The plain-text password (will be hashed)
/// * `city` - Home city, if known
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the username is already
/// taken for this kind, or another error if hashing or the insert fails.
pub fn create_principal(
    conn: &mut SqliteConnection,
    kind: PrincipalKind,
    username: &str,
    display_name: &str,
    password: &str,
    city: Option<&str>,
) -> Result<i64, PersistenceError> {
    info!(
        kind = kind.as_str(),
        username,
        display_name,
        city = ?city,
        "Creating principal"
    );

    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    let principal_id: i64 = diesel::insert_into(principals::table)
        .values((
            principals::kind.eq(kind.as_str()),
            principals::username.eq(username),
            principals::display_name.eq(display_name),
            principals::password_hash.eq(&password_hash),
            principals::city.eq(city),
        ))
        .returning(principals::principal_id)
        .get_result(conn)?;

    info!(principal_id, "Principal created successfully");

    Ok(principal_id)
}
