// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Principal lookups.

use bandbook_domain::PrincipalKind;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::PrincipalData;
use crate::diesel_schema::principals;
use crate::error::PersistenceError;

/// Diesel Queryable struct for principal rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = principals)]
struct PrincipalRow {
    principal_id: i64,
    kind: String,
    username: String,
    password_hash: String,
    display_name: String,
    city: Option<String>,
    created_at: String,
}

impl From<PrincipalRow> for PrincipalData {
    fn from(row: PrincipalRow) -> Self {
        Self {
            principal_id: row.principal_id,
            kind: row.kind,
            username: row.username,
            password_hash: row.password_hash,
            display_name: row.display_name,
            city: row.city,
            created_at: row.created_at,
        }
    }
}

/// Retrieves a principal by kind and username.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `kind` - The account kind to look in
/// * `username` - The exact username
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no such principal exists.
pub fn get_principal_by_username(
    conn: &mut SqliteConnection,
    kind: PrincipalKind,
    username: &str,
) -> Result<Option<PrincipalData>, PersistenceError> {
    debug!(kind = kind.as_str(), username, "Looking up principal");

    let result: Result<PrincipalRow, diesel::result::Error> = principals::table
        .filter(principals::kind.eq(kind.as_str()))
        .filter(principals::username.eq(username))
        .select(PrincipalRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into())),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::QueryFailed(e.to_string())),
    }
}

/// Retrieves a principal by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_principal_by_id(
    conn: &mut SqliteConnection,
    principal_id: i64,
) -> Result<Option<PrincipalData>, PersistenceError> {
    let row: Option<PrincipalRow> = principals::table
        .find(principal_id)
        .select(PrincipalRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(row.map(PrincipalData::from))
}

/// Verifies a password against a stored bcrypt hash.
///
/// # Arguments
///
/// * `password` - The plain text password to verify
/// * `password_hash` - The stored bcrypt hash
///
/// # Errors
///
/// Returns an error if the hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Password verification failed: {e}")))
}
