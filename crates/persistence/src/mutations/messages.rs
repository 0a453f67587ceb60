// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bandbook_domain::Role;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::data_models::NewMessage;
use crate::diesel_schema::messages;
use crate::error::PersistenceError;

/// Appends a message to an engagement's log.
///
/// # Errors
///
/// Returns `PersistenceError::ConstraintViolation` if the engagement does
/// not exist, or another error if the insert fails.
pub fn append_message(
    conn: &mut SqliteConnection,
    engagement_id: i64,
    sender_role: Role,
    sender: &str,
    body: &str,
) -> Result<i64, PersistenceError> {
    let record: NewMessage<'_> = NewMessage {
        engagement_id,
        sender_role: sender_role.as_str(),
        sender,
        body,
    };

    let message_id: i64 = diesel::insert_into(messages::table)
        .values(&record)
        .returning(messages::message_id)
        .get_result(conn)?;

    debug!(engagement_id, message_id, sender, "Appended message");

    Ok(message_id)
}
