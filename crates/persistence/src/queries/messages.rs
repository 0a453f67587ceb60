// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::MessageData;
use crate::diesel_schema::messages;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = messages)]
struct MessageRow {
    message_id: i64,
    engagement_id: i64,
    sender_role: String,
    sender: String,
    body: String,
    sent_at: String,
}

/// Returns an engagement's messages, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn message_history(
    conn: &mut SqliteConnection,
    engagement_id: i64,
) -> Result<Vec<MessageData>, PersistenceError> {
    let rows: Vec<MessageRow> = messages::table
        .filter(messages::engagement_id.eq(engagement_id))
        .order((messages::sent_at.asc(), messages::message_id.asc()))
        .select(MessageRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(rows
        .into_iter()
        .map(|row| MessageData {
            message_id: row.message_id,
            engagement_id: row.engagement_id,
            sender_role: row.sender_role,
            sender: row.sender,
            body: row.body,
            sent_at: row.sent_at,
        })
        .collect())
}
