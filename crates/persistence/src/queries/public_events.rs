// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Public event listings.

use bandbook_domain::SlotTime;
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use tracing::debug;

use crate::data_models::PublicEventData;
use crate::diesel_schema::{principals, public_events};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = public_events)]
struct PublicEventRow {
    public_event_id: i64,
    band_id: i64,
    event_datetime: String,
    category: String,
    description: String,
    ticket_price: i64,
    city: String,
    address: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    created_at: String,
}

fn into_data(
    row: PublicEventRow,
    band_username: String,
    band_display_name: String,
) -> PublicEventData {
    PublicEventData {
        public_event_id: row.public_event_id,
        band_id: row.band_id,
        band_username,
        band_display_name,
        event_datetime: row.event_datetime,
        category: row.category,
        description: row.description,
        ticket_price: row.ticket_price,
        city: row.city,
        address: row.address,
        latitude: row.latitude,
        longitude: row.longitude,
        created_at: row.created_at,
    }
}

/// Lists public events in date order, with the band's names.
///
/// When `after` is given, only events strictly later than it are returned.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_public_events(
    conn: &mut SqliteConnection,
    after: Option<&SlotTime>,
) -> Result<Vec<PublicEventData>, PersistenceError> {
    let mut query = public_events::table
        .inner_join(principals::table)
        .into_boxed::<Sqlite>();

    if let Some(after) = after {
        query = query.filter(public_events::event_datetime.gt(after.canonical()));
    }

    let rows: Vec<(PublicEventRow, String, String)> = query
        .order((
            public_events::event_datetime.asc(),
            public_events::public_event_id.asc(),
        ))
        .select((
            PublicEventRow::as_select(),
            principals::username,
            principals::display_name,
        ))
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    debug!(count = rows.len(), "Listed public events");

    Ok(rows
        .into_iter()
        .map(|(row, username, display_name)| into_data(row, username, display_name))
        .collect())
}
