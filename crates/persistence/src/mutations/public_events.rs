// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Public event announcements.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::data_models::NewPublicEvent;
use crate::diesel_schema::public_events;
use crate::error::PersistenceError;

/// Records a public event for a band.
///
/// # Returns
///
/// The new public event id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the band already announced
/// an event at this instant, or `ConstraintViolation` if the price is
/// negative or the band does not exist.
pub fn insert_public_event(
    conn: &mut SqliteConnection,
    event: &NewPublicEvent<'_>,
) -> Result<i64, PersistenceError> {
    let public_event_id: i64 = diesel::insert_into(public_events::table)
        .values(event)
        .returning(public_events::public_event_id)
        .get_result(conn)?;

    info!(
        public_event_id,
        band_id = event.band_id,
        event_datetime = event.event_datetime,
        "Announced public event"
    );

    Ok(public_event_id)
}
