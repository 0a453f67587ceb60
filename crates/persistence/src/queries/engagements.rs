// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engagement lookups and the participation index.

use bandbook_domain::{EngagementStatus, Role, SlotTime};
use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use tracing::debug;

use crate::data_models::{EngagementData, HistoryData};
use crate::diesel_schema::{engagement_history, engagements};
use crate::error::PersistenceError;

/// Diesel Queryable struct for engagement rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = engagements)]
struct EngagementRow {
    engagement_id: i64,
    band_id: i64,
    user_id: Option<i64>,
    event_datetime: String,
    status: String,
    decision: Option<String>,
    category: Option<String>,
    description: Option<String>,
    city: Option<String>,
    address: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    price: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl From<EngagementRow> for EngagementData {
    fn from(row: EngagementRow) -> Self {
        Self {
            engagement_id: row.engagement_id,
            band_id: row.band_id,
            user_id: row.user_id,
            event_datetime: row.event_datetime,
            status: row.status,
            decision: row.decision,
            category: row.category,
            description: row.description,
            city: row.city,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = engagement_history)]
struct HistoryRow {
    history_id: i64,
    engagement_id: i64,
    previous_status: Option<String>,
    new_status: String,
    actor: String,
    transitioned_at: String,
}

/// Statuses that occupy a band's slot.
const ACTIVE_STATUSES: [&str; 3] = [
    EngagementStatus::Open.as_str(),
    EngagementStatus::Requested.as_str(),
    EngagementStatus::Confirmed.as_str(),
];

/// Retrieves an engagement by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the engagement does not exist.
pub fn get_engagement(
    conn: &mut SqliteConnection,
    engagement_id: i64,
) -> Result<Option<EngagementData>, PersistenceError> {
    let row: Option<EngagementRow> = engagements::table
        .find(engagement_id)
        .select(EngagementRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(row.map(EngagementData::from))
}

/// Retrieves the active engagement for a band at an instant, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_active_engagement(
    conn: &mut SqliteConnection,
    band_id: i64,
    slot: &SlotTime,
) -> Result<Option<EngagementData>, PersistenceError> {
    let row: Option<EngagementRow> = engagements::table
        .filter(engagements::band_id.eq(band_id))
        .filter(engagements::event_datetime.eq(slot.canonical()))
        .filter(engagements::status.eq_any(ACTIVE_STATUSES))
        .select(EngagementRow::as_select())
        .first(conn)
        .optional()
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(row.map(EngagementData::from))
}

/// Lists a band's open slots in chronological order.
///
/// When `after` is given, only slots strictly later than it are returned.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_open_slots(
    conn: &mut SqliteConnection,
    band_id: i64,
    after: Option<&SlotTime>,
) -> Result<Vec<EngagementData>, PersistenceError> {
    let mut query = engagements::table
        .filter(engagements::band_id.eq(band_id))
        .filter(engagements::status.eq(EngagementStatus::Open.as_str()))
        .into_boxed::<Sqlite>();

    if let Some(after) = after {
        query = query.filter(engagements::event_datetime.gt(after.canonical()));
    }

    let rows: Vec<EngagementRow> = query
        .order((
            engagements::event_datetime.asc(),
            engagements::engagement_id.asc(),
        ))
        .select(EngagementRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    debug!(band_id, count = rows.len(), "Listed open slots");

    Ok(rows.into_iter().map(EngagementData::from).collect())
}

/// Lists every engagement in which a principal takes part in `role`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_engagements_for(
    conn: &mut SqliteConnection,
    role: Role,
    principal_id: i64,
) -> Result<Vec<EngagementData>, PersistenceError> {
    let query = match role {
        Role::Band => engagements::table
            .filter(engagements::band_id.eq(principal_id))
            .into_boxed::<Sqlite>(),
        Role::User => engagements::table
            .filter(engagements::user_id.eq(principal_id))
            .into_boxed::<Sqlite>(),
    };

    let rows: Vec<EngagementRow> = query
        .order((
            engagements::event_datetime.asc(),
            engagements::engagement_id.asc(),
        ))
        .select(EngagementRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(rows.into_iter().map(EngagementData::from).collect())
}

/// Returns true if `principal_id` is the `role` party of the engagement.
///
/// A missing engagement has no participants.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_participant(
    conn: &mut SqliteConnection,
    engagement_id: i64,
    role: Role,
    principal_id: i64,
) -> Result<bool, PersistenceError> {
    let base = engagements::table.filter(engagements::engagement_id.eq(engagement_id));

    let matches: i64 = match role {
        Role::Band => base
            .filter(engagements::band_id.eq(principal_id))
            .select(count_star())
            .first::<i64>(conn),
        Role::User => base
            .filter(engagements::user_id.eq(principal_id))
            .select(count_star())
            .first::<i64>(conn),
    }
    .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(matches > 0)
}

/// Returns an engagement's transition log, oldest first.
///
/// The log survives the removal of an open slot.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn engagement_history(
    conn: &mut SqliteConnection,
    engagement_id: i64,
) -> Result<Vec<HistoryData>, PersistenceError> {
    let rows: Vec<HistoryRow> = engagement_history::table
        .filter(engagement_history::engagement_id.eq(engagement_id))
        .order(engagement_history::history_id.asc())
        .select(HistoryRow::as_select())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(rows
        .into_iter()
        .map(|row| HistoryData {
            history_id: row.history_id,
            engagement_id: row.engagement_id,
            previous_status: row.previous_status,
            new_status: row.new_status,
            actor: row.actor,
            transitioned_at: row.transitioned_at,
        })
        .collect())
}
