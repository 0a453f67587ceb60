// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Engagement mutations.
//!
//! Each function performs one conditional write together with its history
//! row inside an `IMMEDIATE` transaction. Callers learn whether the
//! precondition held from the return value alone: an id or row count of
//! zero means some other writer got there first (or the row never
//! matched), and the caller decides how to classify that.

use bandbook::Transition;
use bandbook_domain::{EngagementStatus, SlotTime};
use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use tracing::{debug, info};

use crate::data_models::{NewHistoryEntry, NewOpenSlot, SlotClaim};
use crate::diesel_schema::{engagement_history, engagements};
use crate::error::PersistenceError;

/// Marker stored in the decision column while a request awaits the band.
const PENDING_DECISION: &str = "requested";

fn record_history(
    conn: &mut SqliteConnection,
    engagement_id: i64,
    previous_status: Option<&str>,
    new_status: &str,
    actor: &str,
) -> Result<(), PersistenceError> {
    let entry: NewHistoryEntry<'_> = NewHistoryEntry {
        engagement_id,
        previous_status,
        new_status,
        actor,
    };

    diesel::insert_into(engagement_history::table)
        .values(&entry)
        .execute(conn)?;

    Ok(())
}

/// Publishes an open slot for a band.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `band_id` - The owning band
/// * `slot` - The slot instant
/// * `actor` - Who performed the change, for the history log
///
/// # Returns
///
/// The new engagement id.
///
/// # Errors
///
/// Returns `PersistenceError::UniqueViolation` if the band already has an
/// active engagement at this instant.
pub fn insert_open_slot(
    conn: &mut SqliteConnection,
    band_id: i64,
    slot: &SlotTime,
    actor: &str,
) -> Result<i64, PersistenceError> {
    let event_datetime: String = slot.canonical();

    conn.immediate_transaction(|conn| {
        let record: NewOpenSlot<'_> = NewOpenSlot {
            band_id,
            event_datetime: &event_datetime,
            status: EngagementStatus::Open.as_str(),
        };

        let engagement_id: i64 = diesel::insert_into(engagements::table)
            .values(&record)
            .returning(engagements::engagement_id)
            .get_result(conn)?;

        record_history(
            conn,
            engagement_id,
            None,
            EngagementStatus::Open.as_str(),
            actor,
        )?;

        info!(engagement_id, band_id, slot = %event_datetime, "Opened slot");

        Ok(engagement_id)
    })
}

/// Claims a band's open slot for a user.
///
/// The update matches only a row that is still `open` at exactly this
/// band and instant. Among concurrent claimants at most one sees `Some`.
///
/// # Returns
///
/// The claimed engagement id, or `None` if no open slot matched.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn claim_open_slot(
    conn: &mut SqliteConnection,
    band_id: i64,
    slot: &SlotTime,
    claim: &SlotClaim,
    actor: &str,
) -> Result<Option<i64>, PersistenceError> {
    let event_datetime: String = slot.canonical();

    conn.immediate_transaction(|conn| {
        let claimed: Option<i64> = diesel::update(
            engagements::table
                .filter(engagements::band_id.eq(band_id))
                .filter(engagements::event_datetime.eq(&event_datetime))
                .filter(engagements::status.eq(EngagementStatus::Open.as_str())),
        )
        .set((
            engagements::user_id.eq(Some(claim.user_id)),
            engagements::status.eq(EngagementStatus::Requested.as_str()),
            engagements::decision.eq(Some(PENDING_DECISION)),
            engagements::price.eq(Some(claim.price)),
            engagements::category.eq(Some(claim.category.as_str())),
            engagements::description.eq(Some(claim.description.as_str())),
            engagements::city.eq(Some(claim.city.as_str())),
            engagements::address.eq(Some(claim.address.as_str())),
            engagements::latitude.eq(claim.latitude),
            engagements::longitude.eq(claim.longitude),
            engagements::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
        ))
        .returning(engagements::engagement_id)
        .get_result(conn)
        .optional()?;

        if let Some(engagement_id) = claimed {
            record_history(
                conn,
                engagement_id,
                Some(EngagementStatus::Open.as_str()),
                EngagementStatus::Requested.as_str(),
                actor,
            )?;
            info!(
                engagement_id,
                band_id,
                user_id = claim.user_id,
                "Slot claimed"
            );
        } else {
            debug!(band_id, slot = %event_datetime, "No open slot matched claim");
        }

        Ok(claimed)
    })
}

/// Removes an open slot.
///
/// Only a row that is still `open` is deleted. Its history and messages
/// cascade with it, so opening and then closing a slot leaves the store as
/// it was before.
///
/// # Returns
///
/// The number of rows removed (0 or 1).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn delete_open_slot(
    conn: &mut SqliteConnection,
    engagement_id: i64,
    actor: &str,
) -> Result<usize, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let removed: usize = diesel::delete(
            engagements::table
                .filter(engagements::engagement_id.eq(engagement_id))
                .filter(engagements::status.eq(EngagementStatus::Open.as_str())),
        )
        .execute(conn)?;

        if removed > 0 {
            info!(engagement_id, actor, "Closed slot");
        }

        Ok(removed)
    })
}

/// Moves an engagement from `transition.from` to `transition.to`.
///
/// The update is guarded on the current status, so a row that has moved
/// on since it was read is left untouched.
///
/// # Returns
///
/// The number of rows updated (0 or 1).
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn apply_transition(
    conn: &mut SqliteConnection,
    engagement_id: i64,
    transition: &Transition,
    actor: &str,
) -> Result<usize, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let target = engagements::table
            .filter(engagements::engagement_id.eq(engagement_id))
            .filter(engagements::status.eq(transition.from.as_str()));

        let updated: usize = if transition.clears_decision {
            diesel::update(target)
                .set((
                    engagements::status.eq(transition.to.as_str()),
                    engagements::decision.eq(None::<String>),
                    engagements::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
                ))
                .execute(conn)?
        } else {
            diesel::update(target)
                .set((
                    engagements::status.eq(transition.to.as_str()),
                    engagements::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
                ))
                .execute(conn)?
        };

        if updated > 0 {
            record_history(
                conn,
                engagement_id,
                Some(transition.from.as_str()),
                transition.to.as_str(),
                actor,
            )?;
            info!(
                engagement_id,
                from = transition.from.as_str(),
                to = transition.to.as_str(),
                "Engagement transitioned"
            );
        } else {
            debug!(
                engagement_id,
                expected = transition.from.as_str(),
                "Transition precondition did not hold"
            );
        }

        Ok(updated)
    })
}
