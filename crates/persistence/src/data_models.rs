// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use bandbook::EngagementSnapshot;
use bandbook_domain::{EngagementStatus, PrincipalKind};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::diesel_schema::{engagement_history, engagements, messages, public_events};
use crate::error::PersistenceError;

/// A stored principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalData {
    pub principal_id: i64,
    pub kind: String,
    pub username: String,
    pub password_hash: String,
    pub display_name: String,
    pub city: Option<String>,
    pub created_at: String,
}

impl PrincipalData {
    /// Parses the stored kind.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` if the column holds
    /// an unknown kind.
    pub fn principal_kind(&self) -> Result<PrincipalKind, PersistenceError> {
        PrincipalKind::from_str(&self.kind)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
    }
}

/// A stored engagement row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementData {
    pub engagement_id: i64,
    pub band_id: i64,
    pub user_id: Option<i64>,
    pub event_datetime: String,
    pub status: String,
    pub decision: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub price: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl EngagementData {
    /// Parses the stored status.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::ReconstructionError` if the column holds
    /// an unknown status.
    pub fn engagement_status(&self) -> Result<EngagementStatus, PersistenceError> {
        EngagementStatus::from_str(&self.status)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
    }

    /// The workflow view of this row.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored status cannot be parsed.
    pub fn snapshot(&self) -> Result<EngagementSnapshot, PersistenceError> {
        Ok(EngagementSnapshot {
            engagement_id: self.engagement_id,
            band_id: self.band_id,
            user_id: self.user_id,
            status: self.engagement_status()?,
        })
    }
}

/// One row of an engagement's transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryData {
    pub history_id: i64,
    pub engagement_id: i64,
    pub previous_status: Option<String>,
    pub new_status: String,
    pub actor: String,
    pub transitioned_at: String,
}

/// One entry of an engagement's message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    pub message_id: i64,
    pub engagement_id: i64,
    pub sender_role: String,
    pub sender: String,
    pub body: String,
    pub sent_at: String,
}

/// Aggregates reported to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingData {
    /// `(status, count)` for every status present.
    pub status_counts: Vec<(String, i64)>,
    /// `(category, count)` over engagements that carry a category.
    pub category_counts: Vec<(String, i64)>,
    /// Sum of prices of completed engagements.
    pub completed_revenue: i64,
}

/// Head counts reported to administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteCounts {
    pub bands: i64,
    pub users: i64,
    /// Every engagement row, whatever its status.
    pub engagements: i64,
    pub public_events: i64,
}

/// A public event with the announcing band's names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicEventData {
    pub public_event_id: i64,
    pub band_id: i64,
    pub band_username: String,
    pub band_display_name: String,
    pub event_datetime: String,
    pub category: String,
    pub description: String,
    pub ticket_price: i64,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: String,
}

/// Insertable public event.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = public_events)]
pub struct NewPublicEvent<'a> {
    pub band_id: i64,
    pub event_datetime: &'a str,
    pub category: &'a str,
    pub description: &'a str,
    pub ticket_price: i64,
    pub city: &'a str,
    pub address: &'a str,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// The fields written when a user claims an open slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotClaim {
    pub user_id: i64,
    pub price: i64,
    pub category: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Insertable open slot.
#[derive(Insertable)]
#[diesel(table_name = engagements)]
pub struct NewOpenSlot<'a> {
    pub band_id: i64,
    pub event_datetime: &'a str,
    pub status: &'a str,
}

/// Insertable transition log entry.
#[derive(Insertable)]
#[diesel(table_name = engagement_history)]
pub struct NewHistoryEntry<'a> {
    pub engagement_id: i64,
    pub previous_status: Option<&'a str>,
    pub new_status: &'a str,
    pub actor: &'a str,
}

/// Insertable message.
#[derive(Insertable)]
#[diesel(table_name = messages)]
pub struct NewMessage<'a> {
    pub engagement_id: i64,
    pub sender_role: &'a str,
    pub sender: &'a str,
    pub body: &'a str,
}
