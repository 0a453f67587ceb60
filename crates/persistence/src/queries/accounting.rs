// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregates over the store for administrators.

use bandbook_domain::{EngagementStatus, PrincipalKind};
use diesel::SqliteConnection;
use diesel::dsl::count_star;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::{AccountingData, SiteCounts};
use crate::diesel_schema::{engagements, principals, public_events};
use crate::error::PersistenceError;

/// Counts engagements by status and category and totals completed revenue.
///
/// Open slots carry no category and are left out of the category counts.
///
/// # Errors
///
/// Returns an error if any of the queries fail.
pub fn accounting_summary(conn: &mut SqliteConnection) -> Result<AccountingData, PersistenceError> {
    let status_counts: Vec<(String, i64)> = engagements::table
        .group_by(engagements::status)
        .select((engagements::status, count_star()))
        .order(engagements::status.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    let category_rows: Vec<(Option<String>, i64)> = engagements::table
        .filter(engagements::category.is_not_null())
        .group_by(engagements::category)
        .select((engagements::category, count_star()))
        .order(engagements::category.asc())
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    let category_counts: Vec<(String, i64)> = category_rows
        .into_iter()
        .filter_map(|(category, count)| category.map(|c| (c, count)))
        .collect();

    let completed_prices: Vec<Option<i64>> = engagements::table
        .filter(engagements::status.eq(EngagementStatus::Completed.as_str()))
        .select(engagements::price)
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    let completed_revenue: i64 = completed_prices.into_iter().flatten().sum();

    debug!(completed_revenue, "Computed accounting summary");

    Ok(AccountingData {
        status_counts,
        category_counts,
        completed_revenue,
    })
}

fn count_principals(
    conn: &mut SqliteConnection,
    kind: PrincipalKind,
) -> Result<i64, PersistenceError> {
    principals::table
        .filter(principals::kind.eq(kind.as_str()))
        .select(count_star())
        .first(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))
}

/// Counts registered bands and users, engagements and public events.
///
/// Administrators are not counted.
///
/// # Errors
///
/// Returns an error if any of the queries fail.
pub fn site_counts(conn: &mut SqliteConnection) -> Result<SiteCounts, PersistenceError> {
    let bands: i64 = count_principals(conn, PrincipalKind::Band)?;
    let users: i64 = count_principals(conn, PrincipalKind::User)?;

    let engagements: i64 = engagements::table
        .select(count_star())
        .first(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    let public_events: i64 = public_events::table
        .select(count_star())
        .first(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(SiteCounts {
        bands,
        users,
        engagements,
        public_events,
    })
}

/// Counts bands per home city, most populous first.
///
/// Ties are ordered by city name. Bands registered without a city are
/// left out.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn bands_per_city(
    conn: &mut SqliteConnection,
) -> Result<Vec<(String, i64)>, PersistenceError> {
    let rows: Vec<(Option<String>, i64)> = principals::table
        .filter(principals::kind.eq(PrincipalKind::Band.as_str()))
        .filter(principals::city.is_not_null())
        .group_by(principals::city)
        .select((principals::city, count_star()))
        .order((count_star().desc(), principals::city.asc()))
        .load(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    Ok(rows
        .into_iter()
        .filter_map(|(city, count)| city.map(|c| (c, count)))
        .collect())
}
