// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the bandbook booking service.
//!
//! This crate owns the engagement store, principal records, the
//! per-engagement transition and message logs, public event listings, and
//! the aggregates reported to administrators. It is built on Diesel over
//! `SQLite`.
//!
//! ## Concurrency Model
//!
//! The store is the single source of truth for engagement status. Every
//! write that depends on the current status expresses that dependency as
//! a `WHERE` clause on the write itself, so two callers racing for the
//! same slot or engagement cannot both succeed:
//!
//! - Claiming a slot updates only a row still `open` at that band and instant
//! - Status transitions update only a row still in the expected status
//! - Closing a slot deletes only a row still `open`, and its logs cascade
//! - A partial unique index allows one active engagement per band and instant
//!
//! Callers read the affected row count (or the returned id) to find out
//! whether they won.
//!
//! ## Connections
//!
//! A `Persistence` wraps one connection. Servers open one per request
//! with [`Persistence::connect`]; migrations run once, when the database
//! is initialized. Connections to a shared in-memory database take turns:
//! each operation holds that database's gate until it returns, so racing
//! writers see the same outcomes as on a file database.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated shared-cache in-memory databases
//! - Concurrency tests use a temporary file database in WAL mode

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use bandbook::Transition;
use bandbook_domain::{PrincipalKind, Role, SlotTime};
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    AccountingData, EngagementData, HistoryData, MessageData, NewPublicEvent, PrincipalData,
    PublicEventData, SiteCounts, SlotClaim,
};
pub use error::PersistenceError;

/// Persistence adapter for the booking store.
pub struct Persistence {
    conn: SqliteConnection,
    database_url: String,
    /// Present only for shared in-memory databases.
    gate: Option<backend::gate::Gate>,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Uses a shared-cache in-memory database so further connections can be
    /// opened to it with [`Persistence::connect`] while this one is alive.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_bandbook_{db_id}?mode=memory&cache=shared");

        let gate: Option<backend::gate::Gate> = backend::gate::gate_for(&shared_memory_url);
        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: shared_memory_url,
            gate,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// The database is created if missing, migrated, and switched to WAL mode.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        backend::sqlite::enable_wal_mode(&mut conn)?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            database_url: path_str.to_string(),
            gate: None,
        })
    }

    /// Opens an additional connection to an already-initialized database.
    ///
    /// No migrations are run.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or configured.
    pub fn connect(database_url: &str) -> Result<Self, PersistenceError> {
        let gate: Option<backend::gate::Gate> = backend::gate::gate_for(database_url);

        let turn = backend::gate::enter(gate.as_ref());
        let conn: Result<SqliteConnection, PersistenceError> = backend::sqlite::connect(database_url);
        drop(turn);

        Ok(Self {
            conn: conn?,
            database_url: database_url.to_string(),
            gate,
        })
    }

    /// Runs one operation on this connection, holding the database's gate
    /// if it has one.
    fn in_turn<T>(&mut self, operation: impl FnOnce(&mut SqliteConnection) -> T) -> T {
        let turn = backend::gate::enter(self.gate.as_ref());
        let outcome: T = operation(&mut self.conn);
        drop(turn);
        outcome
    }

    /// The URL this adapter is connected to.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.in_turn(backend::sqlite::verify_foreign_key_enforcement)
    }

    // ========================================================================
    // Principals
    // ========================================================================

    /// Creates a new principal.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the username is taken
    /// for this kind.
    pub fn create_principal(
        &mut self,
        kind: PrincipalKind,
        username: &str,
        display_name: &str,
        password: &str,
        city: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        self.in_turn(|conn| {
            mutations::create_principal(conn, kind, username, display_name, password, city)
        })
    }

    /// Retrieves a principal by kind and username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_principal_by_username(
        &mut self,
        kind: PrincipalKind,
        username: &str,
    ) -> Result<Option<PrincipalData>, PersistenceError> {
        self.in_turn(|conn| queries::get_principal_by_username(conn, kind, username))
    }

    /// Retrieves a principal by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_principal_by_id(
        &mut self,
        principal_id: i64,
    ) -> Result<Option<PrincipalData>, PersistenceError> {
        self.in_turn(|conn| queries::get_principal_by_id(conn, principal_id))
    }

    /// Verifies a password against a bcrypt hash.
    ///
    /// # Arguments
    ///
    /// * `password` - The plain text password to verify
    /// * `password_hash` - The stored bcrypt hash
    ///
    /// # Errors
    ///
    /// Returns an error if password verification fails.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::verify_password(password, password_hash)
    }

    // ========================================================================
    // Engagement Store
    // ========================================================================

    /// Publishes an open slot.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the band already has an
    /// active engagement at this instant.
    pub fn insert_open_slot(
        &mut self,
        band_id: i64,
        slot: &SlotTime,
        actor: &str,
    ) -> Result<i64, PersistenceError> {
        self.in_turn(|conn| mutations::insert_open_slot(conn, band_id, slot, actor))
    }

    /// Claims an open slot. Returns `None` if no open slot matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn claim_open_slot(
        &mut self,
        band_id: i64,
        slot: &SlotTime,
        claim: &SlotClaim,
        actor: &str,
    ) -> Result<Option<i64>, PersistenceError> {
        self.in_turn(|conn| mutations::claim_open_slot(conn, band_id, slot, claim, actor))
    }

    /// Deletes an engagement that is still open, with its history.
    /// Returns the rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_open_slot(
        &mut self,
        engagement_id: i64,
        actor: &str,
    ) -> Result<usize, PersistenceError> {
        self.in_turn(|conn| mutations::delete_open_slot(conn, engagement_id, actor))
    }

    /// Applies a status transition guarded on the current status.
    /// Returns the rows updated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn apply_transition(
        &mut self,
        engagement_id: i64,
        transition: &Transition,
        actor: &str,
    ) -> Result<usize, PersistenceError> {
        self.in_turn(|conn| mutations::apply_transition(conn, engagement_id, transition, actor))
    }

    /// Retrieves an engagement by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_engagement(
        &mut self,
        engagement_id: i64,
    ) -> Result<Option<EngagementData>, PersistenceError> {
        self.in_turn(|conn| queries::get_engagement(conn, engagement_id))
    }

    /// Retrieves the active engagement for a band at an instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_active_engagement(
        &mut self,
        band_id: i64,
        slot: &SlotTime,
    ) -> Result<Option<EngagementData>, PersistenceError> {
        self.in_turn(|conn| queries::find_active_engagement(conn, band_id, slot))
    }

    /// Lists a band's open slots, optionally only those after an instant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_open_slots(
        &mut self,
        band_id: i64,
        after: Option<&SlotTime>,
    ) -> Result<Vec<EngagementData>, PersistenceError> {
        self.in_turn(|conn| queries::list_open_slots(conn, band_id, after))
    }

    /// Lists the engagements a principal takes part in.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_engagements_for(
        &mut self,
        role: Role,
        principal_id: i64,
    ) -> Result<Vec<EngagementData>, PersistenceError> {
        self.in_turn(|conn| queries::list_engagements_for(conn, role, principal_id))
    }

    // ========================================================================
    // Participation Index
    // ========================================================================

    /// Returns true if `principal_id` is the `role` party of the engagement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn is_participant(
        &mut self,
        engagement_id: i64,
        role: Role,
        principal_id: i64,
    ) -> Result<bool, PersistenceError> {
        self.in_turn(|conn| queries::is_participant(conn, engagement_id, role, principal_id))
    }

    // ========================================================================
    // History, Messages & Accounting
    // ========================================================================

    /// Returns an engagement's transition log.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn engagement_history(
        &mut self,
        engagement_id: i64,
    ) -> Result<Vec<HistoryData>, PersistenceError> {
        self.in_turn(|conn| queries::engagement_history(conn, engagement_id))
    }

    /// Appends a message to an engagement's log.
    ///
    /// # Errors
    ///
    /// Returns an error if the engagement does not exist or the insert fails.
    pub fn append_message(
        &mut self,
        engagement_id: i64,
        sender_role: Role,
        sender: &str,
        body: &str,
    ) -> Result<i64, PersistenceError> {
        self.in_turn(|conn| {
            mutations::append_message(conn, engagement_id, sender_role, sender, body)
        })
    }

    /// Returns an engagement's messages, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn message_history(
        &mut self,
        engagement_id: i64,
    ) -> Result<Vec<MessageData>, PersistenceError> {
        self.in_turn(|conn| queries::message_history(conn, engagement_id))
    }

    /// Computes the administrator accounting summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn accounting_summary(&mut self) -> Result<AccountingData, PersistenceError> {
        self.in_turn(queries::accounting_summary)
    }

    /// Counts bands, users, engagements and public events.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn site_counts(&mut self) -> Result<SiteCounts, PersistenceError> {
        self.in_turn(queries::site_counts)
    }

    /// Returns `(city, bands)` pairs, most populous city first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn bands_per_city(&mut self) -> Result<Vec<(String, i64)>, PersistenceError> {
        self.in_turn(queries::bands_per_city)
    }

    // ========================================================================
    // Public Events
    // ========================================================================

    /// Records a public event and returns its id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UniqueViolation` if the band already
    /// announced an event at this instant.
    pub fn insert_public_event(
        &mut self,
        event: &NewPublicEvent<'_>,
    ) -> Result<i64, PersistenceError> {
        self.in_turn(|conn| mutations::insert_public_event(conn, event))
    }

    /// Lists public events later than `after`, or all of them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_public_events(
        &mut self,
        after: Option<&SlotTime>,
    ) -> Result<Vec<PublicEventData>, PersistenceError> {
        self.in_turn(|conn| queries::list_public_events(conn, after))
    }
}
