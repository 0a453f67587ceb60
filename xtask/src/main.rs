// Copyright (C) 2024-2025 Fred Clausen and the ratatui project contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # xtask - Project Automation
//!
//! Wraps the cargo invocations CI runs, plus a migration check.
//!
//! - `cargo xtask ci`: lint, machete, build, test, verify migrations
//! - `cargo xtask verify-migrations`: applies the `SQLite` migrations to a
//!   scratch database, checks the booking schema invariants, then reverts
//!   every migration and checks nothing is left behind

#![deny(
    clippy::pedantic,
    //clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use std::{fmt::Debug, io, process::Output, vec};

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{eyre::Context, Result};
use diesel::sql_types::{Integer, Text};
use diesel::{QueryableByName, RunQueryDsl, SqliteConnection};
use duct::cmd;
use std::collections::{BTreeMap, BTreeSet};
use tracing::level_filters::LevelFilter;
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(bin_name = "cargo xtask", styles = clap_cargo::style::CLAP_STYLING)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        self.command.run()
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Run CI checks (lint, build, test)
    CI,

    /// Build the project
    #[command(visible_alias = "b")]
    Build,

    /// Run cargo check
    #[command(visible_alias = "c")]
    Check,

    // Check unused dependencies
    #[command(visible_alias = "m")]
    Machete,

    /// Lint formatting, typos, clippy, and docs
    #[command(visible_alias = "l")]
    Lint,

    /// Run clippy on the project
    #[command(visible_alias = "cl")]
    LintClippy,

    /// Check documentation for errors and warnings
    #[command(visible_alias = "d")]
    LintDocs,

    /// Check for formatting issues in the project
    #[command(visible_alias = "lf")]
    LintFormatting,

    /// Check for typos in the project
    #[command(visible_alias = "lt")]
    LintTypos,

    /// Run tests
    #[command(visible_alias = "t")]
    Test,

    /// Apply and revert the `SQLite` migrations and check the schema
    #[command(visible_alias = "vm")]
    VerifyMigrations,
}

impl Command {
    fn run(self) -> Result<()> {
        match self {
            Self::CI => ci(),
            Self::Build => build(),
            Self::Check => check(),
            Self::Machete => machete(),
            Self::Lint => lint(),
            Self::LintClippy => lint_clippy(),
            Self::LintDocs => lint_docs(),
            Self::LintFormatting => lint_format(),
            Self::LintTypos => lint_typos(),
            Self::Test => test(),
            Self::VerifyMigrations => verify_migrations(),
        }
    }
}

/// Run CI checks (lint, build, test)
fn ci() -> Result<()> {
    lint()?;
    machete()?;
    build()?;
    test()?;
    verify_migrations()?;
    Ok(())
}

fn machete() -> Result<()> {
    cmd!("cargo-machete").run_with_trace()?;
    Ok(())
}

/// Build the project
fn build() -> Result<()> {
    run_cargo(vec!["build", "--all-targets", "--all-features"])
}

/// Run cargo check
fn check() -> Result<()> {
    run_cargo(vec!["check", "--all-targets", "--all-features"])
}

/// Lint formatting, typos, clippy, and docs
fn lint() -> Result<()> {
    lint_clippy()?;
    lint_docs()?;
    lint_format()?;
    lint_typos()?;
    Ok(())
}

/// Run clippy on the project
fn lint_clippy() -> Result<()> {
    run_cargo(vec![
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ])
}

/// Check that the workspace docs build without warnings
fn lint_docs() -> Result<()> {
    cmd!("cargo", "doc", "--no-deps", "--workspace", "--all-features")
        .env("RUSTDOCFLAGS", "-D warnings")
        .run_with_trace()?;
    Ok(())
}

/// Lint formatting issues in the project
fn lint_format() -> Result<()> {
    run_cargo(vec!["fmt", "--all", "--check"])
}

/// Check for typos in the project using [typos-cli](https://github.com/crate-ci/typos/)
fn lint_typos() -> Result<()> {
    cmd!("typos").run_with_trace()?;
    Ok(())
}

/// Run every test target in the workspace
fn test() -> Result<()> {
    run_cargo(vec!["test", "--all-targets", "--all-features"])
}

/// Run a cargo subcommand with the default toolchain
fn run_cargo(args: Vec<&str>) -> Result<()> {
    cmd("cargo", args).run_with_trace()?;
    Ok(())
}

/// Verify the `SQLite` migrations
///
/// ## What This Command Does
///
/// 1. Applies every migration to a scratch in-memory database
/// 2. Introspects the resulting schema (tables, columns, keys, indexes)
/// 3. Checks the invariants the booking workflow relies on:
///    - the five tables exist
///    - engagements and public events reference principals
///    - messages reference engagements
///    - the transition log references engagements, so it goes with a closed slot
///    - a partial unique index covers `(band_id, event_datetime)`
///    - public events are unique per band and instant
/// 4. Reverts every migration and checks no table is left behind
///
/// ## Usage
///
/// ```bash
/// cargo xtask verify-migrations
/// ```
fn verify_migrations() -> Result<()> {
    use diesel::Connection;
    use diesel_migrations::{embed_migrations, MigrationHarness};

    const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
        embed_migrations!("../crates/persistence/migrations");

    tracing::info!("Applying SQLite migrations");

    let mut conn = SqliteConnection::establish(":memory:")
        .wrap_err("Failed to create SQLite in-memory database")?;

    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .wrap_err("Failed to enable foreign keys on SQLite")?;

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to apply SQLite migrations: {}", e))?;

    tracing::info!("Introspecting SQLite schema");
    let schema = introspect_sqlite_schema(&mut conn)?;
    check_booking_schema(&schema)?;

    tracing::info!("Reverting SQLite migrations");
    conn.revert_all_migrations(MIGRATIONS)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to revert SQLite migrations: {}", e))?;

    let reverted = introspect_sqlite_schema(&mut conn)?;
    if !reverted.tables.is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: tables left after revert: {:?}",
            reverted.tables.keys().collect::<Vec<_>>()
        ));
    }

    tracing::info!("✓ Migration verification passed");
    Ok(())
}

/// Normalized schema representation
#[derive(Debug, Clone, PartialEq, Eq)]
struct Schema {
    tables: BTreeMap<String, Table>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Table {
    columns: BTreeMap<String, Column>,
    primary_keys: BTreeSet<String>,
    foreign_keys: BTreeSet<ForeignKey>,
    unique_constraints: BTreeSet<UniqueConstraint>,
    indexes: BTreeSet<Index>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Column {
    name: String,
    normalized_type: String,
    nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct ForeignKey {
    from_column: String,
    to_table: String,
    to_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UniqueConstraint {
    columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Index {
    name: String,
    columns: Vec<String>,
    unique: bool,
    partial: bool,
}

/// Introspect `SQLite` schema
#[allow(clippy::too_many_lines)]
fn introspect_sqlite_schema(conn: &mut SqliteConnection) -> Result<Schema> {
    #[derive(QueryableByName)]
    struct TableName {
        #[diesel(sql_type = Text)]
        name: String,
    }

    #[derive(QueryableByName)]
    struct ColumnInfo {
        #[diesel(sql_type = Integer)]
        #[allow(dead_code)]
        cid: i32,
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Text)]
        r#type: String,
        #[diesel(sql_type = Integer)]
        notnull: i32,
        #[diesel(sql_type = Integer)]
        pk: i32,
    }

    #[derive(QueryableByName)]
    struct ForeignKeyInfo {
        #[diesel(sql_type = Text)]
        table: String,
        #[diesel(sql_type = Text)]
        from: String,
        #[diesel(sql_type = Text)]
        to: String,
    }

    #[derive(QueryableByName)]
    struct IndexInfo {
        #[diesel(sql_type = Text)]
        name: String,
        #[diesel(sql_type = Integer)]
        unique: i32,
        #[diesel(sql_type = Text)]
        origin: String,
        #[diesel(sql_type = Integer)]
        partial: i32,
    }

    #[derive(QueryableByName)]
    struct IndexColumnInfo {
        #[diesel(sql_type = Text)]
        name: String,
    }

    let mut schema = Schema {
        tables: BTreeMap::new(),
    };

    // Get all tables
    let tables: Vec<TableName> = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name != '__diesel_schema_migrations' ORDER BY name"
    )
    .load(conn)
    .wrap_err("Failed to query SQLite tables")?;

    for table in tables {
        let mut table_info = Table {
            columns: BTreeMap::new(),
            primary_keys: BTreeSet::new(),
            foreign_keys: BTreeSet::new(),
            unique_constraints: BTreeSet::new(),
            indexes: BTreeSet::new(),
        };

        // Get columns
        let columns: Vec<ColumnInfo> =
            diesel::sql_query(format!("PRAGMA table_info({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get columns for table {}", table.name))?;

        for col in columns {
            let normalized_type = normalize_sqlite_type(&col.r#type);
            table_info.columns.insert(
                col.name.clone(),
                Column {
                    name: col.name.clone(),
                    normalized_type,
                    nullable: col.notnull == 0,
                },
            );

            if col.pk > 0 {
                table_info.primary_keys.insert(col.name);
            }
        }

        // Get foreign keys
        let fks: Vec<ForeignKeyInfo> =
            diesel::sql_query(format!("PRAGMA foreign_key_list({})", table.name))
                .load(conn)
                .wrap_err(format!(
                    "Failed to get foreign keys for table {}",
                    table.name
                ))?;

        for fk in fks {
            table_info.foreign_keys.insert(ForeignKey {
                from_column: fk.from,
                to_table: fk.table,
                to_column: fk.to,
            });
        }

        // Get indexes and unique constraints
        let indexes: Vec<IndexInfo> =
            diesel::sql_query(format!("PRAGMA index_list({})", table.name))
                .load(conn)
                .wrap_err(format!("Failed to get indexes for table {}", table.name))?;

        for idx in indexes {
            let index_columns: Vec<IndexColumnInfo> =
                diesel::sql_query(format!("PRAGMA index_info({})", idx.name))
                    .load(conn)
                    .wrap_err(format!("Failed to get index columns for {}", idx.name))?;

            let column_names: Vec<String> = index_columns.into_iter().map(|c| c.name).collect();

            // If origin is 'u', it's a unique constraint (including sqlite_autoindex_*)
            if idx.origin == "u" {
                table_info.unique_constraints.insert(UniqueConstraint {
                    columns: column_names,
                });
            } else if !idx.name.starts_with("sqlite_autoindex_") {
                table_info.indexes.insert(Index {
                    name: idx.name,
                    columns: column_names,
                    unique: idx.unique != 0,
                    partial: idx.partial != 0,
                });
            }
        }

        schema.tables.insert(table.name, table_info);
    }

    Ok(schema)
}

fn normalize_sqlite_type(sqlite_type: &str) -> String {
    let upper = sqlite_type.to_uppercase();
    if upper.contains("INT") {
        "integer".to_string()
    } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
        "real".to_string()
    } else if upper.contains("BLOB") || upper.is_empty() {
        "blob".to_string()
    } else {
        "text".to_string()
    }
}

fn table<'a>(schema: &'a Schema, name: &str) -> Result<&'a Table> {
    schema.tables.get(name).ok_or_else(|| {
        color_eyre::eyre::eyre!("❌ Migration check FAILED: table '{}' is missing", name)
    })
}

fn references(table: &Table, from_column: &str, to_table: &str) -> bool {
    table
        .foreign_keys
        .iter()
        .any(|fk| fk.from_column == from_column && fk.to_table == to_table)
}

/// Check the schema invariants the booking workflow relies on
fn check_booking_schema(schema: &Schema) -> Result<()> {
    let principals = table(schema, "principals")?;
    let engagements = table(schema, "engagements")?;
    let history = table(schema, "engagement_history")?;
    let messages = table(schema, "messages")?;
    let public_events = table(schema, "public_events")?;

    let principal_key = UniqueConstraint {
        columns: vec![String::from("kind"), String::from("username")],
    };
    if !principals.unique_constraints.contains(&principal_key) {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: principals lack UNIQUE (kind, username)"
        ));
    }

    if !references(engagements, "band_id", "principals")
        || !references(engagements, "user_id", "principals")
    {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: engagements must reference principals\n  Found: {:?}",
            engagements.foreign_keys
        ));
    }

    if engagements.columns.get("user_id").is_none_or(|c| !c.nullable) {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: engagements.user_id must be nullable for open slots"
        ));
    }

    let slot_columns = vec![String::from("band_id"), String::from("event_datetime")];
    let active_slot_index = engagements
        .indexes
        .iter()
        .any(|i| i.unique && i.partial && i.columns == slot_columns);
    if !active_slot_index {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: engagements need a partial unique index on (band_id, event_datetime)\n  Found: {:?}",
            engagements.indexes
        ));
    }

    if !references(history, "engagement_id", "engagements") {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: engagement_history must reference engagements\n  Found: {:?}",
            history.foreign_keys
        ));
    }

    if !references(messages, "engagement_id", "engagements") {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: messages must reference engagements"
        ));
    }

    if !references(public_events, "band_id", "principals") {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: public_events must reference principals"
        ));
    }

    let event_key = UniqueConstraint {
        columns: vec![String::from("band_id"), String::from("event_datetime")],
    };
    if !public_events.unique_constraints.contains(&event_key) {
        return Err(color_eyre::eyre::eyre!(
            "❌ Migration check FAILED: public_events lack UNIQUE (band_id, event_datetime)\n  Found: {:?}",
            public_events.unique_constraints
        ));
    }

    for (table_name, table) in &schema.tables {
        tracing::debug!(table = %table_name, primary_keys = ?table.primary_keys, "Schema table");
        for column in table.columns.values() {
            tracing::debug!(
                table = %table_name,
                column = %column.name,
                r#type = %column.normalized_type,
                nullable = column.nullable,
                "Schema column"
            );
        }
        for index in &table.indexes {
            tracing::debug!(table = %table_name, index = %index.name, columns = ?index.columns, "Schema index");
        }
    }

    Ok(())
}

/// An extension trait for `duct::Expression` that logs the command being run
/// before running it.
trait ExpressionExt {
    /// Run the command and log the command being run
    fn run_with_trace(&self) -> io::Result<Output>;
}

impl ExpressionExt for duct::Expression {
    fn run_with_trace(&self) -> io::Result<Output> {
        tracing::info!("running command: {:?}", self);
        self.run().inspect_err(|_| {
            // The command that was run may have scrolled off the screen, so repeat it here
            tracing::error!("failed to run command: {:?}", self);
        })
    }
}
