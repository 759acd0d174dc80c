// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::debug;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("org.congregation", "Congregation Accounts", "congregation-accounts"));

/// Overrides the database location, e.g. for seeding a scratch database.
pub const DB_ENV: &str = "CONGREGATION_ACCOUNTS_DB";

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.to_path_buf())
}

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    Ok(data_dir()?.join("congregation-accounts.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    debug!("opening database at {}", path.display());
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates every table the stores use. Safe to run on an existing database.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ledger TEXT NOT NULL CHECK(ledger IN ('default','khoc')),
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL, -- positive magnitude, sign from type
        type TEXT NOT NULL CHECK(type IN ('income','expense')),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_ledger_date ON transactions(ledger, date);

    CREATE TABLE IF NOT EXISTS opening_balances(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ledger TEXT NOT NULL CHECK(ledger IN ('default','khoc')),
        month TEXT NOT NULL,
        balance TEXT NOT NULL,
        note TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE(ledger, month)
    );

    CREATE TABLE IF NOT EXISTS notes(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_notes_updated ON notes(updated_at);
    "#,
    )?;
    Ok(())
}
