// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::PathBuf;

use crate::error::LedgerError;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("io.assetbook", "Assetbook", "assetbook"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("assetbook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        kind TEXT NOT NULL CHECK(kind IN ('ASSET','LIABILITY','EXPENSE','REVENUE')),
        owner_id INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(owner_id) REFERENCES users(id)
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('INCOME','EXPENSE')),
        owner_id INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(owner_id) REFERENCES users(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS entries(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        amount TEXT NOT NULL,
        account_id INTEGER NOT NULL,
        transaction_id INTEGER NOT NULL,
        FOREIGN KEY(account_id) REFERENCES accounts(id),
        FOREIGN KEY(transaction_id) REFERENCES transactions(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_entries_account ON entries(account_id);
    CREATE INDEX IF NOT EXISTS idx_entries_transaction ON entries(transaction_id);

    CREATE TABLE IF NOT EXISTS assets(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL CHECK(category IN
            ('CASH','STOCK','PENSION','REAL_ESTATE','LOAN','ESO','RENTAL')),
        owner_id INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(owner_id) REFERENCES users(id)
    );

    -- month is a YYYY-MM calendar key, never a timestamp
    CREATE TABLE IF NOT EXISTS asset_values(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        asset_id INTEGER NOT NULL,
        month TEXT NOT NULL,
        amount TEXT NOT NULL,
        UNIQUE(asset_id, month),
        FOREIGN KEY(asset_id) REFERENCES assets(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

/// The singleton household owner. All writes are stamped with this id;
/// its absence outside of first-run bootstrap is unexpected.
pub fn owner_id(conn: &Connection) -> std::result::Result<i64, LedgerError> {
    let id: Option<i64> = conn
        .query_row("SELECT id FROM users ORDER BY id LIMIT 1", [], |r| r.get(0))
        .optional()?;
    id.ok_or(LedgerError::OwnerMissing)
}

pub fn ensure_owner(conn: &Connection, email: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO users(email) VALUES (?1) ON CONFLICT(email) DO NOTHING",
        [email],
    )?;
    let id = conn.query_row("SELECT id FROM users WHERE email=?1", [email], |r| r.get(0))?;
    Ok(id)
}
