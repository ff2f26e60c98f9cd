// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::models::AccountKind;
use anyhow::Result;
use rusqlite::{params, Connection};

pub const DEFAULT_OWNER_EMAIL: &str = "owner@assetbook.local";

const DEFAULT_ACCOUNTS: &[(&str, AccountKind)] = &[
    ("Cash", AccountKind::Asset),
    ("Checking", AccountKind::Asset),
    ("Credit Card", AccountKind::Liability),
    ("Groceries", AccountKind::Expense),
    ("Transport", AccountKind::Expense),
    ("Household", AccountKind::Expense),
    ("Leisure", AccountKind::Expense),
    ("Misc", AccountKind::Expense),
    ("Salary", AccountKind::Revenue),
    ("Interest", AccountKind::Revenue),
];

/// Bootstrap the household owner and a default chart of accounts.
/// Idempotent: existing accounts are left untouched.
pub fn handle(conn: &Connection) -> Result<()> {
    let owner = db::ensure_owner(conn, DEFAULT_OWNER_EMAIL)?;
    let mut created = 0;
    for (name, kind) in DEFAULT_ACCOUNTS {
        created += conn.execute(
            "INSERT INTO accounts(name, kind, owner_id) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO NOTHING",
            params![name, kind.as_str(), owner],
        )?;
    }
    println!(
        "Seeded owner '{}' and {} default accounts ({} new)",
        DEFAULT_OWNER_EMAIL,
        DEFAULT_ACCOUNTS.len(),
        created
    );
    Ok(())
}
