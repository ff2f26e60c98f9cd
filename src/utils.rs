// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::models::{Account, AccountKind, Asset, AssetCategory, MonthKey};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> crate::error::Result<MonthKey> {
    s.parse::<MonthKey>()
}

pub fn parse_amount(s: &str) -> crate::error::Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .map_err(|_| LedgerError::Validation(format!("Invalid amount '{}'", s)))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

/// User-facing errors are returned as data to the user (printed, exit 0);
/// storage and owner errors propagate to the operator.
pub fn surface_error(e: LedgerError) -> Result<()> {
    if e.is_user_facing() {
        println!("Error: {}", e);
        Ok(())
    } else {
        Err(e.into())
    }
}

pub fn account_by_name(conn: &Connection, name: &str) -> crate::error::Result<Account> {
    let row: Option<(i64, String, i64)> = conn
        .query_row(
            "SELECT id, kind, owner_id FROM accounts WHERE name=?1",
            params![name],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let (id, kind, owner_id) = row.ok_or_else(|| LedgerError::UnknownAccount(name.into()))?;
    Ok(Account {
        id,
        name: name.to_string(),
        kind: AccountKind::from_str(&kind)?,
        owner_id,
    })
}

pub fn asset_by_name(conn: &Connection, name: &str) -> crate::error::Result<Asset> {
    let row: Option<(i64, String, i64)> = conn
        .query_row(
            "SELECT id, category, owner_id FROM assets WHERE name=?1",
            params![name],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .optional()?;
    let (id, category, owner_id) = row.ok_or_else(|| LedgerError::UnknownAsset(name.into()))?;
    Ok(Asset {
        id,
        name: name.to_string(),
        category: AssetCategory::from_str(&category)?,
        owner_id,
    })
}

/// Number of entries referencing an account. Accounts may only be deleted
/// when this is zero.
pub fn account_usage_count(conn: &Connection, account_id: i64) -> crate::error::Result<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM entries WHERE account_id=?1",
        params![account_id],
        |r| r.get(0),
    )?;
    Ok(n)
}
