// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::error::LedgerError;
use crate::models::AccountKind;
use crate::utils::{account_by_name, account_usage_count, pretty_table, surface_error};
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rename", sub)) => rename(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    let kind = match AccountKind::from_str(sub.get_one::<String>("kind").unwrap()) {
        Ok(k) => k,
        Err(e) => return surface_error(e),
    };
    if name.is_empty() {
        return surface_error(LedgerError::Validation(
            "Account name must not be empty".to_string(),
        ));
    }
    let owner = db::owner_id(conn)?;
    conn.execute(
        "INSERT INTO accounts(name, kind, owner_id) VALUES (?1, ?2, ?3)",
        params![name, kind.as_str(), owner],
    )?;
    println!("Added account '{}' ({})", name, kind);
    Ok(())
}

#[derive(Serialize)]
struct AccountRow {
    name: String,
    kind: String,
    usage_count: i64,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT a.name, a.kind, COUNT(e.id)
         FROM accounts a
         LEFT JOIN entries e ON e.account_id = a.id
         GROUP BY a.id ORDER BY a.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(AccountRow {
            name: r.get(0)?,
            kind: r.get(1)?,
            usage_count: r.get(2)?,
        })
    })?;
    let data: Vec<AccountRow> = rows.collect::<rusqlite::Result<_>>()?;
    if !crate::utils::maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|a| vec![a.name, a.kind, a.usage_count.to_string()])
            .collect();
        println!("{}", pretty_table(&["Name", "Kind", "Entries"], rows));
    }
    Ok(())
}

fn rename(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let new_name = sub.get_one::<String>("new_name").unwrap().trim();
    if new_name.is_empty() {
        return surface_error(LedgerError::Validation(
            "Account name must not be empty".to_string(),
        ));
    }
    // Only the name changes; the kind stays fixed so historical entries
    // keep their meaning.
    let n = conn.execute(
        "UPDATE accounts SET name=?1 WHERE name=?2",
        params![new_name, name],
    )?;
    if n == 0 {
        return surface_error(LedgerError::UnknownAccount(name.clone()));
    }
    println!("Renamed account '{}' to '{}'", name, new_name);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let account = match account_by_name(conn, name) {
        Ok(a) => a,
        Err(e) => return surface_error(e),
    };
    let count = account_usage_count(conn, account.id)?;
    if count > 0 {
        return surface_error(LedgerError::AccountInUse {
            name: account.name,
            count,
        });
    }
    conn.execute("DELETE FROM accounts WHERE id=?1", params![account.id])?;
    println!("Removed account '{}'", name);
    Ok(())
}
