// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::error::LedgerError;
use crate::models::AssetCategory;
use crate::utils::{asset_by_name, pretty_table, surface_error};
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
    let category = match AssetCategory::from_str(sub.get_one::<String>("category").unwrap()) {
        Ok(c) => c,
        Err(e) => return surface_error(e),
    };
    if name.is_empty() {
        return surface_error(LedgerError::Validation(
            "Asset name must not be empty".to_string(),
        ));
    }
    let owner = db::owner_id(conn)?;
    conn.execute(
        "INSERT INTO assets(name, category, owner_id) VALUES (?1, ?2, ?3)",
        params![name, category.as_str(), owner],
    )?;
    println!("Added asset '{}' ({})", name, category);
    Ok(())
}

#[derive(Serialize)]
struct AssetRow {
    name: String,
    category: String,
    snapshots: i64,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT a.name, a.category, COUNT(v.id)
         FROM assets a
         LEFT JOIN asset_values v ON v.asset_id = a.id
         GROUP BY a.id ORDER BY a.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(AssetRow {
            name: r.get(0)?,
            category: r.get(1)?,
            snapshots: r.get(2)?,
        })
    })?;
    let data: Vec<AssetRow> = rows.collect::<rusqlite::Result<_>>()?;
    if !crate::utils::maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|a| vec![a.name, a.category, a.snapshots.to_string()])
            .collect();
        println!("{}", pretty_table(&["Name", "Category", "Snapshots"], rows));
    }
    Ok(())
}

fn rename(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let new_name = sub.get_one::<String>("new_name").unwrap().trim();
    if new_name.is_empty() {
        return surface_error(LedgerError::Validation(
            "Asset name must not be empty".to_string(),
        ));
    }
    let n = conn.execute(
        "UPDATE assets SET name=?1 WHERE name=?2",
        params![new_name, name],
    )?;
    if n == 0 {
        return surface_error(LedgerError::UnknownAsset(name.clone()));
    }
    println!("Renamed asset '{}' to '{}'", name, new_name);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let asset = match asset_by_name(conn, name) {
        Ok(a) => a,
        Err(e) => return surface_error(e),
    };
    // Value snapshots cascade with the asset.
    conn.execute("DELETE FROM assets WHERE id=?1", params![asset.id])?;
    println!("Removed asset '{}' and its value snapshots", name);
    Ok(())
}
