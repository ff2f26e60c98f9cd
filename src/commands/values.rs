// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::MonthKey;
use crate::utils::{asset_by_name, fmt_money, maybe_print_json, parse_amount, parse_month, pretty_table, surface_error};
use crate::valuation;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("asset").unwrap();
    let month = match parse_month(sub.get_one::<String>("month").unwrap()) {
        Ok(m) => m,
        Err(e) => return surface_error(e),
    };
    let amount = match parse_amount(sub.get_one::<String>("amount").unwrap()) {
        Ok(a) => a,
        Err(e) => return surface_error(e),
    };
    let asset = match asset_by_name(conn, name) {
        Ok(a) => a,
        Err(e) => return surface_error(e),
    };
    valuation::upsert_value(conn, asset.id, month, amount)?;
    println!("Set {} for {} = {}", name, month, amount);
    Ok(())
}

#[derive(Serialize)]
struct ValueRow {
    asset: String,
    category: String,
    month: MonthKey,
    amount: Decimal,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = match sub.get_one::<String>("month").map(|s| parse_month(s)) {
        Some(Ok(m)) => m,
        Some(Err(e)) => return surface_error(e),
        None => MonthKey::from_date(chrono::Utc::now().date_naive()),
    };

    let mut stmt = conn.prepare(
        "SELECT a.name, a.category, v.amount
         FROM asset_values v
         JOIN assets a ON a.id = v.asset_id
         WHERE v.month = ?1
         ORDER BY a.name",
    )?;
    let mut cur = stmt.query(params![month.to_string()])?;
    let mut data = Vec::new();
    while let Some(r) = cur.next()? {
        let asset: String = r.get(0)?;
        let category: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let amount = amount
            .parse::<Decimal>()
            .with_context(|| format!("Invalid stored amount '{}' for {}", amount, asset))?;
        data.push(ValueRow {
            asset,
            category,
            month,
            amount,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|v| vec![v.asset, v.category, v.month.to_string(), fmt_money(&v.amount)])
            .collect();
        println!(
            "{}",
            pretty_table(&["Asset", "Category", "Month", "Amount"], rows)
        );
    }
    Ok(())
}
