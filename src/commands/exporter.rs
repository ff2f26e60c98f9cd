// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("values", sub)) => export_values(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.date, t.description, t.kind,
                (SELECT e.amount FROM entries e
                 WHERE e.transaction_id = t.id AND CAST(e.amount AS REAL) > 0),
                (SELECT a.name FROM entries e JOIN accounts a ON a.id = e.account_id
                 WHERE e.transaction_id = t.id AND CAST(e.amount AS REAL) < 0),
                (SELECT a.name FROM entries e JOIN accounts a ON a.id = e.account_id
                 WHERE e.transaction_id = t.id AND CAST(e.amount AS REAL) > 0)
         FROM transactions t
         ORDER BY t.date, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "description",
                "amount",
                "kind",
                "credit_account",
                "debit_account",
            ])?;
            for row in rows {
                let (date, description, kind, amount, credit, debit) = row?;
                wtr.write_record([
                    date,
                    description,
                    amount.unwrap_or_default(),
                    kind,
                    credit.unwrap_or_default(),
                    debit.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (date, description, kind, amount, credit, debit) = row?;
                items.push(json!({
                    "date": date, "description": description, "kind": kind,
                    "amount": amount, "credit_account": credit, "debit_account": debit
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_values(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT a.name, a.category, v.month, v.amount
         FROM asset_values v
         JOIN assets a ON a.id = v.asset_id
         ORDER BY v.month, a.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["asset", "category", "month", "amount"])?;
            for row in rows {
                let (asset, category, month, amount) = row?;
                wtr.write_record([asset, category, month, amount])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (asset, category, month, amount) = row?;
                items.push(json!({
                    "asset": asset, "category": category, "month": month, "amount": amount
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported asset values to {}", out);
    Ok(())
}
