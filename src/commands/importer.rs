// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::ledger::{self, NewTransaction};
use crate::models::TransactionKind;
use crate::utils::{parse_amount, parse_date, surface_error};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

/// Expected columns: date, description, amount, kind, credit_account,
/// debit_account. The whole file is one atomic batch: a bad row means
/// nothing is persisted.
fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("file").unwrap().trim();
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let rec = result?;
        let line = i + 2; // header is line 1
        let date_raw = rec
            .get(0)
            .with_context(|| format!("date missing on line {}", line))?
            .trim();
        let description = rec
            .get(1)
            .with_context(|| format!("description missing on line {}", line))?
            .trim()
            .to_string();
        let amount_raw = rec
            .get(2)
            .with_context(|| format!("amount missing on line {}", line))?
            .trim();
        let kind_raw = rec
            .get(3)
            .with_context(|| format!("kind missing on line {}", line))?
            .trim();
        let credit_account = rec
            .get(4)
            .with_context(|| format!("credit_account missing on line {}", line))?
            .trim()
            .to_string();
        let debit_account = rec
            .get(5)
            .with_context(|| format!("debit_account missing on line {}", line))?
            .trim()
            .to_string();

        let date = parse_date(date_raw)
            .with_context(|| format!("Invalid date '{}' on line {}", date_raw, line))?;
        let amount = match parse_amount(amount_raw) {
            Ok(a) => a,
            Err(e) => return surface_error(e),
        };
        let kind = match TransactionKind::from_str(kind_raw) {
            Ok(k) => k,
            Err(e) => return surface_error(e),
        };
        rows.push(NewTransaction {
            date,
            description,
            amount,
            kind,
            credit_account,
            debit_account,
        });
    }

    let owner = db::owner_id(conn)?;
    match ledger::record_batch(conn, owner, &rows) {
        Ok(n) => {
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        Err(e) => surface_error(e),
    }
}
