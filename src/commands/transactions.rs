// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::ledger::{self, NewTransaction};
use crate::models::TransactionKind;
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_month, pretty_table,
    surface_error,
};
use anyhow::Result;
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = match parse_date(sub.get_one::<String>("date").unwrap()) {
        Ok(d) => d,
        Err(e) => return surface_error(crate::error::LedgerError::Validation(e.to_string())),
    };
    let description = sub.get_one::<String>("description").unwrap().clone();
    let amount = match parse_amount(sub.get_one::<String>("amount").unwrap()) {
        Ok(a) => a,
        Err(e) => return surface_error(e),
    };
    let kind = match TransactionKind::from_str(sub.get_one::<String>("kind").unwrap()) {
        Ok(k) => k,
        Err(e) => return surface_error(e),
    };
    let credit_account = sub.get_one::<String>("from").unwrap().clone();
    let debit_account = sub.get_one::<String>("to").unwrap().clone();

    let owner = db::owner_id(conn)?;
    let row = NewTransaction {
        date,
        description: description.clone(),
        amount,
        kind,
        credit_account: credit_account.clone(),
        debit_account: debit_account.clone(),
    };
    match ledger::record_batch(conn, owner, &[row]) {
        Ok(_) => {
            println!(
                "Recorded {} {} on {}: {} -> {} ('{}')",
                kind, amount, date, credit_account, debit_account, description
            );
            Ok(())
        }
        Err(e) => surface_error(e),
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = match sub.get_one::<String>("month").map(|s| parse_month(s)) {
        Some(Ok(m)) => Some(m),
        Some(Err(e)) => return surface_error(e),
        None => None,
    };
    let limit = sub.get_one::<usize>("limit").copied();

    let views = ledger::recent_transactions(conn, month, limit)?;
    let groups = ledger::group_by_month(views)?;
    if maybe_print_json(json_flag, jsonl_flag, &groups)? {
        return Ok(());
    }
    if groups.is_empty() {
        println!("No transactions recorded.");
        return Ok(());
    }
    for group in groups {
        println!("{} (month total {})", group.month, fmt_money(&group.total));
        let rows = group
            .transactions
            .into_iter()
            .map(|t| {
                vec![
                    t.date,
                    t.description,
                    t.kind.to_string(),
                    fmt_money(&t.amount),
                    format!("{} -> {}", t.credit_account, t.debit_account),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Description", "Kind", "Amount", "Flow"], rows)
        );
    }
    Ok(())
}
