// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::models::MonthKey;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table, surface_error};
use crate::valuation;
use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("snapshot", sub)) => snapshot(conn, sub)?,
        Some(("annual", sub)) => annual(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn current_month() -> MonthKey {
    MonthKey::from_date(chrono::Utc::now().date_naive())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: u32 = *sub.get_one::<u32>("months").unwrap();
    let end = match sub.get_one::<String>("end").map(|s| parse_month(s)) {
        Some(Ok(m)) => m,
        Some(Err(e)) => return surface_error(e),
        None => current_month(),
    };

    let buckets = match ledger::monthly_cashflow(conn, end, months) {
        Ok(b) => b,
        Err(e) => return surface_error(e),
    };
    if maybe_print_json(json_flag, jsonl_flag, &buckets)? {
        return Ok(());
    }
    let rows = buckets
        .iter()
        .map(|b| {
            vec![
                b.month.to_string(),
                fmt_money(&b.income),
                fmt_money(&b.expense),
                fmt_money(&b.net),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Net"], rows)
    );
    Ok(())
}

fn snapshot(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = match sub.get_one::<String>("month").map(|s| parse_month(s)) {
        Some(Ok(m)) => m,
        Some(Err(e)) => return surface_error(e),
        None => current_month(),
    };

    let snap = valuation::monthly_snapshot(conn, month)?;
    if maybe_print_json(json_flag, jsonl_flag, &snap)? {
        return Ok(());
    }

    let rows = snap
        .categories
        .iter()
        .map(|c| {
            vec![
                c.category.to_string(),
                if c.category.is_liability() {
                    "liability".to_string()
                } else {
                    "asset".to_string()
                },
                fmt_money(&c.total),
                fmt_money(&c.prev_total),
                fmt_money(&c.change),
                format!("{:.1}%", c.change_percent),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Side", "Total", "Prev", "Change", "Change %"],
            rows
        )
    );
    println!(
        "{} | assets {} | liabilities {} | net worth {} ({}{} vs prev month)",
        snap.month,
        fmt_money(&snap.total_assets),
        fmt_money(&snap.total_liabilities),
        fmt_money(&snap.net_worth),
        if snap.net_worth_change.is_sign_negative() {
            ""
        } else {
            "+"
        },
        fmt_money(&snap.net_worth_change),
    );
    Ok(())
}

fn annual(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = chrono::Utc::now().date_naive();
    let year = sub
        .get_one::<i32>("year")
        .copied()
        .unwrap_or_else(|| today.year());

    let series = valuation::annual_series(conn, year, today)?;
    let summary = valuation::year_over_year(conn, year, today)?;
    if json_flag || jsonl_flag {
        let payload = serde_json::json!({ "series": series, "summary": summary });
        maybe_print_json(json_flag, jsonl_flag, &payload)?;
        return Ok(());
    }
    if series.is_empty() {
        println!("No months available for {}", year);
        return Ok(());
    }

    let rows = series
        .iter()
        .map(|m| {
            vec![
                m.month.to_string(),
                fmt_money(&m.total_assets),
                fmt_money(&m.total_liabilities),
                fmt_money(&m.net_worth),
                fmt_money(&m.net_worth_change),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Month", "Assets", "Liabilities", "Net worth", "MoM change"],
            rows
        )
    );
    if let Some(latest) = summary.latest_month {
        println!(
            "{} through {}: net worth {} vs {} in Dec {} ({}{})",
            year,
            latest,
            fmt_money(&summary.net_worth),
            fmt_money(&summary.prior_december_net_worth),
            year - 1,
            if summary.change.is_sign_negative() {
                ""
            } else {
                "+"
            },
            fmt_money(&summary.change),
        );
    }
    Ok(())
}
