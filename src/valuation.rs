// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::{LedgerError, Result};
use crate::models::{AssetCategory, MonthKey};

/// Write the value snapshot for (asset, month), overwriting any existing
/// row for that key. This is the sole mutation path for historical
/// valuation data; concurrent writers race on last-write-wins.
pub fn upsert_value(
    conn: &Connection,
    asset_id: i64,
    month: MonthKey,
    amount: Decimal,
) -> Result<()> {
    conn.execute(
        "INSERT INTO asset_values(asset_id, month, amount) VALUES (?1, ?2, ?3)
         ON CONFLICT(asset_id, month) DO UPDATE SET amount=excluded.amount",
        params![asset_id, month.to_string(), amount.to_string()],
    )?;
    Ok(())
}

fn month_values(conn: &Connection, month: MonthKey) -> Result<HashMap<i64, Decimal>> {
    let mut stmt =
        conn.prepare("SELECT asset_id, amount FROM asset_values WHERE month=?1")?;
    let mut cur = stmt.query(params![month.to_string()])?;
    let mut map = HashMap::new();
    while let Some(r) = cur.next()? {
        let asset_id: i64 = r.get(0)?;
        let amount: String = r.get(1)?;
        let amount = amount
            .parse::<Decimal>()
            .map_err(|_| LedgerError::Validation(format!("Invalid stored amount '{}'", amount)))?;
        map.insert(asset_id, amount);
    }
    Ok(map)
}

fn change_percent(change: Decimal, prev: Decimal) -> Decimal {
    // Guard: when the prior total is zero the percent change is reported
    // as 0, never infinite or undefined.
    if prev.is_zero() {
        Decimal::ZERO
    } else {
        change / prev * Decimal::from(100)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetPosition {
    pub name: String,
    pub category: AssetCategory,
    pub current: Decimal,
    pub prev: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub category: AssetCategory,
    pub total: Decimal,
    pub prev_total: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub month: MonthKey,
    pub positions: Vec<AssetPosition>,
    pub categories: Vec<CategoryTotal>,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
    pub prev_total_assets: Decimal,
    pub prev_total_liabilities: Decimal,
    pub prev_net_worth: Decimal,
    pub net_worth_change: Decimal,
}

/// The category/total picture for one month. Assets without a snapshot for
/// the month contribute zero; there is no carry-forward across gaps, and a
/// month with no rows at all is a valid flat-zero snapshot.
pub fn monthly_snapshot(conn: &Connection, month: MonthKey) -> Result<Snapshot> {
    let current = month_values(conn, month)?;
    let prior = month_values(conn, month.prev())?;

    let mut stmt = conn.prepare("SELECT id, name, category FROM assets ORDER BY name")?;
    let mut cur = stmt.query([])?;
    let mut positions = Vec::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let category: String = r.get(2)?;
        let category = AssetCategory::from_str(&category)?;
        let value = current.get(&id).copied().unwrap_or(Decimal::ZERO);
        let prev = prior.get(&id).copied().unwrap_or(Decimal::ZERO);
        let change = value - prev;
        positions.push(AssetPosition {
            name,
            category,
            current: value,
            prev,
            change,
            change_percent: change_percent(change, prev),
        });
    }

    let mut categories = Vec::with_capacity(AssetCategory::ALL.len());
    let mut total_assets = Decimal::ZERO;
    let mut total_liabilities = Decimal::ZERO;
    let mut prev_total_assets = Decimal::ZERO;
    let mut prev_total_liabilities = Decimal::ZERO;
    for category in AssetCategory::ALL {
        let total: Decimal = positions
            .iter()
            .filter(|p| p.category == category)
            .map(|p| p.current)
            .sum();
        let prev_total: Decimal = positions
            .iter()
            .filter(|p| p.category == category)
            .map(|p| p.prev)
            .sum();
        let change = total - prev_total;
        if category.is_liability() {
            total_liabilities += total;
            prev_total_liabilities += prev_total;
        } else {
            total_assets += total;
            prev_total_assets += prev_total;
        }
        categories.push(CategoryTotal {
            category,
            total,
            prev_total,
            change,
            change_percent: change_percent(change, prev_total),
        });
    }

    let net_worth = total_assets - total_liabilities;
    let prev_net_worth = prev_total_assets - prev_total_liabilities;
    Ok(Snapshot {
        month,
        positions,
        categories,
        total_assets,
        total_liabilities,
        net_worth,
        prev_total_assets,
        prev_total_liabilities,
        prev_net_worth,
        net_worth_change: net_worth - prev_net_worth,
    })
}

fn totals_at(conn: &Connection, month: MonthKey) -> Result<(Decimal, Decimal)> {
    let mut stmt = conn.prepare(
        "SELECT a.category, v.amount
         FROM assets a
         LEFT JOIN asset_values v ON v.asset_id = a.id AND v.month = ?1",
    )?;
    let mut cur = stmt.query(params![month.to_string()])?;
    let mut assets = Decimal::ZERO;
    let mut liabilities = Decimal::ZERO;
    while let Some(r) = cur.next()? {
        let category: String = r.get(0)?;
        let amount: Option<String> = r.get(1)?;
        let Some(amount) = amount else { continue };
        let amount = amount
            .parse::<Decimal>()
            .map_err(|_| LedgerError::Validation(format!("Invalid stored amount '{}'", amount)))?;
        if AssetCategory::from_str(&category)?.is_liability() {
            liabilities += amount;
        } else {
            assets += amount;
        }
    }
    Ok((assets, liabilities))
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthNetWorth {
    pub month: MonthKey,
    pub total_assets: Decimal,
    pub total_liabilities: Decimal,
    pub net_worth: Decimal,
    pub net_worth_change: Decimal,
}

/// One net-worth row per month of `year`, up to and including the current
/// month when `year` is the current year. The change for January compares
/// against December of the prior year rather than resetting at the year
/// boundary.
pub fn annual_series(conn: &Connection, year: i32, today: NaiveDate) -> Result<Vec<MonthNetWorth>> {
    let last_month = if year < today.year() {
        12
    } else if year == today.year() {
        today.month()
    } else {
        0
    };

    let prior_december = MonthKey { year: year - 1, month: 12 };
    let (a, l) = totals_at(conn, prior_december)?;
    let mut prev_net_worth = a - l;

    let mut series = Vec::with_capacity(last_month as usize);
    for month in 1..=last_month {
        let key = MonthKey { year, month };
        let (total_assets, total_liabilities) = totals_at(conn, key)?;
        let net_worth = total_assets - total_liabilities;
        series.push(MonthNetWorth {
            month: key,
            total_assets,
            total_liabilities,
            net_worth,
            net_worth_change: net_worth - prev_net_worth,
        });
        prev_net_worth = net_worth;
    }
    Ok(series)
}

#[derive(Debug, Clone, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub latest_month: Option<MonthKey>,
    pub net_worth: Decimal,
    pub prior_december_net_worth: Decimal,
    pub change: Decimal,
}

/// Year-over-year: the latest available month of `year` against December
/// of the prior year.
pub fn year_over_year(conn: &Connection, year: i32, today: NaiveDate) -> Result<YearSummary> {
    let prior_december = MonthKey { year: year - 1, month: 12 };
    let (a, l) = totals_at(conn, prior_december)?;
    let prior_december_net_worth = a - l;

    let series = annual_series(conn, year, today)?;
    let (latest_month, net_worth) = match series.last() {
        Some(last) => (Some(last.month), last.net_worth),
        None => (None, Decimal::ZERO),
    };
    Ok(YearSummary {
        year,
        latest_month,
        net_worth,
        prior_december_net_worth,
        change: net_worth - prior_december_net_worth,
    })
}
