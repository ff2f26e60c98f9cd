// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use assetbook::models::{AssetCategory, MonthKey};
use assetbook::{db, utils, valuation};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let owner = db::ensure_owner(&conn, "test@example.com").unwrap();
    for (name, category) in [
        ("Bank Account", "CASH"),
        ("Brokerage", "STOCK"),
        ("Mortgage", "LOAN"),
    ] {
        conn.execute(
            "INSERT INTO assets(name, category, owner_id) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, category, owner],
        )
        .unwrap();
    }
    conn
}

fn set(conn: &Connection, asset: &str, month: MonthKey, amount: i64) {
    let id = utils::asset_by_name(conn, asset).unwrap().id;
    valuation::upsert_value(conn, id, month, Decimal::from(amount)).unwrap();
}

fn m(year: i32, month: u32) -> MonthKey {
    MonthKey { year, month }
}

#[test]
fn upsert_overwrites_the_month_row() {
    let conn = setup();
    let id = utils::asset_by_name(&conn, "Bank Account").unwrap().id;
    valuation::upsert_value(&conn, id, m(2025, 8), Decimal::from(100)).unwrap();
    valuation::upsert_value(&conn, id, m(2025, 8), Decimal::from(250)).unwrap();

    let (count, amount): (i64, String) = conn
        .query_row(
            "SELECT COUNT(*), MAX(amount) FROM asset_values WHERE asset_id=?1 AND month='2025-08'",
            [id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(count, 1);
    assert_eq!(amount, "250");
}

#[test]
fn snapshot_matches_worked_example() {
    // Cash 1000 this month / 800 prior; Loan 200 / 200.
    let conn = setup();
    set(&conn, "Bank Account", m(2025, 8), 1000);
    set(&conn, "Bank Account", m(2025, 7), 800);
    set(&conn, "Mortgage", m(2025, 8), 200);
    set(&conn, "Mortgage", m(2025, 7), 200);

    let snap = valuation::monthly_snapshot(&conn, m(2025, 8)).unwrap();
    assert_eq!(snap.total_assets, Decimal::from(1000));
    assert_eq!(snap.total_liabilities, Decimal::from(200));
    assert_eq!(snap.net_worth, Decimal::from(800));

    let cash = snap
        .categories
        .iter()
        .find(|c| c.category == AssetCategory::Cash)
        .unwrap();
    assert_eq!(cash.change, Decimal::from(200));
    assert_eq!(cash.change_percent, Decimal::from(25));

    let loan = snap
        .categories
        .iter()
        .find(|c| c.category == AssetCategory::Loan)
        .unwrap();
    assert_eq!(loan.change, Decimal::ZERO);
    assert_eq!(loan.change_percent, Decimal::ZERO);
}

#[test]
fn change_percent_is_zero_when_prior_total_is_zero() {
    let conn = setup();
    set(&conn, "Brokerage", m(2025, 8), 500);

    let snap = valuation::monthly_snapshot(&conn, m(2025, 8)).unwrap();
    let stock = snap
        .categories
        .iter()
        .find(|c| c.category == AssetCategory::Stock)
        .unwrap();
    assert_eq!(stock.change, Decimal::from(500));
    assert_eq!(stock.change_percent, Decimal::ZERO);
}

#[test]
fn month_without_rows_is_a_flat_zero_snapshot() {
    let conn = setup();
    // A value exists in January only; March must not carry it forward.
    set(&conn, "Bank Account", m(2025, 1), 700);

    let snap = valuation::monthly_snapshot(&conn, m(2025, 3)).unwrap();
    assert_eq!(snap.total_assets, Decimal::ZERO);
    assert_eq!(snap.total_liabilities, Decimal::ZERO);
    assert_eq!(snap.net_worth, Decimal::ZERO);
    for p in &snap.positions {
        assert_eq!(p.current, Decimal::ZERO);
    }
}

#[test]
fn snapshot_with_no_assets_at_all_is_zero() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let snap = valuation::monthly_snapshot(&conn, m(2025, 8)).unwrap();
    assert_eq!(snap.net_worth, Decimal::ZERO);
    assert!(snap.positions.is_empty());
    assert_eq!(snap.categories.len(), 7);
}

#[test]
fn january_change_compares_against_prior_december() {
    let conn = setup();
    set(&conn, "Bank Account", m(2024, 12), 100);
    set(&conn, "Bank Account", m(2025, 1), 300);

    let today = NaiveDate::from_ymd_opt(2026, 4, 15).unwrap();
    let series = valuation::annual_series(&conn, 2025, today).unwrap();
    assert_eq!(series.len(), 12);
    assert_eq!(series[0].month, m(2025, 1));
    assert_eq!(series[0].net_worth, Decimal::from(300));
    assert_eq!(series[0].net_worth_change, Decimal::from(200));
}

#[test]
fn current_year_series_stops_at_current_month() {
    let conn = setup();
    set(&conn, "Bank Account", m(2025, 2), 100);

    let today = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
    let series = valuation::annual_series(&conn, 2025, today).unwrap();
    assert_eq!(series.len(), 6);
    assert_eq!(series.last().unwrap().month, m(2025, 6));
    // February's value does not leak into later months.
    assert_eq!(series[2].net_worth, Decimal::ZERO);
    assert_eq!(series[2].net_worth_change, Decimal::from(-100));
}

#[test]
fn year_over_year_uses_latest_month_vs_prior_december() {
    let conn = setup();
    set(&conn, "Bank Account", m(2024, 12), 1000);
    set(&conn, "Bank Account", m(2025, 5), 1500);
    set(&conn, "Mortgage", m(2025, 5), 300);

    let today = NaiveDate::from_ymd_opt(2025, 5, 20).unwrap();
    let summary = valuation::year_over_year(&conn, 2025, today).unwrap();
    assert_eq!(summary.latest_month, Some(m(2025, 5)));
    assert_eq!(summary.net_worth, Decimal::from(1200));
    assert_eq!(summary.prior_december_net_worth, Decimal::from(1000));
    assert_eq!(summary.change, Decimal::from(200));
}

#[test]
fn liabilities_net_against_assets_in_series() {
    let conn = setup();
    set(&conn, "Bank Account", m(2025, 3), 900);
    set(&conn, "Mortgage", m(2025, 3), 400);

    let today = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
    let series = valuation::annual_series(&conn, 2025, today).unwrap();
    let march = &series[2];
    assert_eq!(march.total_assets, Decimal::from(900));
    assert_eq!(march.total_liabilities, Decimal::from(400));
    assert_eq!(march.net_worth, Decimal::from(500));
}
