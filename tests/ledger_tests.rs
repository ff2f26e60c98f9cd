// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use assetbook::error::LedgerError;
use assetbook::ledger::{self, NewTransaction};
use assetbook::models::{MonthKey, TransactionKind};
use assetbook::{db, utils};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> (Connection, i64) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let owner = db::ensure_owner(&conn, "test@example.com").unwrap();
    for (name, kind) in [
        ("Cash", "ASSET"),
        ("Credit Card", "LIABILITY"),
        ("Groceries", "EXPENSE"),
        ("Salary", "REVENUE"),
    ] {
        conn.execute(
            "INSERT INTO accounts(name, kind, owner_id) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, kind, owner],
        )
        .unwrap();
    }
    (conn, owner)
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn expense(date: &str, desc: &str, amount: &str) -> NewTransaction {
    NewTransaction {
        date: d(date),
        description: desc.to_string(),
        amount: amount.parse().unwrap(),
        kind: TransactionKind::Expense,
        credit_account: "Cash".to_string(),
        debit_account: "Groceries".to_string(),
    }
}

fn income(date: &str, desc: &str, amount: &str) -> NewTransaction {
    NewTransaction {
        date: d(date),
        description: desc.to_string(),
        amount: amount.parse().unwrap(),
        kind: TransactionKind::Income,
        credit_account: "Salary".to_string(),
        debit_account: "Cash".to_string(),
    }
}

#[test]
fn entries_balance_to_zero() {
    let (mut conn, owner) = setup();
    ledger::record_batch(&mut conn, owner, &[expense("2025-03-10", "lunch", "12.50")]).unwrap();

    let (sum, positives, negatives): (f64, i64, i64) = conn
        .query_row(
            "SELECT SUM(CAST(amount AS REAL)),
                    SUM(CAST(amount AS REAL) > 0),
                    SUM(CAST(amount AS REAL) < 0)
             FROM entries",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(sum, 0.0);
    assert_eq!(positives, 1);
    assert_eq!(negatives, 1);
}

#[test]
fn expense_must_debit_expense_account() {
    let (mut conn, owner) = setup();
    let mut row = expense("2025-03-10", "wrong way", "10");
    row.debit_account = "Cash".to_string();
    let err = ledger::record_batch(&mut conn, owner, &[row]).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn income_must_credit_revenue_account() {
    let (mut conn, owner) = setup();
    let mut row = income("2025-03-10", "payday", "100");
    row.credit_account = "Groceries".to_string();
    let err = ledger::record_batch(&mut conn, owner, &[row]).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn unknown_account_is_referential_error() {
    let (mut conn, owner) = setup();
    let mut row = expense("2025-03-10", "typo", "10");
    row.credit_account = "Csah".to_string();
    let err = ledger::record_batch(&mut conn, owner, &[row]).unwrap_err();
    assert!(matches!(err, LedgerError::UnknownAccount(_)));
}

#[test]
fn batch_is_all_or_nothing() {
    let (mut conn, owner) = setup();
    let rows = vec![
        expense("2025-03-01", "ok row", "10"),
        expense("2025-03-02", "   ", "20"), // blank description
    ];
    let err = ledger::record_batch(&mut conn, owner, &rows).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0, "a failing row must roll back the whole batch");
}

#[test]
fn rejects_non_positive_magnitude() {
    let (mut conn, owner) = setup();
    let err =
        ledger::record_batch(&mut conn, owner, &[expense("2025-03-01", "neg", "-5")]).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn cashflow_window_is_exactly_n_buckets() {
    let (conn, _) = setup();
    let end = MonthKey { year: 2025, month: 6 };
    let buckets = ledger::monthly_cashflow(&conn, end, 12).unwrap();
    assert_eq!(buckets.len(), 12);
    assert_eq!(buckets[0].month, MonthKey { year: 2024, month: 7 });
    assert_eq!(buckets[11].month, end);
    for w in buckets.windows(2) {
        assert!(w[0].month < w[1].month, "buckets must be chronological");
    }
    for b in &buckets {
        assert_eq!(b.income, Decimal::ZERO);
        assert_eq!(b.expense, Decimal::ZERO);
        assert_eq!(b.net, Decimal::ZERO);
    }
}

#[test]
fn cashflow_sums_debit_side_by_kind() {
    let (mut conn, owner) = setup();
    ledger::record_batch(
        &mut conn,
        owner,
        &[
            income("2025-01-25", "salary", "3000"),
            expense("2025-01-05", "groceries", "120"),
            expense("2025-01-20", "more groceries", "80"),
            expense("2025-03-02", "march spend", "50"),
        ],
    )
    .unwrap();

    let buckets =
        ledger::monthly_cashflow(&conn, MonthKey { year: 2025, month: 3 }, 3).unwrap();
    assert_eq!(buckets.len(), 3);

    let jan = &buckets[0];
    assert_eq!(jan.month, MonthKey { year: 2025, month: 1 });
    assert_eq!(jan.income, Decimal::from(3000));
    assert_eq!(jan.expense, Decimal::from(200));
    assert_eq!(jan.net, Decimal::from(2800));

    let feb = &buckets[1];
    assert_eq!(feb.income, Decimal::ZERO);
    assert_eq!(feb.expense, Decimal::ZERO);

    let mar = &buckets[2];
    assert_eq!(mar.expense, Decimal::from(50));
    assert_eq!(mar.net, Decimal::from(-50));
}

#[test]
fn listing_groups_by_month_with_debit_totals() {
    let (mut conn, owner) = setup();
    ledger::record_batch(
        &mut conn,
        owner,
        &[
            expense("2025-01-05", "jan a", "10"),
            expense("2025-01-20", "jan b", "15"),
            income("2025-02-01", "feb pay", "100"),
        ],
    )
    .unwrap();

    let views = ledger::recent_transactions(&conn, None, None).unwrap();
    assert_eq!(views.len(), 3);
    assert_eq!(views[0].date, "2025-02-01");
    assert_eq!(views[0].credit_account, "Salary");
    assert_eq!(views[0].debit_account, "Cash");

    let groups = ledger::group_by_month(views).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].month, MonthKey { year: 2025, month: 2 });
    assert_eq!(groups[0].total, Decimal::from(100));
    assert_eq!(groups[1].month, MonthKey { year: 2025, month: 1 });
    assert_eq!(groups[1].total, Decimal::from(25));
}

#[test]
fn listing_respects_month_filter_and_limit() {
    let (mut conn, owner) = setup();
    ledger::record_batch(
        &mut conn,
        owner,
        &[
            expense("2025-01-05", "jan", "10"),
            expense("2025-02-05", "feb a", "10"),
            expense("2025-02-06", "feb b", "10"),
        ],
    )
    .unwrap();

    let feb = ledger::recent_transactions(
        &conn,
        Some(MonthKey { year: 2025, month: 2 }),
        None,
    )
    .unwrap();
    assert_eq!(feb.len(), 2);

    let limited = ledger::recent_transactions(&conn, None, Some(1)).unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].date, "2025-02-06");
}

#[test]
fn usage_count_tracks_entries() {
    let (mut conn, owner) = setup();
    ledger::record_batch(
        &mut conn,
        owner,
        &[
            expense("2025-01-05", "a", "10"),
            expense("2025-01-06", "b", "10"),
        ],
    )
    .unwrap();
    let cash = utils::account_by_name(&conn, "Cash").unwrap();
    assert_eq!(utils::account_usage_count(&conn, cash.id).unwrap(), 2);
    let salary = utils::account_by_name(&conn, "Salary").unwrap();
    assert_eq!(utils::account_usage_count(&conn, salary.id).unwrap(), 0);
}
