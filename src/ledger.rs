// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use crate::error::{LedgerError, Result};
use crate::models::{AccountKind, MonthKey, TransactionKind};
use crate::utils::{account_by_name, parse_date};

/// One pending ledger row: a dated event that becomes a transaction plus
/// two balancing entries (+amount on the debit account, -amount on the
/// credit account).
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub credit_account: String,
    pub debit_account: String,
}

fn check_pairing(
    kind: TransactionKind,
    debit: (&str, AccountKind),
    credit: (&str, AccountKind),
) -> Result<()> {
    match kind {
        TransactionKind::Expense => {
            if debit.1 != AccountKind::Expense {
                return Err(LedgerError::Validation(format!(
                    "Expense must debit an EXPENSE account, but '{}' is {}",
                    debit.0, debit.1
                )));
            }
            if !credit.1.holds_funds() {
                return Err(LedgerError::Validation(format!(
                    "Expense must credit an ASSET or LIABILITY account, but '{}' is {}",
                    credit.0, credit.1
                )));
            }
        }
        TransactionKind::Income => {
            if !debit.1.holds_funds() {
                return Err(LedgerError::Validation(format!(
                    "Income must debit an ASSET or LIABILITY account, but '{}' is {}",
                    debit.0, debit.1
                )));
            }
            if credit.1 != AccountKind::Revenue {
                return Err(LedgerError::Validation(format!(
                    "Income must credit a REVENUE account, but '{}' is {}",
                    credit.0, credit.1
                )));
            }
        }
    }
    Ok(())
}

/// Record a batch of transactions atomically: each row creates one
/// transaction and its two balancing entries, and a failure on any row
/// rolls back the whole batch.
pub fn record_batch(
    conn: &mut Connection,
    owner_id: i64,
    rows: &[NewTransaction],
) -> Result<usize> {
    if rows.is_empty() {
        return Err(LedgerError::Validation(
            "No transactions to record".to_string(),
        ));
    }
    let tx = conn.transaction()?;
    for row in rows {
        let description = row.description.trim();
        if description.is_empty() {
            return Err(LedgerError::Validation(format!(
                "Missing description for transaction on {}",
                row.date
            )));
        }
        if row.amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "Amount must be a positive magnitude, got '{}' for '{}'",
                row.amount, description
            )));
        }
        let debit = account_by_name(&tx, &row.debit_account)?;
        let credit = account_by_name(&tx, &row.credit_account)?;
        check_pairing(
            row.kind,
            (&debit.name, debit.kind),
            (&credit.name, credit.kind),
        )?;

        tx.execute(
            "INSERT INTO transactions(date, description, kind, owner_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                row.date.to_string(),
                description,
                row.kind.as_str(),
                owner_id
            ],
        )?;
        let tx_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO entries(amount, account_id, transaction_id) VALUES (?1, ?2, ?3)",
            params![row.amount.to_string(), debit.id, tx_id],
        )?;
        tx.execute(
            "INSERT INTO entries(amount, account_id, transaction_id) VALUES (?1, ?2, ?3)",
            params![(-row.amount).to_string(), credit.id, tx_id],
        )?;
    }
    tx.commit()?;
    Ok(rows.len())
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthCashflow {
    pub month: MonthKey,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Income/expense/net per calendar month over a rolling window of exactly
/// `months` buckets ending at `end` inclusive. Empty months stay in the
/// series as zero-filled buckets.
pub fn monthly_cashflow(
    conn: &Connection,
    end: MonthKey,
    months: u32,
) -> Result<Vec<MonthCashflow>> {
    if months == 0 {
        return Err(LedgerError::Validation(
            "Window must cover at least one month".to_string(),
        ));
    }
    let mut keys = Vec::with_capacity(months as usize);
    let mut k = end;
    for _ in 0..months {
        keys.push(k);
        k = k.prev();
    }
    keys.reverse();
    let start = keys[0];

    let mut buckets: Vec<MonthCashflow> = keys
        .into_iter()
        .map(|month| MonthCashflow {
            month,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            net: Decimal::ZERO,
        })
        .collect();

    let mut stmt = conn.prepare(
        "SELECT t.date, t.kind, e.amount
         FROM transactions t
         JOIN entries e ON e.transaction_id = t.id
         WHERE t.date >= ?1 AND t.date < ?2",
    )?;
    let mut cur = stmt.query(params![
        start.first_day().to_string(),
        end.next().first_day().to_string()
    ])?;
    while let Some(r) = cur.next()? {
        let date: String = r.get(0)?;
        let kind: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let amount = amount
            .parse::<Decimal>()
            .map_err(|_| LedgerError::Validation(format!("Invalid stored amount '{}'", amount)))?;
        // The transaction magnitude is the debit side only; summing both
        // entries would always give zero.
        if amount <= Decimal::ZERO {
            continue;
        }
        let month = MonthKey::from_date(
            parse_date(&date)
                .map_err(|_| LedgerError::Validation(format!("Invalid stored date '{}'", date)))?,
        );
        let idx = month.months_since(start);
        if idx < 0 || idx >= buckets.len() as i64 {
            continue;
        }
        let bucket = &mut buckets[idx as usize];
        match TransactionKind::from_str(&kind)? {
            TransactionKind::Income => bucket.income += amount,
            TransactionKind::Expense => bucket.expense += amount,
        }
        bucket.net = bucket.income - bucket.expense;
    }
    Ok(buckets)
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub credit_account: String,
    pub debit_account: String,
}

/// Recent transactions, newest first, optionally restricted to one month.
pub fn recent_transactions(
    conn: &Connection,
    month: Option<MonthKey>,
    limit: Option<usize>,
) -> Result<Vec<TransactionView>> {
    let mut sql =
        String::from("SELECT id, date, description, kind FROM transactions WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(m) = month {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(m.to_string());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut heads = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let description: String = r.get(2)?;
        let kind: String = r.get(3)?;
        heads.push((id, date, description, TransactionKind::from_str(&kind)?));
    }

    let mut data = Vec::with_capacity(heads.len());
    for (id, date, description, kind) in heads {
        let mut estmt = conn.prepare(
            "SELECT e.amount, a.name FROM entries e
             JOIN accounts a ON a.id = e.account_id
             WHERE e.transaction_id = ?1",
        )?;
        let mut amount = Decimal::ZERO;
        let mut credit_account = String::new();
        let mut debit_account = String::new();
        let mut cur = estmt.query(params![id])?;
        while let Some(r) = cur.next()? {
            let amt: String = r.get(0)?;
            let name: String = r.get(1)?;
            let amt = amt
                .parse::<Decimal>()
                .map_err(|_| LedgerError::Validation(format!("Invalid stored amount '{}'", amt)))?;
            if amt > Decimal::ZERO {
                amount = amt;
                debit_account = name;
            } else {
                credit_account = name;
            }
        }
        data.push(TransactionView {
            id,
            date,
            description,
            kind,
            amount,
            credit_account,
            debit_account,
        });
    }
    Ok(data)
}

#[derive(Debug, Serialize)]
pub struct MonthGroup {
    pub month: MonthKey,
    pub total: Decimal,
    pub transactions: Vec<TransactionView>,
}

/// Group an already date-descending listing by calendar month, with the
/// per-month sum of debit-side magnitudes.
pub fn group_by_month(views: Vec<TransactionView>) -> Result<Vec<MonthGroup>> {
    let mut groups: Vec<MonthGroup> = Vec::new();
    for view in views {
        let month = MonthKey::from_date(
            parse_date(&view.date).map_err(|_| {
                LedgerError::Validation(format!("Invalid stored date '{}'", view.date))
            })?,
        );
        match groups.last_mut() {
            Some(g) if g.month == month => {
                g.total += view.amount;
                g.transactions.push(view);
            }
            _ => groups.push(MonthGroup {
                month,
                total: view.amount,
                transactions: vec![view],
            }),
        }
    }
    Ok(groups)
}
