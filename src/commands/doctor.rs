// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Consistency checks over the double-entry invariants:
/// every transaction has exactly one positive and one negative entry,
/// the two sum to zero, and no entry points at a missing account.
pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    let mut stmt = conn.prepare(
        "SELECT e.transaction_id, e.amount FROM entries e ORDER BY e.transaction_id",
    )?;
    let mut cur = stmt.query([])?;
    let mut per_tx: HashMap<i64, (Decimal, usize, usize)> = HashMap::new();
    while let Some(r) = cur.next()? {
        let tx_id: i64 = r.get(0)?;
        let amount_s: String = r.get(1)?;
        let Ok(amount) = amount_s.parse::<Decimal>() else {
            rows.push(vec!["unparsable_amount".into(), format!("tx {}: '{}'", tx_id, amount_s)]);
            continue;
        };
        let slot = per_tx.entry(tx_id).or_insert((Decimal::ZERO, 0, 0));
        slot.0 += amount;
        if amount > Decimal::ZERO {
            slot.1 += 1;
        } else if amount < Decimal::ZERO {
            slot.2 += 1;
        }
    }
    let mut tx_ids: Vec<i64> = per_tx.keys().copied().collect();
    tx_ids.sort_unstable();
    for tx_id in tx_ids {
        let (sum, positives, negatives) = per_tx[&tx_id];
        if !sum.is_zero() {
            rows.push(vec!["unbalanced_transaction".into(), format!("tx {}: sum {}", tx_id, sum)]);
        }
        if positives != 1 || negatives != 1 {
            rows.push(vec![
                "bad_entry_pair".into(),
                format!("tx {}: {} debit / {} credit entries", tx_id, positives, negatives),
            ]);
        }
    }

    let mut stmt2 = conn.prepare(
        "SELECT e.id FROM entries e LEFT JOIN accounts a ON a.id = e.account_id
         WHERE a.id IS NULL",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["orphan_entry".into(), format!("entry {}", id)]);
    }

    // Kind pairing: expenses must debit an EXPENSE account, incomes must
    // credit a REVENUE account.
    let mut stmt3 = conn.prepare(
        "SELECT t.id, t.kind, a.kind
         FROM transactions t
         JOIN entries e ON e.transaction_id = t.id
         JOIN accounts a ON a.id = e.account_id
         WHERE CAST(e.amount AS REAL) > 0",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let tx_id: i64 = r.get(0)?;
        let tx_kind: String = r.get(1)?;
        let debit_kind: String = r.get(2)?;
        let ok = match tx_kind.as_str() {
            "EXPENSE" => debit_kind == "EXPENSE",
            "INCOME" => debit_kind == "ASSET" || debit_kind == "LIABILITY",
            _ => false,
        };
        if !ok {
            rows.push(vec![
                "kind_mismatch".into(),
                format!("tx {}: {} debits a {} account", tx_id, tx_kind, debit_kind),
            ]);
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
