// Copyright (c) 2025 Assetbook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use assetbook::{cli, commands::importer, db};
use rusqlite::Connection;
use std::fs;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let owner = db::ensure_owner(&conn, "test@example.com").unwrap();
    for (name, kind) in [
        ("Cash", "ASSET"),
        ("Groceries", "EXPENSE"),
        ("Salary", "REVENUE"),
    ] {
        conn.execute(
            "INSERT INTO accounts(name, kind, owner_id) VALUES (?1, ?2, ?3)",
            rusqlite::params![name, kind, owner],
        )
        .unwrap();
    }
    conn
}

fn run_import(conn: &mut Connection, path: &str) -> anyhow::Result<()> {
    let cli = cli::build_cli();
    let matches =
        cli.get_matches_from(["assetbook", "import", "transactions", "--file", path]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn imports_a_csv_batch() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    fs::write(
        &path,
        "date,description,amount,kind,credit_account,debit_account\n\
         2025-01-05,weekly shop,42.50,expense,Cash,Groceries\n\
         2025-01-25,payday,3000,income,Salary,Cash\n",
    )
    .unwrap();

    run_import(&mut conn, &path.to_string_lossy()).unwrap();

    let txs: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    let entries: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries", [], |r| r.get(0))
        .unwrap();
    assert_eq!(txs, 2);
    assert_eq!(entries, 4);

    let balance: f64 = conn
        .query_row("SELECT SUM(CAST(amount AS REAL)) FROM entries", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(balance, 0.0);
}

#[test]
fn bad_row_rolls_back_the_whole_file() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    // Second row references an account that does not exist.
    fs::write(
        &path,
        "date,description,amount,kind,credit_account,debit_account\n\
         2025-01-05,weekly shop,42.50,expense,Cash,Groceries\n\
         2025-01-06,typo,10,expense,Csah,Groceries\n",
    )
    .unwrap();

    // Referential failures are surfaced to the user, not raised.
    run_import(&mut conn, &path.to_string_lossy()).unwrap();

    let txs: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(txs, 0, "no row of a failing batch may persist");
}
