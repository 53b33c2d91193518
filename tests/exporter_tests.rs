// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneyledger::models::{AccountKind, TransactionInput, TransactionKind};
use moneyledger::{cli, commands::exporter, db, ledger, stores};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;
use tempfile::tempdir;

fn seeded_conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    stores::users::insert(&conn, "Asha", "asha@example.com").unwrap();
    let acct = stores::accounts::insert(&conn, 1, "Checking", AccountKind::Bank, Decimal::from(500))
        .unwrap();
    ledger::create_transaction(
        &mut conn,
        1,
        &TransactionInput {
            account_id: acct,
            amount: Decimal::new(1234, 2),
            kind: TransactionKind::Expense,
            category: "Groceries".to_string(),
            description: "Weekly run".to_string(),
            transaction_date: "2025-01-02".parse().unwrap(),
            withdraw_from: None,
            transfer_to: None,
        },
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, format: &str, out: &str) {
    let matches = cli::build_cli().get_matches_from([
        "moneyledger",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_writes_pretty_json() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, "json", &out_str);

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-01-02",
                "account": "Checking",
                "type": "EXPENSE",
                "amount": "12.34",
                "category": "Groceries",
                "description": "Weekly run"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv_with_header() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, "csv", &out_str);

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,account,type,amount,category,description"
    );
    assert_eq!(
        lines.next().unwrap(),
        "2025-01-02,Checking,EXPENSE,12.34,Groceries,Weekly run"
    );
    assert!(lines.next().is_none());
}
