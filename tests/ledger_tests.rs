// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneyledger::error::LedgerError;
use moneyledger::models::{AccountKind, TransactionInput, TransactionKind};
use moneyledger::stores::transactions::TransactionFilter;
use moneyledger::{db, ledger, stores};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    stores::users::insert(&conn, "Asha", "asha@example.com").unwrap();
    conn
}

fn account(conn: &Connection, user_id: i64, name: &str, balance: i64) -> i64 {
    stores::accounts::insert(conn, user_id, name, AccountKind::Bank, Decimal::from(balance))
        .unwrap()
}

fn balance(conn: &Connection, id: i64, user_id: i64) -> Decimal {
    stores::accounts::get(conn, id, user_id).unwrap().balance
}

fn input(account_id: i64, kind: TransactionKind, amount: i64) -> TransactionInput {
    TransactionInput {
        account_id,
        amount: Decimal::from(amount),
        kind,
        category: "Groceries".to_string(),
        description: String::new(),
        transaction_date: "2025-03-20".parse().unwrap(),
        withdraw_from: None,
        transfer_to: None,
    }
}

#[test]
fn income_increases_balance() {
    let mut conn = setup();
    let acct = account(&conn, 1, "Checking", 500);

    let txn = ledger::create_transaction(&mut conn, 1, &input(acct, TransactionKind::Income, 100))
        .unwrap();

    assert_eq!(txn.kind, TransactionKind::Income);
    assert_eq!(txn.amount, Decimal::from(100));
    assert_eq!(balance(&conn, acct, 1), Decimal::from(600));
}

#[test]
fn expense_decreases_balance() {
    let mut conn = setup();
    let acct = account(&conn, 1, "Checking", 500);

    ledger::create_transaction(&mut conn, 1, &input(acct, TransactionKind::Expense, 120)).unwrap();

    assert_eq!(balance(&conn, acct, 1), Decimal::from(380));
}

#[test]
fn savings_creates_linked_active_saving() {
    let mut conn = setup();
    let acct = account(&conn, 1, "Checking", 600);

    let mut savings_input = input(acct, TransactionKind::Savings, 200);
    savings_input.category = "FD".to_string();
    let txn = ledger::create_transaction(&mut conn, 1, &savings_input).unwrap();

    assert_eq!(balance(&conn, acct, 1), Decimal::from(400));
    let saving = stores::savings::get_by_transaction_id(&conn, txn.id, 1).unwrap();
    assert_eq!(saving.amount, Decimal::from(200));
    assert_eq!(saving.category, "FD");
    assert_eq!(saving.status.as_str(), "ACTIVE");
    assert_eq!(saving.withdrawn_amount, Decimal::ZERO);
}

#[test]
fn update_reverses_old_effect_and_applies_new() {
    let mut conn = setup();
    let acct = account(&conn, 1, "Checking", 500);
    let txn = ledger::create_transaction(&mut conn, 1, &input(acct, TransactionKind::Expense, 50))
        .unwrap();
    assert_eq!(balance(&conn, acct, 1), Decimal::from(450));

    // EXPENSE 50 -> SAVINGS 50: reversal gains 50 back, new effect loses 50
    let updated =
        ledger::update_transaction(&mut conn, 1, txn.id, &input(acct, TransactionKind::Savings, 50))
            .unwrap();

    assert_eq!(balance(&conn, acct, 1), Decimal::from(450));
    assert_eq!(updated.kind, TransactionKind::Savings);
    let saving = stores::savings::get_by_transaction_id(&conn, txn.id, 1).unwrap();
    assert_eq!(saving.amount, Decimal::from(50));
}

#[test]
fn update_away_from_savings_retires_the_saving() {
    let mut conn = setup();
    let acct = account(&conn, 1, "Checking", 500);
    let txn = ledger::create_transaction(&mut conn, 1, &input(acct, TransactionKind::Savings, 100))
        .unwrap();
    assert!(stores::savings::get_by_transaction_id(&conn, txn.id, 1).is_ok());

    ledger::update_transaction(&mut conn, 1, txn.id, &input(acct, TransactionKind::Expense, 100))
        .unwrap();

    let err = stores::savings::get_by_transaction_id(&conn, txn.id, 1).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
    assert_eq!(balance(&conn, acct, 1), Decimal::from(400));
}

#[test]
fn update_amount_rewrites_saving_in_place() {
    let mut conn = setup();
    let acct = account(&conn, 1, "Checking", 1000);
    let txn = ledger::create_transaction(&mut conn, 1, &input(acct, TransactionKind::Savings, 100))
        .unwrap();
    let first = stores::savings::get_by_transaction_id(&conn, txn.id, 1).unwrap();

    ledger::update_transaction(&mut conn, 1, txn.id, &input(acct, TransactionKind::Savings, 250))
        .unwrap();

    let second = stores::savings::get_by_transaction_id(&conn, txn.id, 1).unwrap();
    assert_eq!(second.id, first.id);
    assert_eq!(second.amount, Decimal::from(250));
    assert_eq!(balance(&conn, acct, 1), Decimal::from(750));
}

#[test]
fn delete_reverses_effect_and_retires_saving() {
    let mut conn = setup();
    let acct = account(&conn, 1, "Checking", 500);
    let txn = ledger::create_transaction(&mut conn, 1, &input(acct, TransactionKind::Savings, 200))
        .unwrap();
    assert_eq!(balance(&conn, acct, 1), Decimal::from(300));

    ledger::delete_transaction(&mut conn, 1, txn.id).unwrap();

    assert_eq!(balance(&conn, acct, 1), Decimal::from(500));
    assert!(stores::transactions::get_by_id(&conn, txn.id, 1).is_err());
    assert!(stores::savings::get_by_transaction_id(&conn, txn.id, 1).is_err());
}

#[test]
fn delete_of_foreign_transaction_is_unauthorised() {
    let mut conn = setup();
    stores::users::insert(&conn, "Noor", "noor@example.com").unwrap();
    let acct = account(&conn, 1, "Checking", 500);
    let txn = ledger::create_transaction(&mut conn, 1, &input(acct, TransactionKind::Income, 10))
        .unwrap();

    let err = ledger::delete_transaction(&mut conn, 2, txn.id).unwrap_err();
    assert!(matches!(err, LedgerError::Unauthorized));
    assert_eq!(balance(&conn, acct, 1), Decimal::from(510));
}

#[test]
fn cross_user_reads_see_nothing() {
    let mut conn = setup();
    stores::users::insert(&conn, "Noor", "noor@example.com").unwrap();
    let acct = account(&conn, 1, "Checking", 500);
    let txn = ledger::create_transaction(&mut conn, 1, &input(acct, TransactionKind::Income, 10))
        .unwrap();

    assert!(stores::transactions::get_by_id(&conn, txn.id, 2).is_err());
    assert!(stores::accounts::get(&conn, acct, 2).is_err());
    let err =
        ledger::update_transaction(&mut conn, 2, txn.id, &input(acct, TransactionKind::Income, 99))
            .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
}

#[test]
fn failed_operation_rolls_back_every_write() {
    let mut conn = setup();
    let acct = account(&conn, 1, "Checking", 1000);

    // Destination account does not exist: the mirror-leg step fails after the
    // source balance and row were already written inside the unit of work.
    let mut transfer = input(acct, TransactionKind::SelfTransfer, 100);
    transfer.transfer_to = Some(9999);
    let err = ledger::create_transaction(&mut conn, 1, &transfer).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));

    assert_eq!(balance(&conn, acct, 1), Decimal::from(1000));
    let rows = stores::transactions::list(&conn, 1, &TransactionFilter::default()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn list_filters_by_month_account_kind_and_limit() {
    let mut conn = setup();
    let a = account(&conn, 1, "Checking", 1000);
    let b = account(&conn, 1, "Wallet", 200);

    let mut march_income = input(a, TransactionKind::Income, 100);
    march_income.transaction_date = "2025-03-05".parse().unwrap();
    ledger::create_transaction(&mut conn, 1, &march_income).unwrap();

    let mut april_expense = input(a, TransactionKind::Expense, 40);
    april_expense.transaction_date = "2025-04-02".parse().unwrap();
    ledger::create_transaction(&mut conn, 1, &april_expense).unwrap();

    let mut march_wallet = input(b, TransactionKind::Income, 25);
    march_wallet.transaction_date = "2025-03-09".parse().unwrap();
    ledger::create_transaction(&mut conn, 1, &march_wallet).unwrap();

    let by_month = stores::transactions::list(
        &conn,
        1,
        &TransactionFilter {
            month: Some("2025-03".to_string()),
            ..TransactionFilter::default()
        },
    )
    .unwrap();
    assert_eq!(by_month.len(), 2);

    let by_account = stores::transactions::list(
        &conn,
        1,
        &TransactionFilter {
            account_id: Some(a),
            ..TransactionFilter::default()
        },
    )
    .unwrap();
    assert_eq!(by_account.len(), 2);
    assert!(by_account.iter().all(|t| t.account_id == a));

    let combined = stores::transactions::list(
        &conn,
        1,
        &TransactionFilter {
            month: Some("2025-03".to_string()),
            account_id: Some(a),
            kind: Some(TransactionKind::Income),
            limit: None,
        },
    )
    .unwrap();
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].amount, Decimal::from(100));

    let limited = stores::transactions::list(
        &conn,
        1,
        &TransactionFilter {
            limit: Some(1),
            ..TransactionFilter::default()
        },
    )
    .unwrap();
    assert_eq!(limited.len(), 1);
    // newest first
    assert_eq!(limited[0].transaction_date, "2025-04-02".parse().unwrap());
}

#[test]
fn balances_always_equal_sum_of_live_transactions() {
    let mut conn = setup();
    let a = account(&conn, 1, "Checking", 1000);
    let b = account(&conn, 1, "Savings pot", 200);

    ledger::create_transaction(&mut conn, 1, &input(a, TransactionKind::Income, 300)).unwrap();
    let e = ledger::create_transaction(&mut conn, 1, &input(a, TransactionKind::Expense, 80))
        .unwrap();
    ledger::create_transaction(&mut conn, 1, &input(a, TransactionKind::Savings, 150)).unwrap();
    let mut transfer = input(a, TransactionKind::SelfTransfer, 50);
    transfer.transfer_to = Some(b);
    ledger::create_transaction(&mut conn, 1, &transfer).unwrap();
    ledger::update_transaction(&mut conn, 1, e.id, &input(a, TransactionKind::Expense, 120))
        .unwrap();

    let rows = stores::transactions::list(&conn, 1, &TransactionFilter::default()).unwrap();
    for (acct, opening) in [(a, 1000), (b, 200)] {
        let effect: Decimal = rows
            .iter()
            .filter(|t| t.account_id == acct)
            .map(|t| t.signed_effect())
            .sum();
        assert_eq!(
            balance(&conn, acct, 1),
            Decimal::from(opening) + effect,
            "account {acct} drifted from its transaction history"
        );
    }
}
