// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use moneyledger::error::LedgerError;
use moneyledger::models::{AccountKind, Status, TransactionInput, TransactionKind};
use moneyledger::{db, ledger, stores};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    stores::users::insert(&conn, "Asha", "asha@example.com").unwrap();
    conn
}

fn input(account_id: i64, kind: TransactionKind, amount: i64) -> TransactionInput {
    TransactionInput {
        account_id,
        amount: Decimal::from(amount),
        kind,
        category: "FD".to_string(),
        description: String::new(),
        transaction_date: "2025-03-20".parse().unwrap(),
        withdraw_from: None,
        transfer_to: None,
    }
}

/// Account with 600, then SAVINGS 200 leaving 400 and an active saving.
fn setup_with_saving(conn: &mut Connection) -> (i64, i64) {
    let acct =
        stores::accounts::insert(conn, 1, "Checking", AccountKind::Bank, Decimal::from(600))
            .unwrap();
    let txn = ledger::create_transaction(conn, 1, &input(acct, TransactionKind::Savings, 200))
        .unwrap();
    (acct, txn.id)
}

#[test]
fn withdrawal_over_effective_value_is_rejected() {
    let mut conn = setup();
    let (acct, savings_txn) = setup_with_saving(&mut conn);

    let mut withdraw = input(acct, TransactionKind::Withdraw, 250);
    withdraw.withdraw_from = Some(savings_txn);
    let err = ledger::create_transaction(&mut conn, 1, &withdraw).unwrap_err();

    match err {
        LedgerError::InsufficientFunds {
            requested,
            available,
        } => {
            assert_eq!(requested, Decimal::from(250));
            assert_eq!(available, Decimal::from(200));
        }
        other => panic!("expected InsufficientFunds, got {other:?}"),
    }
    // nothing moved
    assert_eq!(
        stores::accounts::get(&conn, acct, 1).unwrap().balance,
        Decimal::from(400)
    );
    let saving = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    assert_eq!(saving.withdrawn_amount, Decimal::ZERO);
    assert_eq!(saving.status, Status::Active);
}

#[test]
fn exact_withdrawal_exhausts_and_deactivates_the_saving() {
    let mut conn = setup();
    let (acct, savings_txn) = setup_with_saving(&mut conn);

    let mut withdraw = input(acct, TransactionKind::Withdraw, 200);
    withdraw.withdraw_from = Some(savings_txn);
    ledger::create_transaction(&mut conn, 1, &withdraw).unwrap();

    assert_eq!(
        stores::accounts::get(&conn, acct, 1).unwrap().balance,
        Decimal::from(600)
    );
    let saving = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    assert_eq!(saving.withdrawn_amount, Decimal::from(200));
    assert_eq!(saving.status, Status::Inactive);
}

#[test]
fn partial_withdrawals_accumulate_to_the_ceiling() {
    let mut conn = setup();
    let (acct, savings_txn) = setup_with_saving(&mut conn);

    for amount in [50, 150] {
        let mut withdraw = input(acct, TransactionKind::Withdraw, amount);
        withdraw.withdraw_from = Some(savings_txn);
        ledger::create_transaction(&mut conn, 1, &withdraw).unwrap();
    }

    let saving = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    assert_eq!(saving.withdrawn_amount, Decimal::from(200));
    assert_eq!(saving.status, Status::Inactive);

    // the ceiling is spent; one more unit is over
    let mut withdraw = input(acct, TransactionKind::Withdraw, 1);
    withdraw.withdraw_from = Some(savings_txn);
    let err = ledger::create_transaction(&mut conn, 1, &withdraw).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));
}

#[test]
fn current_value_raises_the_withdrawal_ceiling() {
    let mut conn = setup();
    let (acct, savings_txn) = setup_with_saving(&mut conn);

    // mark-to-market correction: the FD grew to 260
    let saving = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    stores::savings::correct(
        &conn,
        saving.id,
        1,
        Decimal::from(260),
        None,
        saving.status,
        &saving.description,
    )
    .unwrap();

    let mut withdraw = input(acct, TransactionKind::Withdraw, 260);
    withdraw.withdraw_from = Some(savings_txn);
    ledger::create_transaction(&mut conn, 1, &withdraw).unwrap();

    let saving = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    assert_eq!(saving.withdrawn_amount, Decimal::from(260));
    assert_eq!(saving.status, Status::Inactive);
    assert_eq!(
        stores::accounts::get(&conn, acct, 1).unwrap().balance,
        Decimal::from(660)
    );
}

#[test]
fn withdrawal_needs_an_existing_saving() {
    let mut conn = setup();
    let acct =
        stores::accounts::insert(&conn, 1, "Checking", AccountKind::Bank, Decimal::from(500))
            .unwrap();

    let mut withdraw = input(acct, TransactionKind::Withdraw, 10);
    withdraw.withdraw_from = Some(424242);
    let err = ledger::create_transaction(&mut conn, 1, &withdraw).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound("saving")));
    assert_eq!(
        stores::accounts::get(&conn, acct, 1).unwrap().balance,
        Decimal::from(500)
    );
}

#[test]
fn withdrawal_without_source_is_invalid() {
    let mut conn = setup();
    let acct =
        stores::accounts::insert(&conn, 1, "Checking", AccountKind::Bank, Decimal::from(500))
            .unwrap();

    let err = ledger::create_transaction(&mut conn, 1, &input(acct, TransactionKind::Withdraw, 10))
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidTransaction(_)));
}

#[test]
fn editing_a_withdrawal_does_not_reapply_it() {
    let mut conn = setup();
    let (acct, savings_txn) = setup_with_saving(&mut conn);

    let mut withdraw = input(acct, TransactionKind::Withdraw, 50);
    withdraw.withdraw_from = Some(savings_txn);
    let txn = ledger::create_transaction(&mut conn, 1, &withdraw).unwrap();

    // category-only fix of the existing withdrawal
    let mut edit = withdraw.clone();
    edit.category = "Emergency".to_string();
    ledger::update_transaction(&mut conn, 1, txn.id, &edit).unwrap();

    let saving = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    assert_eq!(saving.withdrawn_amount, Decimal::from(50));
    assert_eq!(saving.status, Status::Active);
    assert_eq!(
        stores::accounts::get(&conn, acct, 1).unwrap().balance,
        Decimal::from(450)
    );
}

#[test]
fn editing_a_withdrawal_of_an_exhausted_saving_still_works() {
    let mut conn = setup();
    let (acct, savings_txn) = setup_with_saving(&mut conn);

    let mut withdraw = input(acct, TransactionKind::Withdraw, 200);
    withdraw.withdraw_from = Some(savings_txn);
    let txn = ledger::create_transaction(&mut conn, 1, &withdraw).unwrap();

    // the saving has no remaining value, but an edit is not a new withdrawal
    let mut edit = withdraw.clone();
    edit.description = "FD closed out".to_string();
    ledger::update_transaction(&mut conn, 1, txn.id, &edit).unwrap();

    let saving = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    assert_eq!(saving.withdrawn_amount, Decimal::from(200));
    assert_eq!(
        stores::accounts::get(&conn, acct, 1).unwrap().balance,
        Decimal::from(600)
    );
}

#[test]
fn correction_cannot_drop_effective_value_below_withdrawn() {
    let mut conn = setup();
    let (acct, savings_txn) = setup_with_saving(&mut conn);

    let mut withdraw = input(acct, TransactionKind::Withdraw, 150);
    withdraw.withdraw_from = Some(savings_txn);
    ledger::create_transaction(&mut conn, 1, &withdraw).unwrap();

    let saving = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    let err = stores::savings::correct(
        &conn,
        saving.id,
        1,
        Decimal::from(100),
        None,
        saving.status,
        &saving.description,
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidCorrection(_)));

    let unchanged = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    assert_eq!(unchanged.current_value, Decimal::ZERO);
    assert_eq!(unchanged.withdrawn_amount, Decimal::from(150));

    // down to exactly the withdrawn amount is the floor
    stores::savings::correct(
        &conn,
        saving.id,
        1,
        Decimal::from(150),
        None,
        saving.status,
        &saving.description,
    )
    .unwrap();
    let corrected = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    assert_eq!(corrected.remaining(), Decimal::ZERO);
}

#[test]
fn exhausted_saving_never_reactivates_on_its_own() {
    let mut conn = setup();
    let (acct, savings_txn) = setup_with_saving(&mut conn);

    let mut withdraw = input(acct, TransactionKind::Withdraw, 200);
    withdraw.withdraw_from = Some(savings_txn);
    let withdraw_txn = ledger::create_transaction(&mut conn, 1, &withdraw).unwrap();

    // deleting the withdrawal reverses the account balance, not the ledger of
    // the saving: the status stays INACTIVE
    ledger::delete_transaction(&mut conn, 1, withdraw_txn.id).unwrap();
    assert_eq!(
        stores::accounts::get(&conn, acct, 1).unwrap().balance,
        Decimal::from(400)
    );
    let saving = stores::savings::get_by_transaction_id(&conn, savings_txn, 1).unwrap();
    assert_eq!(saving.status, Status::Inactive);
}
