// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger engine: every create/update/delete of a transaction mutates the
//! owning account balance(s), persists the row, and keeps any linked saving in
//! step, all inside one SQLite transaction.
//!
//! Each operation opens `BEGIN IMMEDIATE`, which takes the write lock up
//! front and serialises concurrent mutations the way the row lock in a
//! SELECT ... FOR UPDATE would. The `rusqlite::Transaction` guard rolls back
//! on drop unless committed, so every early return and panic path releases
//! cleanly. On success the committed row is re-read and returned; callers
//! never see pre-commit state.

use rusqlite::{Connection, TransactionBehavior};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{
    Saving, Status, Transaction, TransactionInput, TransactionKind, TransferMeta,
};
use crate::stores;

pub fn create_transaction(
    conn: &mut Connection,
    user_id: i64,
    input: &TransactionInput,
) -> Result<Transaction, LedgerError> {
    validate(input)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut account = stores::accounts::get_for_update(&tx, input.account_id, user_id)?;

    // Raises InsufficientFunds before any balance is touched.
    if input.kind == TransactionKind::Withdraw {
        apply_withdrawal(&tx, user_id, input)?;
    }

    account.balance += input.kind.source_effect(input.amount);
    stores::accounts::save_balance(&tx, account.id, user_id, account.balance)?;

    let mut txn = row_from_input(user_id, 0, input);
    txn.id = stores::transactions::insert(&tx, &txn)?;

    if input.kind == TransactionKind::SelfTransfer {
        create_mirror_leg(&tx, user_id, &mut txn)?;
    }

    if input.kind == TransactionKind::Savings {
        stores::savings::insert(&tx, &new_saving(user_id, txn.id, input))?;
    }

    let id = txn.id;
    tx.commit()?;
    stores::transactions::get_by_id(conn, id, user_id)
}

pub fn update_transaction(
    conn: &mut Connection,
    user_id: i64,
    id: i64,
    input: &TransactionInput,
) -> Result<Transaction, LedgerError> {
    validate(input)?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let original = stores::transactions::get_by_id(&tx, id, user_id)?;

    // Undo the original effect with the original kind and amount, then apply
    // the new effect as a create would. Withdrawal bookkeeping against the
    // saving is create-only; an edit of a WITHDRAW row moves balances without
    // touching withdrawn_amount.
    reverse_effect(&tx, user_id, &original)?;

    let mut account = stores::accounts::get_for_update(&tx, input.account_id, user_id)?;
    account.balance += input.kind.source_effect(input.amount);
    stores::accounts::save_balance(&tx, account.id, user_id, account.balance)?;

    let mut txn = row_from_input(user_id, id, input);
    stores::transactions::update(&tx, &txn)?;

    if input.kind == TransactionKind::SelfTransfer {
        create_mirror_leg(&tx, user_id, &mut txn)?;
    }

    if input.kind == TransactionKind::Savings {
        match stores::savings::get_by_transaction_id(&tx, id, user_id) {
            Ok(mut saving) => {
                // Rewrite what the transaction dictates; status and
                // withdrawn_amount stay as they are.
                saving.category = input.category.clone();
                saving.amount = input.amount;
                saving.start_date = input.transaction_date;
                stores::savings::update_by_transaction_id(&tx, &saving)?;
            }
            Err(e) if e.is_not_found() => {
                stores::savings::insert(&tx, &new_saving(user_id, id, input))?;
            }
            Err(e) => return Err(e),
        }
    } else {
        stores::savings::soft_delete_by_transaction_id(&tx, id, user_id)?;
    }

    tx.commit()?;
    stores::transactions::get_by_id(conn, id, user_id)
}

pub fn delete_transaction(
    conn: &mut Connection,
    user_id: i64,
    id: i64,
) -> Result<(), LedgerError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let original = stores::transactions::get_by_id(&tx, id, user_id).map_err(|e| {
        if e.is_not_found() {
            LedgerError::Unauthorized
        } else {
            e
        }
    })?;

    reverse_effect(&tx, user_id, &original)?;
    stores::transactions::soft_delete(&tx, id)?;
    stores::savings::soft_delete_by_transaction_id(&tx, id, user_id)?;

    tx.commit()?;
    Ok(())
}

fn validate(input: &TransactionInput) -> Result<(), LedgerError> {
    if input.amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidTransaction(
            "amount must be positive".to_string(),
        ));
    }
    match input.kind {
        TransactionKind::Withdraw if input.withdraw_from.is_none() => Err(
            LedgerError::InvalidTransaction("withdrawFrom is required for WITHDRAW".to_string()),
        ),
        TransactionKind::SelfTransfer => match input.transfer_to {
            None => Err(LedgerError::InvalidTransaction(
                "transferTo is required for SELF_TRANSFER".to_string(),
            )),
            Some(dest) if dest == input.account_id => Err(LedgerError::InvalidTransaction(
                "cannot transfer to the same account".to_string(),
            )),
            Some(_) => Ok(()),
        },
        _ => Ok(()),
    }
}

fn row_from_input(user_id: i64, id: i64, input: &TransactionInput) -> Transaction {
    let metadata = (input.kind == TransactionKind::SelfTransfer).then(|| TransferMeta {
        transfer_to: input.transfer_to,
        ..TransferMeta::default()
    });
    Transaction {
        id,
        user_id,
        account_id: input.account_id,
        account_name: String::new(),
        amount: input.amount,
        kind: input.kind,
        category: input.category.clone(),
        description: input.description.clone(),
        transaction_date: input.transaction_date,
        withdraw_from: input.withdraw_from,
        metadata,
        saving: None,
    }
}

fn new_saving(user_id: i64, transaction_id: i64, input: &TransactionInput) -> Saving {
    Saving {
        id: 0,
        user_id,
        transaction_id,
        category: input.category.clone(),
        amount: input.amount,
        current_value: Decimal::ZERO,
        withdrawn_amount: Decimal::ZERO,
        status: Status::Active,
        start_date: input.transaction_date,
        maturity_date: None,
        description: input.description.clone(),
    }
}

/// Checks the withdrawal against the source saving's remaining value and
/// advances the running counter; create is the only caller. The status flips
/// to INACTIVE exactly when the effective value is exhausted and never flips
/// back here.
fn apply_withdrawal(
    tx: &rusqlite::Transaction,
    user_id: i64,
    input: &TransactionInput,
) -> Result<(), LedgerError> {
    let source = input.withdraw_from.ok_or_else(|| {
        LedgerError::InvalidTransaction("withdrawFrom is required for WITHDRAW".to_string())
    })?;
    let mut saving = stores::savings::get_by_transaction_id(tx, source, user_id)?;
    let available = saving.remaining();
    if input.amount > available {
        return Err(LedgerError::InsufficientFunds {
            requested: input.amount,
            available,
        });
    }
    saving.withdrawn_amount += input.amount;
    if saving.withdrawn_amount == saving.effective_value() {
        saving.status = Status::Inactive;
    }
    stores::savings::update_by_transaction_id(tx, &saving)
}

/// Moves the amount into the destination account and records the incoming
/// leg, then cross-links the two rows through their metadata.
fn create_mirror_leg(
    tx: &rusqlite::Transaction,
    user_id: i64,
    source: &mut Transaction,
) -> Result<(), LedgerError> {
    let dest_id = source
        .metadata
        .as_ref()
        .and_then(|m| m.transfer_to)
        .ok_or_else(|| {
            LedgerError::InvalidTransaction("transferTo is required for SELF_TRANSFER".to_string())
        })?;

    let mut dest = stores::accounts::get_for_update(tx, dest_id, user_id)?;
    dest.balance += source.amount;
    stores::accounts::save_balance(tx, dest.id, user_id, dest.balance)?;

    let mut mirror = Transaction {
        id: 0,
        user_id,
        account_id: dest_id,
        account_name: String::new(),
        amount: source.amount,
        kind: TransactionKind::SelfTransfer,
        category: source.category.clone(),
        description: source.description.clone(),
        transaction_date: source.transaction_date,
        withdraw_from: None,
        metadata: Some(TransferMeta {
            transfer_from: Some(source.account_id),
            peer: Some(source.id),
            ..TransferMeta::default()
        }),
        saving: None,
    };
    mirror.id = stores::transactions::insert(tx, &mirror)?;

    if let Some(meta) = source.metadata.as_mut() {
        meta.peer = Some(mirror.id);
    }
    stores::transactions::set_metadata(tx, source.id, source.metadata.as_ref())
}

/// Backs out the balance effect of an existing row. For a self-transfer this
/// reverses both accounts and retires the peer leg, whichever leg was handed
/// in; the two legs carry equal and opposite effects.
fn reverse_effect(
    tx: &rusqlite::Transaction,
    user_id: i64,
    original: &Transaction,
) -> Result<(), LedgerError> {
    let effect = original.signed_effect();

    let mut account = stores::accounts::get_for_update(tx, original.account_id, user_id)?;
    account.balance -= effect;
    stores::accounts::save_balance(tx, account.id, user_id, account.balance)?;

    if original.kind == TransactionKind::SelfTransfer {
        let meta = original.metadata.clone().ok_or_else(|| {
            LedgerError::InvalidTransaction("transfer leg is missing its metadata".to_string())
        })?;
        let other_id = meta.transfer_to.or(meta.transfer_from).ok_or_else(|| {
            LedgerError::InvalidTransaction("transfer leg is missing its metadata".to_string())
        })?;

        let mut other = stores::accounts::get_for_update(tx, other_id, user_id)?;
        other.balance += effect;
        stores::accounts::save_balance(tx, other.id, user_id, other.balance)?;

        if let Some(peer) = meta.peer {
            stores::transactions::soft_delete(tx, peer)?;
        }
    }
    Ok(())
}
