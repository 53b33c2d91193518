// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Operations on recurring definitions. Scheduling arithmetic lives in
//! [`crate::schedule`]; nothing here turns a due definition into a ledger
//! transaction automatically.

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::error::LedgerError;
use crate::models::{RecurringInput, RecurringTransaction};
use crate::schedule;
use crate::stores;

pub fn create(
    conn: &Connection,
    user_id: i64,
    input: &RecurringInput,
    now: NaiveDateTime,
) -> Result<RecurringTransaction, LedgerError> {
    let next_run = schedule::compute_next_run(input.start_date, None, input.frequency, now)?;
    let txn = RecurringTransaction {
        id: 0,
        user_id,
        account_id: input.account_id,
        amount: input.amount,
        kind: input.kind,
        category: input.category.clone(),
        description: input.description.clone(),
        frequency: input.frequency,
        start_date: input.start_date,
        end_date: input.end_date,
        last_run: None,
        next_run,
    };
    let id = stores::recurring::insert(conn, &txn)?;
    stores::recurring::get_by_id(conn, id, user_id)
}

pub fn update(
    conn: &Connection,
    user_id: i64,
    id: i64,
    input: &RecurringInput,
    now: NaiveDateTime,
) -> Result<RecurringTransaction, LedgerError> {
    let old = stores::recurring::get_by_id(conn, id, user_id)?;

    // A changed cadence restarts the schedule from the start date; otherwise
    // the already-computed next run stands. Frequency carries its custom day
    // count, so a CUSTOM day change reschedules too.
    let next_run = if input.frequency != old.frequency {
        schedule::compute_next_run(input.start_date, None, input.frequency, now)?
    } else {
        old.next_run
    };

    let txn = RecurringTransaction {
        id,
        user_id,
        account_id: input.account_id,
        amount: input.amount,
        kind: input.kind,
        category: input.category.clone(),
        description: input.description.clone(),
        frequency: input.frequency,
        start_date: input.start_date,
        end_date: input.end_date,
        last_run: old.last_run,
        next_run,
    };
    stores::recurring::update(conn, &txn)?;
    stores::recurring::get_by_id(conn, id, user_id)
}

/// One deliberate postponement: advances the stored next run by exactly one
/// frequency step, with no catch-up to the current time.
pub fn skip_next_run(conn: &Connection, user_id: i64, id: i64) -> Result<(), LedgerError> {
    let mut txn = stores::recurring::get_by_id(conn, id, user_id)?;
    txn.next_run = schedule::advance_one_step(txn.next_run, txn.frequency)?;
    stores::recurring::update(conn, &txn)
}

pub fn delete(conn: &Connection, user_id: i64, id: i64) -> Result<(), LedgerError> {
    stores::recurring::get_by_id(conn, id, user_id).map_err(|e| {
        if e.is_not_found() {
            LedgerError::Unauthorized
        } else {
            e
        }
    })?;
    stores::recurring::soft_delete(conn, id, user_id)
}
