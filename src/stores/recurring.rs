// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::LedgerError;
use crate::models::{Frequency, RecurringTransaction, TransactionKind};
use crate::stores::{bad_column, decimal_col};

const COLS: &str = "id, user_id, account_id, amount, kind, category, description, \
                    frequency, custom_days, start_date, end_date, last_run, next_run";

fn from_row(row: &Row) -> rusqlite::Result<RecurringTransaction> {
    let kind: String = row.get(4)?;
    let frequency: String = row.get(7)?;
    let custom_days: i64 = row.get(8)?;
    Ok(RecurringTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        account_id: row.get(2)?,
        amount: decimal_col(row, 3)?,
        kind: TransactionKind::parse(&kind)
            .ok_or_else(|| bad_column(4, format!("unknown transaction kind '{kind}'")))?,
        category: row.get(5)?,
        description: row.get(6)?,
        frequency: Frequency::from_parts(&frequency, custom_days)
            .ok_or_else(|| bad_column(7, format!("unknown frequency '{frequency}'")))?,
        start_date: row.get(9)?,
        end_date: row.get(10)?,
        last_run: row.get(11)?,
        next_run: row.get(12)?,
    })
}

fn fmt(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn insert(conn: &Connection, txn: &RecurringTransaction) -> Result<i64, LedgerError> {
    conn.execute(
        "INSERT INTO recurring_transactions(user_id, account_id, amount, kind, category, \
         description, frequency, custom_days, start_date, end_date, last_run, next_run) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12)",
        params![
            txn.user_id,
            txn.account_id,
            txn.amount.to_string(),
            txn.kind.as_str(),
            txn.category,
            txn.description,
            txn.frequency.as_str(),
            txn.frequency.custom_days(),
            fmt(txn.start_date),
            txn.end_date.map(fmt),
            txn.last_run.map(fmt),
            fmt(txn.next_run),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_by_id(
    conn: &Connection,
    id: i64,
    user_id: i64,
) -> Result<RecurringTransaction, LedgerError> {
    conn.query_row(
        &format!(
            "SELECT {COLS} FROM recurring_transactions \
             WHERE id=?1 AND user_id=?2 AND deleted_at IS NULL"
        ),
        params![id, user_id],
        from_row,
    )
    .optional()?
    .ok_or(LedgerError::NotFound("recurring transaction"))
}

pub fn update(conn: &Connection, txn: &RecurringTransaction) -> Result<(), LedgerError> {
    let n = conn.execute(
        "UPDATE recurring_transactions SET account_id=?1, amount=?2, kind=?3, category=?4, \
         description=?5, frequency=?6, custom_days=?7, start_date=?8, end_date=?9, \
         last_run=?10, next_run=?11 WHERE id=?12 AND user_id=?13 AND deleted_at IS NULL",
        params![
            txn.account_id,
            txn.amount.to_string(),
            txn.kind.as_str(),
            txn.category,
            txn.description,
            txn.frequency.as_str(),
            txn.frequency.custom_days(),
            fmt(txn.start_date),
            txn.end_date.map(fmt),
            txn.last_run.map(fmt),
            fmt(txn.next_run),
            txn.id,
            txn.user_id,
        ],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound("recurring transaction"));
    }
    Ok(())
}

pub fn soft_delete(conn: &Connection, id: i64, user_id: i64) -> Result<(), LedgerError> {
    let n = conn.execute(
        "UPDATE recurring_transactions SET deleted_at=datetime('now') \
         WHERE id=?1 AND user_id=?2 AND deleted_at IS NULL",
        params![id, user_id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound("recurring transaction"));
    }
    Ok(())
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<RecurringTransaction>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLS} FROM recurring_transactions \
         WHERE user_id=?1 AND deleted_at IS NULL ORDER BY next_run, id"
    ))?;
    let rows = stmt.query_map(params![user_id], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
