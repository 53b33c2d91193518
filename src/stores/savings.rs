// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{Saving, Status};
use crate::stores::{bad_column, decimal_col};

const COLS: &str = "id, user_id, transaction_id, category, amount, current_value, \
                    withdrawn_amount, status, start_date, maturity_date, description";

fn from_row(row: &Row) -> rusqlite::Result<Saving> {
    let status: String = row.get(7)?;
    Ok(Saving {
        id: row.get(0)?,
        user_id: row.get(1)?,
        transaction_id: row.get(2)?,
        category: row.get(3)?,
        amount: decimal_col(row, 4)?,
        current_value: decimal_col(row, 5)?,
        withdrawn_amount: decimal_col(row, 6)?,
        status: Status::parse(&status)
            .ok_or_else(|| bad_column(7, format!("unknown status '{status}'")))?,
        start_date: row.get(8)?,
        maturity_date: row.get(9)?,
        description: row.get(10)?,
    })
}

pub fn insert(conn: &Connection, saving: &Saving) -> Result<i64, LedgerError> {
    conn.execute(
        "INSERT INTO savings(user_id, transaction_id, category, amount, current_value, \
         withdrawn_amount, status, start_date, maturity_date, description) \
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            saving.user_id,
            saving.transaction_id,
            saving.category,
            saving.amount.to_string(),
            saving.current_value.to_string(),
            saving.withdrawn_amount.to_string(),
            saving.status.as_str(),
            saving.start_date.to_string(),
            saving.maturity_date.map(|d| d.to_string()),
            saving.description,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_by_id(conn: &Connection, id: i64, user_id: i64) -> Result<Saving, LedgerError> {
    conn.query_row(
        &format!("SELECT {COLS} FROM savings WHERE id=?1 AND user_id=?2 AND deleted_at IS NULL"),
        params![id, user_id],
        from_row,
    )
    .optional()?
    .ok_or(LedgerError::NotFound("saving"))
}

pub fn get_by_transaction_id(
    conn: &Connection,
    transaction_id: i64,
    user_id: i64,
) -> Result<Saving, LedgerError> {
    conn.query_row(
        &format!(
            "SELECT {COLS} FROM savings \
             WHERE transaction_id=?1 AND user_id=?2 AND deleted_at IS NULL"
        ),
        params![transaction_id, user_id],
        from_row,
    )
    .optional()?
    .ok_or(LedgerError::NotFound("saving"))
}

/// Full rewrite keyed by the owning transaction; used by the ledger engine
/// when a transaction's savings bookkeeping changes.
pub fn update_by_transaction_id(conn: &Connection, saving: &Saving) -> Result<(), LedgerError> {
    let n = conn.execute(
        "UPDATE savings SET category=?1, amount=?2, current_value=?3, withdrawn_amount=?4, \
         status=?5, start_date=?6, maturity_date=?7 \
         WHERE transaction_id=?8 AND user_id=?9 AND deleted_at IS NULL",
        params![
            saving.category,
            saving.amount.to_string(),
            saving.current_value.to_string(),
            saving.withdrawn_amount.to_string(),
            saving.status.as_str(),
            saving.start_date.to_string(),
            saving.maturity_date.map(|d| d.to_string()),
            saving.transaction_id,
            saving.user_id,
        ],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound("saving"));
    }
    Ok(())
}

/// Terminal corrections only: mark-to-market value, maturity date, status,
/// description. Amounts and withdrawals stay under ledger-engine control. A
/// correction may not push the effective value below what has already been
/// withdrawn.
pub fn correct(
    conn: &Connection,
    id: i64,
    user_id: i64,
    current_value: Decimal,
    maturity_date: Option<NaiveDate>,
    status: Status,
    description: &str,
) -> Result<(), LedgerError> {
    let existing = get_by_id(conn, id, user_id)?;
    let effective = if current_value.is_zero() {
        existing.amount
    } else {
        current_value
    };
    if existing.withdrawn_amount > effective {
        return Err(LedgerError::InvalidCorrection(format!(
            "effective value {} is below the withdrawn amount {}",
            effective, existing.withdrawn_amount
        )));
    }
    let n = conn.execute(
        "UPDATE savings SET current_value=?1, maturity_date=?2, status=?3, description=?4 \
         WHERE id=?5 AND user_id=?6 AND deleted_at IS NULL",
        params![
            current_value.to_string(),
            maturity_date.map(|d| d.to_string()),
            status.as_str(),
            description,
            id,
            user_id,
        ],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound("saving"));
    }
    Ok(())
}

/// No-op when the transaction has no linked saving.
pub fn soft_delete_by_transaction_id(
    conn: &Connection,
    transaction_id: i64,
    user_id: i64,
) -> Result<(), LedgerError> {
    conn.execute(
        "UPDATE savings SET deleted_at=datetime('now'), status='INACTIVE' \
         WHERE transaction_id=?1 AND user_id=?2 AND deleted_at IS NULL",
        params![transaction_id, user_id],
    )?;
    Ok(())
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Saving>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLS} FROM savings WHERE user_id=?1 AND deleted_at IS NULL ORDER BY start_date, id"
    ))?;
    let rows = stmt.query_map(params![user_id], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
