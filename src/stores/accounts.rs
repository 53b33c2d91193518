// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{Account, AccountKind, Status};
use crate::stores::{bad_column, decimal_col};

const COLS: &str = "id, user_id, name, kind, balance, status";

fn from_row(row: &Row) -> rusqlite::Result<Account> {
    let kind: String = row.get(3)?;
    let status: String = row.get(5)?;
    Ok(Account {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        kind: AccountKind::parse(&kind)
            .ok_or_else(|| bad_column(3, format!("unknown account kind '{kind}'")))?,
        balance: decimal_col(row, 4)?,
        status: Status::parse(&status)
            .ok_or_else(|| bad_column(5, format!("unknown status '{status}'")))?,
    })
}

pub fn insert(
    conn: &Connection,
    user_id: i64,
    name: &str,
    kind: AccountKind,
    opening_balance: Decimal,
) -> Result<i64, LedgerError> {
    conn.execute(
        "INSERT INTO accounts(user_id, name, kind, balance, status) VALUES (?1, ?2, ?3, ?4, 'ACTIVE')",
        params![user_id, name, kind.as_str(), opening_balance.to_string()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get(conn: &Connection, id: i64, user_id: i64) -> Result<Account, LedgerError> {
    conn.query_row(
        &format!("SELECT {COLS} FROM accounts WHERE id=?1 AND user_id=?2 AND deleted_at IS NULL"),
        params![id, user_id],
        from_row,
    )
    .optional()?
    .ok_or(LedgerError::NotFound("account"))
}

/// Locked read inside a unit of work. SQLite takes the database write lock at
/// BEGIN IMMEDIATE rather than per row; the `&Transaction` parameter keeps
/// callers from using this outside one.
pub fn get_for_update(
    tx: &rusqlite::Transaction,
    id: i64,
    user_id: i64,
) -> Result<Account, LedgerError> {
    get(tx, id, user_id)
}

/// The ledger engine is the only caller; balances are never written by the
/// account CRUD path.
pub fn save_balance(
    conn: &Connection,
    id: i64,
    user_id: i64,
    balance: Decimal,
) -> Result<(), LedgerError> {
    let n = conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2 AND user_id=?3 AND deleted_at IS NULL",
        params![balance.to_string(), id, user_id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound("account"));
    }
    Ok(())
}

pub fn update(
    conn: &Connection,
    id: i64,
    user_id: i64,
    name: &str,
    kind: AccountKind,
    status: Status,
) -> Result<(), LedgerError> {
    let n = conn.execute(
        "UPDATE accounts SET name=?1, kind=?2, status=?3 WHERE id=?4 AND user_id=?5 AND deleted_at IS NULL",
        params![name, kind.as_str(), status.as_str(), id, user_id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound("account"));
    }
    Ok(())
}

pub fn soft_delete(conn: &Connection, id: i64, user_id: i64) -> Result<(), LedgerError> {
    let n = conn.execute(
        "UPDATE accounts SET status='INACTIVE', deleted_at=datetime('now') \
         WHERE id=?1 AND user_id=?2 AND deleted_at IS NULL",
        params![id, user_id],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound("account"));
    }
    Ok(())
}

pub fn list(conn: &Connection, user_id: i64) -> Result<Vec<Account>, LedgerError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLS} FROM accounts WHERE user_id=?1 AND deleted_at IS NULL ORDER BY name"
    ))?;
    let rows = stmt.query_map(params![user_id], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
