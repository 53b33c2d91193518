// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, Row};

use crate::error::LedgerError;
use crate::models::User;

fn from_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

pub fn insert(conn: &Connection, name: &str, email: &str) -> Result<i64, LedgerError> {
    conn.execute(
        "INSERT INTO users(name, email) VALUES (?1, ?2)",
        params![name, email],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list(conn: &Connection) -> Result<Vec<User>, LedgerError> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM users ORDER BY id")?;
    let rows = stmt.query_map([], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
