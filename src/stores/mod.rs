// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One module per table. Every function takes a `&rusqlite::Connection`; a
//! `rusqlite::Transaction` derefs to `Connection`, so the same functions run
//! either standalone or inside the ledger engine's unit of work. All reads
//! and writes are scoped by `user_id`.

pub mod accounts;
pub mod recurring;
pub mod savings;
pub mod transactions;
pub mod users;

use rusqlite::types::Type;
use rusqlite::Row;
use rust_decimal::Decimal;

/// Amounts are stored as TEXT; parse failures surface as column conversion
/// errors so they abort the surrounding unit of work.
pub(crate) fn decimal_col(row: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    s.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn bad_column(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
}
