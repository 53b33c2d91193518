// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::LedgerError;
use crate::models::{SavingSummary, Status, Transaction, TransactionKind, TransferMeta};
use crate::stores::{bad_column, decimal_col};

const COLS: &str = "t.id, t.user_id, t.account_id, t.amount, t.kind, t.category, t.description, \
                    t.transaction_date, t.withdraw_from, t.metadata, a.name";

fn from_row(row: &Row) -> rusqlite::Result<Transaction> {
    let kind: String = row.get(4)?;
    let metadata: Option<String> = row.get(9)?;
    let metadata = match metadata {
        Some(raw) => Some(
            serde_json::from_str::<TransferMeta>(&raw)
                .map_err(|e| bad_column(9, format!("bad transfer metadata: {e}")))?,
        ),
        None => None,
    };
    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        account_id: row.get(2)?,
        amount: decimal_col(row, 3)?,
        kind: TransactionKind::parse(&kind)
            .ok_or_else(|| bad_column(4, format!("unknown transaction kind '{kind}'")))?,
        category: row.get(5)?,
        description: row.get(6)?,
        transaction_date: row.get(7)?,
        withdraw_from: row.get(8)?,
        metadata,
        account_name: row.get(10)?,
        saving: None,
    })
}

fn metadata_json(meta: Option<&TransferMeta>) -> Result<Option<String>, LedgerError> {
    meta.map(|m| {
        serde_json::to_string(m)
            .map_err(|e| LedgerError::InvalidTransaction(format!("transfer metadata: {e}")))
    })
    .transpose()
}

pub fn insert(conn: &Connection, txn: &Transaction) -> Result<i64, LedgerError> {
    conn.execute(
        "INSERT INTO transactions(user_id, account_id, amount, kind, category, description, \
         transaction_date, withdraw_from, metadata) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
        params![
            txn.user_id,
            txn.account_id,
            txn.amount.to_string(),
            txn.kind.as_str(),
            txn.category,
            txn.description,
            txn.transaction_date.to_string(),
            txn.withdraw_from,
            metadata_json(txn.metadata.as_ref())?,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_by_id(conn: &Connection, id: i64, user_id: i64) -> Result<Transaction, LedgerError> {
    conn.query_row(
        &format!(
            "SELECT {COLS} FROM transactions t INNER JOIN accounts a ON t.account_id=a.id \
             WHERE t.id=?1 AND t.user_id=?2 AND t.deleted_at IS NULL"
        ),
        params![id, user_id],
        from_row,
    )
    .optional()?
    .ok_or(LedgerError::NotFound("transaction"))
}

pub fn update(conn: &Connection, txn: &Transaction) -> Result<(), LedgerError> {
    let n = conn.execute(
        "UPDATE transactions SET account_id=?1, amount=?2, kind=?3, category=?4, description=?5, \
         transaction_date=?6, withdraw_from=?7, metadata=?8 \
         WHERE id=?9 AND user_id=?10 AND deleted_at IS NULL",
        params![
            txn.account_id,
            txn.amount.to_string(),
            txn.kind.as_str(),
            txn.category,
            txn.description,
            txn.transaction_date.to_string(),
            txn.withdraw_from,
            metadata_json(txn.metadata.as_ref())?,
            txn.id,
            txn.user_id,
        ],
    )?;
    if n == 0 {
        return Err(LedgerError::NotFound("transaction"));
    }
    Ok(())
}

/// Backfills the cross-link after the mirror leg of a transfer gets its id.
pub fn set_metadata(
    conn: &Connection,
    id: i64,
    meta: Option<&TransferMeta>,
) -> Result<(), LedgerError> {
    conn.execute(
        "UPDATE transactions SET metadata=?1 WHERE id=?2",
        params![metadata_json(meta)?, id],
    )?;
    Ok(())
}

pub fn soft_delete(conn: &Connection, id: i64) -> Result<(), LedgerError> {
    conn.execute(
        "UPDATE transactions SET deleted_at=datetime('now') WHERE id=?1 AND deleted_at IS NULL",
        params![id],
    )?;
    Ok(())
}

#[derive(Debug, Default)]
pub struct TransactionFilter {
    pub month: Option<String>,
    pub account_id: Option<i64>,
    pub kind: Option<TransactionKind>,
    pub limit: Option<usize>,
}

/// Listing joins the linked saving summary read-side; the engine never reads
/// transactions through this path.
pub fn list(
    conn: &Connection,
    user_id: i64,
    f: &TransactionFilter,
) -> Result<Vec<Transaction>, LedgerError> {
    let mut sql = format!(
        "SELECT {COLS}, s.id, s.status, s.amount, s.current_value \
         FROM transactions t \
         INNER JOIN accounts a ON t.account_id=a.id \
         LEFT JOIN savings s ON s.transaction_id=t.id AND s.deleted_at IS NULL \
         WHERE t.user_id=? AND t.deleted_at IS NULL"
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

    if let Some(month) = &f.month {
        sql.push_str(" AND substr(t.transaction_date,1,7)=?");
        params_vec.push(Box::new(month.clone()));
    }
    if let Some(account_id) = f.account_id {
        sql.push_str(" AND t.account_id=?");
        params_vec.push(Box::new(account_id));
    }
    if let Some(kind) = f.kind {
        sql.push_str(" AND t.kind=?");
        params_vec.push(Box::new(kind.as_str()));
    }
    sql.push_str(" ORDER BY t.transaction_date DESC, t.id DESC");
    if let Some(limit) = f.limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(Box::new(limit as i64));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(
        params_vec.iter().map(|p| p.as_ref()),
    ))?;

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut txn = from_row(row)?;
        let saving_id: Option<i64> = row.get(11)?;
        if let Some(sid) = saving_id {
            let status: String = row.get(12)?;
            txn.saving = Some(SavingSummary {
                id: sid,
                status: Status::parse(&status)
                    .ok_or_else(|| bad_column(12, format!("unknown status '{status}'")))?,
                amount: decimal_col(row, 13)?,
                current_value: decimal_col(row, 14)?,
            });
        }
        out.push(txn);
    }
    Ok(out)
}
