// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error kinds surfaced by the ledger engine and the schedule calculator.
/// Domain-rule violations are raised before any write; store failures abort
/// the whole unit of work.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("unauthorised")]
    Unauthorized,

    #[error("withdrawal of {requested} exceeds remaining savings value {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("unsupported frequency '{0}'")]
    InvalidFrequency(String),

    #[error("invalid custom day count {0}: must be greater than zero")]
    InvalidCustomDays(i64),

    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("invalid correction: {0}")]
    InvalidCorrection(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl LedgerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }
}
