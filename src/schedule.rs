// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Pure schedule arithmetic for recurring definitions. `now` is always a
//! parameter so callers and tests control the clock.

use chrono::{Duration, Months, NaiveDateTime};

use crate::error::LedgerError;
use crate::models::Frequency;

/// Next due timestamp for a recurring definition.
///
/// Base is `last_run` when present, otherwise `start`; a future `start` with
/// no run history is already the next due time and is returned unchanged.
/// Otherwise the base is stepped forward until strictly after `now`, so a
/// definition that fell far behind catches up in one call.
pub fn compute_next_run(
    start: NaiveDateTime,
    last_run: Option<NaiveDateTime>,
    frequency: Frequency,
    now: NaiveDateTime,
) -> Result<NaiveDateTime, LedgerError> {
    let mut base = match last_run {
        Some(t) => t,
        None => {
            if start > now {
                return Ok(start);
            }
            start
        }
    };

    loop {
        base = advance_one_step(base, frequency)?;
        if base > now {
            return Ok(base);
        }
    }
}

/// A single frequency step, no catch-up. Skipping an occurrence is one
/// deliberate postponement from the stored `next_run`, even when that value
/// is already in the past.
pub fn advance_one_step(
    t: NaiveDateTime,
    frequency: Frequency,
) -> Result<NaiveDateTime, LedgerError> {
    let next = match frequency {
        Frequency::Daily => t.checked_add_signed(Duration::days(1)),
        Frequency::Weekly => t.checked_add_signed(Duration::days(7)),
        Frequency::Monthly => t.checked_add_months(Months::new(1)),
        Frequency::Custom(days) => {
            if days <= 0 {
                return Err(LedgerError::InvalidCustomDays(days));
            }
            t.checked_add_signed(Duration::days(days))
        }
    };
    next.ok_or_else(|| LedgerError::InvalidFrequency("next run out of range".to_string()))
}
