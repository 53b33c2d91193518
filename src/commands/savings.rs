// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use crate::models::Status;
use crate::stores;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let savings = stores::savings::list(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &savings)? {
                let rows = savings
                    .iter()
                    .map(|s| {
                        vec![
                            s.id.to_string(),
                            s.transaction_id.to_string(),
                            s.category.clone(),
                            fmt_money(&s.amount),
                            fmt_money(&s.effective_value()),
                            fmt_money(&s.withdrawn_amount),
                            s.status.as_str().to_string(),
                            s.start_date.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Txn", "Category", "Amount", "Effective", "Withdrawn", "Status", "Start"],
                        rows,
                    )
                );
            }
        }
        Some(("correct", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let id = *sub.get_one::<i64>("id").unwrap();
            let existing = stores::savings::get_by_id(conn, id, user_id)?;

            let current_value = match sub.get_one::<String>("current-value") {
                Some(raw) => parse_decimal(raw)?,
                None => existing.current_value,
            };
            let maturity_date = match sub.get_one::<String>("maturity") {
                Some(raw) => Some(parse_date(raw)?),
                None => existing.maturity_date,
            };
            let status = match sub.get_one::<String>("status") {
                Some(raw) => {
                    Status::parse(raw).ok_or_else(|| anyhow!("Unknown status '{}'", raw))?
                }
                None => existing.status,
            };
            let description = sub
                .get_one::<String>("description")
                .unwrap_or(&existing.description);

            stores::savings::correct(
                conn,
                id,
                user_id,
                current_value,
                maturity_date,
                status,
                description,
            )?;
            println!("Corrected saving {}", id);
        }
        _ => {}
    }
    Ok(())
}
