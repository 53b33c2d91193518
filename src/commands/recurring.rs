// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use chrono::Utc;
use rusqlite::Connection;

use crate::models::{Frequency, RecurringInput, TransactionKind};
use crate::recurring;
use crate::stores;
use crate::utils::{fmt_money, maybe_print_json, parse_datetime, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let input = input_from_args(sub)?;
            let txn = recurring::create(conn, user_id, &input, Utc::now().naive_utc())?;
            println!(
                "Scheduled {} {} {} (id: {}, next run {})",
                txn.frequency.as_str(),
                txn.kind.as_str(),
                fmt_money(&txn.amount),
                txn.id,
                txn.next_run
            );
        }
        Some(("update", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let id = *sub.get_one::<i64>("id").unwrap();
            let input = input_from_args(sub)?;
            let txn = recurring::update(conn, user_id, id, &input, Utc::now().naive_utc())?;
            println!("Updated recurring {} (next run {})", txn.id, txn.next_run);
        }
        Some(("skip", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let id = *sub.get_one::<i64>("id").unwrap();
            recurring::skip_next_run(conn, user_id, id)?;
            let txn = stores::recurring::get_by_id(conn, id, user_id)?;
            println!("Skipped next run of {}; now due {}", id, txn.next_run);
        }
        Some(("rm", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let id = *sub.get_one::<i64>("id").unwrap();
            recurring::delete(conn, user_id, id)?;
            println!("Removed recurring {}", id);
        }
        Some(("list", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let data = stores::recurring::list(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|t| {
                        vec![
                            t.id.to_string(),
                            t.kind.as_str().to_string(),
                            fmt_money(&t.amount),
                            t.category.clone(),
                            match t.frequency {
                                Frequency::Custom(d) => format!("CUSTOM({d}d)"),
                                f => f.as_str().to_string(),
                            },
                            t.last_run.map(|d| d.to_string()).unwrap_or_default(),
                            t.next_run.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Type", "Amount", "Category", "Frequency", "Last run", "Next run"],
                        rows,
                    )
                );
            }
        }
        _ => {}
    }
    Ok(())
}

fn input_from_args(sub: &clap::ArgMatches) -> Result<RecurringInput> {
    let kind_raw = sub.get_one::<String>("type").unwrap();
    let kind = TransactionKind::parse(kind_raw)
        .ok_or_else(|| anyhow!("Unknown transaction type '{}'", kind_raw))?;
    let freq_raw = sub.get_one::<String>("frequency").unwrap();
    let custom_days = sub.get_one::<i64>("custom-days").copied().unwrap_or(0);
    let frequency = Frequency::from_parts(freq_raw, custom_days)
        .ok_or_else(|| anyhow!("Unknown frequency '{}'", freq_raw))?;
    let end_date = match sub.get_one::<String>("end") {
        Some(raw) => Some(parse_datetime(raw)?),
        None => None,
    };
    Ok(RecurringInput {
        account_id: *sub.get_one::<i64>("account").unwrap(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        kind,
        category: sub.get_one::<String>("category").unwrap().clone(),
        description: sub.get_one::<String>("description").unwrap().clone(),
        frequency,
        start_date: parse_datetime(sub.get_one::<String>("start").unwrap())?,
        end_date,
    })
}
