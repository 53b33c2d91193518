// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use crate::ledger;
use crate::models::{TransactionInput, TransactionKind};
use crate::stores::{self, transactions::TransactionFilter};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let input = input_from_args(sub)?;
            let txn = ledger::create_transaction(conn, user_id, &input)?;
            println!(
                "Recorded {} {} on {} (txn id: {}, account: {})",
                txn.kind.as_str(),
                fmt_money(&txn.amount),
                txn.transaction_date,
                txn.id,
                txn.account_name
            );
        }
        Some(("update", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let id = *sub.get_one::<i64>("id").unwrap();
            let input = input_from_args(sub)?;
            let txn = ledger::update_transaction(conn, user_id, id, &input)?;
            println!(
                "Updated transaction {} to {} {}",
                txn.id,
                txn.kind.as_str(),
                fmt_money(&txn.amount)
            );
        }
        Some(("rm", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::delete_transaction(conn, user_id, id)?;
            println!("Removed transaction {}", id);
        }
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn input_from_args(sub: &clap::ArgMatches) -> Result<TransactionInput> {
    let kind_raw = sub.get_one::<String>("type").unwrap();
    let kind = TransactionKind::parse(kind_raw)
        .ok_or_else(|| anyhow!("Unknown transaction type '{}'", kind_raw))?;
    Ok(TransactionInput {
        account_id: *sub.get_one::<i64>("account").unwrap(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        kind,
        category: sub.get_one::<String>("category").unwrap().clone(),
        description: sub.get_one::<String>("description").unwrap().clone(),
        transaction_date: parse_date(sub.get_one::<String>("date").unwrap())?,
        withdraw_from: sub.get_one::<i64>("withdraw-from").copied(),
        transfer_to: sub.get_one::<i64>("to").copied(),
    })
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = *sub.get_one::<i64>("user").unwrap();
    let kind = match sub.get_one::<String>("type") {
        Some(raw) => Some(
            TransactionKind::parse(raw)
                .ok_or_else(|| anyhow!("Unknown transaction type '{}'", raw))?,
        ),
        None => None,
    };
    let filter = TransactionFilter {
        month: sub.get_one::<String>("month").cloned(),
        account_id: sub.get_one::<i64>("account").copied(),
        kind,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    let data = stores::transactions::list(conn, user_id, &filter)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.transaction_date.to_string(),
                    t.account_name.clone(),
                    t.kind.as_str().to_string(),
                    fmt_money(&t.amount),
                    t.category.clone(),
                    t.saving
                        .as_ref()
                        .map(|s| s.status.as_str().to_string())
                        .unwrap_or_default(),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Account", "Type", "Amount", "Category", "Saving", "Description"],
                rows,
            )
        );
    }
    Ok(())
}
