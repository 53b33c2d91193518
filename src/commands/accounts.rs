// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

use crate::models::{AccountKind, Status};
use crate::stores;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let name = sub.get_one::<String>("name").unwrap();
            let kind_raw = sub.get_one::<String>("kind").unwrap();
            let kind = AccountKind::parse(kind_raw)
                .ok_or_else(|| anyhow!("Unknown account kind '{}'", kind_raw))?;
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let id = stores::accounts::insert(conn, user_id, name, kind, balance)?;
            println!("Added account '{}' ({}, id: {})", name, kind.as_str(), id);
        }
        Some(("list", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let accounts = stores::accounts::list(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let rows = accounts
                    .into_iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name,
                            a.kind.as_str().to_string(),
                            fmt_money(&a.balance),
                            a.status.as_str().to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Kind", "Balance", "Status"], rows)
                );
            }
        }
        Some(("update", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let id = *sub.get_one::<i64>("id").unwrap();
            let existing = stores::accounts::get(conn, id, user_id)?;

            let name = sub.get_one::<String>("name").unwrap_or(&existing.name);
            let kind = match sub.get_one::<String>("kind") {
                Some(raw) => AccountKind::parse(raw)
                    .ok_or_else(|| anyhow!("Unknown account kind '{}'", raw))?,
                None => existing.kind,
            };
            let status = match sub.get_one::<String>("status") {
                Some(raw) => {
                    Status::parse(raw).ok_or_else(|| anyhow!("Unknown status '{}'", raw))?
                }
                None => existing.status,
            };
            stores::accounts::update(conn, id, user_id, name, kind, status)?;
            println!("Updated account {}", id);
        }
        Some(("rm", sub)) => {
            let user_id = *sub.get_one::<i64>("user").unwrap();
            let id = *sub.get_one::<i64>("id").unwrap();
            stores::accounts::soft_delete(conn, id, user_id)?;
            println!("Removed account {}", id);
        }
        _ => {}
    }
    Ok(())
}
