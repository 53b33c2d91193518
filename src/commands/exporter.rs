// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{params, Connection};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = *sub.get_one::<i64>("user").unwrap();
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.transaction_date, a.name as account, t.kind, t.amount, t.category, t.description
         FROM transactions t
         INNER JOIN accounts a ON t.account_id=a.id
         WHERE t.user_id=?1 AND t.deleted_at IS NULL
         ORDER BY t.transaction_date, t.id",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "account", "type", "amount", "category", "description"])?;
            for row in rows {
                let (d, a, k, amt, cat, desc) = row?;
                wtr.write_record([d, a, k, amt, cat, desc])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, a, k, amt, cat, desc) = row?;
                items.push(json!({
                    "date": d, "account": a, "type": k, "amount": amt,
                    "category": cat, "description": desc
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
