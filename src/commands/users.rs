// Copyright (c) 2025 Moneyledger contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::stores;
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let email = sub.get_one::<String>("email").unwrap();
            let id = stores::users::insert(conn, name, email)?;
            println!("Added user '{}' <{}> (id: {})", name, email, id);
        }
        Some(("list", _)) => {
            let users = stores::users::list(conn)?;
            let rows = users
                .into_iter()
                .map(|u| vec![u.id.to_string(), u.name, u.email])
                .collect();
            println!("{}", pretty_table(&["Id", "Name", "Email"], rows));
        }
        _ => {}
    }
    Ok(())
}
