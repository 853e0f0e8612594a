// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_current_user, id_for_user, pretty_table, set_current_user};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            conn.execute("INSERT INTO users(email) VALUES (?1)", params![email])?;
            println!("Registered user '{}'", email);
        }
        Some(("list", _)) => {
            let active = get_current_user(conn)?;
            let mut stmt = conn.prepare("SELECT id, email FROM users ORDER BY email")?;
            let rows = stmt.query_map([], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?;
            let mut data = Vec::new();
            for row in rows {
                let (id, email) = row?;
                let marker = if active == Some(id) { "*" } else { "" };
                data.push(vec![id.to_string(), email, marker.to_string()]);
            }
            println!("{}", pretty_table(&["Id", "Email", "Active"], data));
        }
        Some(("use", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let id = id_for_user(conn, email)?;
            set_current_user(conn, id)?;
            println!("Active user is now '{}'", email);
        }
        Some(("whoami", _)) => match get_current_user(conn)? {
            Some(id) => {
                let email: String =
                    conn.query_row("SELECT email FROM users WHERE id=?1", params![id], |r| {
                        r.get(0)
                    })?;
                println!("{}", email);
            }
            None => println!("(no active user)"),
        },
        _ => {}
    }
    Ok(())
}
