// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::LedgerKind;
use crate::utils::{pretty_table, require_current_user};
use anyhow::Result;
use rusqlite::{params, Connection};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let kind = LedgerKind::from_flag(m.get_one::<String>("ledger").unwrap());
    let owner_id = require_current_user(conn)?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let description = sub.get_one::<String>("description").cloned();
            let sql = format!(
                "INSERT INTO {}(owner_id, name, description) VALUES (?1, ?2, ?3)",
                kind.category_table()
            );
            conn.execute(&sql, params![owner_id, name, description])?;
            println!("Added {} category '{}'", kind.noun(), name);
        }
        Some(("list", _)) => {
            let sql = format!(
                "SELECT name, IFNULL(description,'') FROM {} WHERE owner_id=?1 ORDER BY name",
                kind.category_table()
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params![owner_id], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (name, desc) = row?;
                data.push(vec![name, desc]);
            }
            println!("{}", pretty_table(&["Category", "Description"], data));
        }
        Some(("edit", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let rename = sub.get_one::<String>("rename");
            let description = sub.get_one::<String>("description");
            if rename.is_none() && description.is_none() {
                anyhow::bail!("Nothing to change; pass --rename and/or --description");
            }
            let new_name = rename.unwrap_or(name);
            let changed = if let Some(desc) = description {
                let sql = format!(
                    "UPDATE {} SET name=?1, description=?2 WHERE owner_id=?3 AND name=?4",
                    kind.category_table()
                );
                conn.execute(&sql, params![new_name, desc, owner_id, name])?
            } else {
                let sql = format!(
                    "UPDATE {} SET name=?1 WHERE owner_id=?2 AND name=?3",
                    kind.category_table()
                );
                conn.execute(&sql, params![new_name, owner_id, name])?
            };
            if changed == 0 {
                anyhow::bail!("{} category '{}' not found", kind.noun(), name);
            }
            println!("Updated category '{}'", new_name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let sql = format!(
                "DELETE FROM {} WHERE owner_id=?1 AND name=?2",
                kind.category_table()
            );
            let removed = conn.execute(&sql, params![owner_id, name])?;
            if removed == 0 {
                anyhow::bail!("{} category '{}' not found", kind.noun(), name);
            }
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
