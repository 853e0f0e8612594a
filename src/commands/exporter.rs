// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::LedgerKind;
use crate::utils::require_current_user;
use anyhow::Result;
use rusqlite::{params, Connection};
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let kind = LedgerKind::from_flag(m.get_one::<String>("ledger").unwrap());
    let fmt = m.get_one::<String>("format").unwrap().to_lowercase();
    let out = m.get_one::<String>("out").unwrap();
    let owner_id = require_current_user(conn)?;

    let sql = format!(
        "SELECT e.date, e.title, e.amount, c.name as category, e.notes
         FROM {} e
         LEFT JOIN {} c ON e.category_id=c.id
         WHERE e.owner_id=?1
         ORDER BY e.date, e.id",
        kind.table(),
        kind.category_table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![owner_id], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "title", "amount", "category", "notes"])?;
            for row in rows {
                let (d, t, amt, cat, notes) = row?;
                wtr.write_record([
                    d,
                    t,
                    amt,
                    cat.unwrap_or_default(),
                    notes.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, t, amt, cat, notes) = row?;
                items.push(json!({
                    "date": d, "title": t, "amount": amt, "category": cat, "notes": notes
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        other => anyhow::bail!("Unknown format '{}' (use csv|json)", other),
    }
    println!("Exported {}s to {}", kind.noun(), out);
    Ok(())
}
