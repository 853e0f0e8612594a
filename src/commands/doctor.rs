// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::LedgerKind;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();
    for kind in [LedgerKind::Expense, LedgerKind::Income] {
        scan_ledger(conn, kind, &mut rows)?;
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

fn scan_ledger(conn: &Connection, kind: LedgerKind, rows: &mut Vec<Vec<String>>) -> Result<()> {
    // 1) Entries whose category belongs to a different owner. These should
    // be impossible through the CLI; their presence means the ownership
    // invariant was violated out-of-band.
    let sql = format!(
        "SELECT e.id FROM {} e JOIN {} c ON e.category_id=c.id WHERE e.owner_id != c.owner_id",
        kind.table(),
        kind.category_table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec![
            "cross_owner_category".into(),
            format!("{} {}", kind.noun(), id),
        ]);
    }

    // 2) Stored amounts and dates that no longer parse.
    let sql = format!("SELECT id, amount, date FROM {}", kind.table());
    let mut stmt = conn.prepare(&sql)?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let amount: String = r.get(1)?;
        let date: String = r.get(2)?;
        if amount.parse::<rust_decimal::Decimal>().is_err() {
            rows.push(vec![
                "bad_amount".into(),
                format!("{} {}: '{}'", kind.noun(), id, amount),
            ]);
        }
        if chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
            rows.push(vec![
                "bad_date".into(),
                format!("{} {}: '{}'", kind.noun(), id, date),
            ]);
        }
    }
    Ok(())
}
