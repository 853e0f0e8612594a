// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::models::LedgerKind;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parse a ledger amount. Amounts are magnitudes; the ledger (expense vs
/// income) carries the sign, so negative input is rejected.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}'", s))?;
    if d.is_sign_negative() {
        anyhow::bail!("Amount '{}' must not be negative", s);
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn id_for_user(conn: &Connection, email: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM users WHERE email=?1")?;
    let id: i64 = stmt
        .query_row(params![email], |r| r.get(0))
        .with_context(|| format!("User '{}' not found", email))?;
    Ok(id)
}

/// Resolve a category name to its id within one owner's namespace for one
/// ledger. Another owner's category of the same name is invisible here.
pub fn id_for_category(
    conn: &Connection,
    kind: LedgerKind,
    owner_id: i64,
    name: &str,
) -> Result<i64> {
    let sql = format!(
        "SELECT id FROM {} WHERE owner_id=?1 AND name=?2",
        kind.category_table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let id: i64 = stmt
        .query_row(params![owner_id, name], |r| r.get(0))
        .with_context(|| format!("{} category '{}' not found", kind.noun(), name))?;
    Ok(id)
}

// Active-user setting
pub fn get_current_user(conn: &Connection) -> Result<Option<i64>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='current_user'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    match v {
        Some(s) => Ok(Some(s.parse::<i64>().with_context(|| {
            format!("Invalid current_user setting '{}'", s)
        })?)),
        None => Ok(None),
    }
}

pub fn set_current_user(conn: &Connection, user_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('current_user', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![user_id.to_string()],
    )?;
    Ok(())
}

pub fn require_current_user(conn: &Connection) -> Result<i64> {
    get_current_user(conn)?
        .context("No active user; run 'tallybook user use <email>' first")
}
