// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::LedgerKind;
use crate::query::{self, FilterSpec};
use crate::utils::{
    id_for_category, maybe_print_json, parse_amount, parse_date, pretty_table,
    require_current_user,
};
use anyhow::Result;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::HashMap;

pub fn handle(conn: &Connection, kind: LedgerKind, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, kind, sub)?,
        Some(("list", sub)) => list(conn, kind, sub)?,
        Some(("show", sub)) => show(conn, kind, sub)?,
        Some(("edit", sub)) => edit(conn, kind, sub)?,
        Some(("rm", sub)) => rm(conn, kind, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, kind: LedgerKind, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = require_current_user(conn)?;
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let title = sub.get_one::<String>("title").unwrap();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap();
    let notes = sub.get_one::<String>("notes").cloned();

    let category_id = id_for_category(conn, kind, owner_id, category)?;
    let sql = format!(
        "INSERT INTO {}(owner_id, title, amount, date, category_id, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        kind.table()
    );
    conn.execute(
        &sql,
        params![
            owner_id,
            title,
            amount.to_string(),
            date.to_string(),
            category_id,
            notes
        ],
    )?;
    println!(
        "Recorded {} {} on {} ('{}', category {})",
        kind.noun(),
        amount,
        date,
        title,
        category
    );
    Ok(())
}

fn list(conn: &Connection, kind: LedgerKind, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = list_rows(conn, kind, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.title.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.notes.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Date", "Title", "Amount", "Category", "Notes"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct EntryRow {
    pub id: i64,
    pub date: String,
    pub title: String,
    pub amount: String,
    pub category: String,
    pub notes: String,
}

/// Resolve the list flags into a windowed query for the active user and
/// return display-ready rows.
pub fn list_rows(
    conn: &Connection,
    kind: LedgerKind,
    sub: &clap::ArgMatches,
) -> Result<Vec<EntryRow>> {
    let owner_id = require_current_user(conn)?;
    let spec = FilterSpec::from_params(
        sub.get_one::<String>("filter").map(|s| s.as_str()),
        sub.get_one::<String>("from").map(|s| s.as_str()),
        sub.get_one::<String>("to").map(|s| s.as_str()),
    )?;
    let today = match sub.get_one::<String>("as-of") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let category_id = match sub.get_one::<String>("category") {
        Some(name) => Some(id_for_category(conn, kind, owner_id, name)?),
        None => None,
    };

    let mut entries = query::list_entries(conn, kind, owner_id, &spec, category_id, today)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        entries.truncate(*limit);
    }

    let names = category_names(conn, kind, owner_id)?;
    Ok(entries
        .into_iter()
        .map(|e| EntryRow {
            id: e.id,
            date: e.date.to_string(),
            title: e.title,
            amount: e.amount.to_string(),
            category: names.get(&e.category_id).cloned().unwrap_or_default(),
            notes: e.notes.unwrap_or_default(),
        })
        .collect())
}

fn category_names(
    conn: &Connection,
    kind: LedgerKind,
    owner_id: i64,
) -> Result<HashMap<i64, String>> {
    let sql = format!(
        "SELECT id, name FROM {} WHERE owner_id=?1",
        kind.category_table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![owner_id], |r| {
        Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut map = HashMap::new();
    for row in rows {
        let (id, name) = row?;
        map.insert(id, name);
    }
    Ok(map)
}

fn show(conn: &Connection, kind: LedgerKind, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = require_current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let sql = format!(
        "SELECT date, title, amount, category_id, IFNULL(notes,'') FROM {} WHERE id=?1 AND owner_id=?2",
        kind.table()
    );
    let row = conn
        .query_row(&sql, params![id, owner_id], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, i64>(3)?,
                r.get::<_, String>(4)?,
            ))
        })
        .map_err(|_| anyhow::anyhow!("{} {} not found", kind.noun(), id))?;
    let (date, title, amount, category_id, notes) = row;
    let names = category_names(conn, kind, owner_id)?;
    let category = names.get(&category_id).cloned().unwrap_or_default();
    println!(
        "{}",
        pretty_table(
            &["Id", "Date", "Title", "Amount", "Category", "Notes"],
            vec![vec![id.to_string(), date, title, amount, category, notes]],
        )
    );
    Ok(())
}

fn edit(conn: &Connection, kind: LedgerKind, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = require_current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    if ["date", "title", "amount", "category", "notes"]
        .iter()
        .all(|f| sub.get_one::<String>(f).is_none())
    {
        anyhow::bail!("Nothing to change; pass --date, --title, --amount, --category and/or --notes");
    }

    let sql = format!(
        "SELECT date, title, amount, category_id, notes FROM {} WHERE id=?1 AND owner_id=?2",
        kind.table()
    );
    let (mut date, mut title, mut amount, mut category_id, mut notes) = conn
        .query_row(&sql, params![id, owner_id], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
                r.get::<_, i64>(3)?,
                r.get::<_, Option<String>>(4)?,
            ))
        })
        .map_err(|_| anyhow::anyhow!("{} {} not found", kind.noun(), id))?;

    if let Some(d) = sub.get_one::<String>("date") {
        date = parse_date(d)?.to_string();
    }
    if let Some(t) = sub.get_one::<String>("title") {
        title = t.clone();
    }
    if let Some(a) = sub.get_one::<String>("amount") {
        amount = parse_amount(a)?.to_string();
    }
    if let Some(c) = sub.get_one::<String>("category") {
        category_id = id_for_category(conn, kind, owner_id, c)?;
    }
    if let Some(n) = sub.get_one::<String>("notes") {
        notes = Some(n.clone());
    }

    // owner_id is never part of the SET list; ownership is immutable.
    let sql = format!(
        "UPDATE {} SET date=?1, title=?2, amount=?3, category_id=?4, notes=?5
         WHERE id=?6 AND owner_id=?7",
        kind.table()
    );
    conn.execute(
        &sql,
        params![date, title, amount, category_id, notes, id, owner_id],
    )?;
    println!("Updated {} {}", kind.noun(), id);
    Ok(())
}

fn rm(conn: &Connection, kind: LedgerKind, sub: &clap::ArgMatches) -> Result<()> {
    let owner_id = require_current_user(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let sql = format!("DELETE FROM {} WHERE id=?1 AND owner_id=?2", kind.table());
    let removed = conn.execute(&sql, params![id, owner_id])?;
    if removed == 0 {
        anyhow::bail!("{} {} not found", kind.noun(), id);
    }
    println!("Deleted {} {}", kind.noun(), id);
    Ok(())
}
