// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::LedgerKind;
use crate::query;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table, require_current_user};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let json_flag = m.get_flag("json");
    let jsonl_flag = m.get_flag("jsonl");
    let kind = LedgerKind::from_flag(m.get_one::<String>("ledger").unwrap());
    let owner_id = require_current_user(conn)?;
    let today = match m.get_one::<String>("as-of") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };

    let sums = query::rolling_sums(conn, kind, owner_id, today)?;
    if !maybe_print_json(json_flag, jsonl_flag, &sums)? {
        println!(
            "{}",
            pretty_table(
                &["Window", "Total"],
                vec![
                    vec!["Last week".into(), fmt_money(&sums.week)],
                    vec!["Last month".into(), fmt_money(&sums.month)],
                    vec!["Last 3 months".into(), fmt_money(&sums.three_months)],
                ],
            )
        );
    }
    Ok(())
}
