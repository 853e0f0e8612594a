// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Owner-scoped, date-windowed ledger queries.
//!
//! Every read of the expense or income tables goes through this module, so
//! the owner predicate cannot be bypassed by a new filter variant. `today`
//! is always an explicit parameter; nothing here reads the wall clock.

use crate::models::{Entry, LedgerKind, RollingSums};
use chrono::{Duration, Months, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed filter input. Recoverable; the caller should re-prompt.
    #[error("invalid filter ({field}): {reason}")]
    InvalidFilter { field: &'static str, reason: String },
    /// The underlying store failed or returned a row this module cannot
    /// read back. Not retried here.
    #[error("ledger store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<rusqlite::Error> for QueryError {
    fn from(e: rusqlite::Error) -> Self {
        QueryError::StoreUnavailable(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Week,
    Month,
    ThreeMonths,
}

/// Date constraint requested by the caller, before resolution against
/// `today`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterSpec {
    AllTime,
    RelativeWindow(WindowKind),
    ExplicitRange { start: NaiveDate, end: NaiveDate },
}

/// Resolved inclusive date bounds. `None` means unconstrained on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBounds {
    pub lower: Option<NaiveDate>,
    pub upper: Option<NaiveDate>,
}

impl FilterSpec {
    /// Build a spec from the raw query-parameter contract:
    /// `filter=week|month|3months` beats an explicit range; a range needs
    /// both ends, and a single supplied end degrades to `AllTime` (the
    /// behavior clients of the original API rely on). Unknown filter names
    /// and unparsable dates are rejected.
    pub fn from_params(
        filter: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<FilterSpec, QueryError> {
        if let Some(name) = filter {
            let kind = match name {
                "week" => WindowKind::Week,
                "month" => WindowKind::Month,
                "3months" => WindowKind::ThreeMonths,
                other => {
                    return Err(QueryError::InvalidFilter {
                        field: "filter",
                        reason: format!("unknown window '{}', expected week|month|3months", other),
                    });
                }
            };
            return Ok(FilterSpec::RelativeWindow(kind));
        }
        match (start, end) {
            (Some(s), Some(e)) => Ok(FilterSpec::ExplicitRange {
                start: parse_filter_date("startDate", s)?,
                end: parse_filter_date("endDate", e)?,
            }),
            // A half-open request is not a valid range; treat it as
            // unfiltered rather than guessing the missing end.
            _ => Ok(FilterSpec::AllTime),
        }
    }
}

fn parse_filter_date(field: &'static str, s: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| QueryError::InvalidFilter {
        field,
        reason: format!("'{}' is not a YYYY-MM-DD date: {}", s, e),
    })
}

/// Subtract whole calendar months, clamping the day-of-month when the
/// target month is shorter (2025-03-31 minus one month is 2025-02-28).
fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Resolve a filter into concrete inclusive bounds against `today`.
///
/// Relative windows deliberately leave the upper bound open: "last week"
/// means on-or-after seven days ago, and a future-dated entry is in every
/// window. Matches the behavior dashboards were built against.
pub fn resolve_date_bounds(spec: &FilterSpec, today: NaiveDate) -> DateBounds {
    match spec {
        FilterSpec::AllTime => DateBounds {
            lower: None,
            upper: None,
        },
        FilterSpec::RelativeWindow(kind) => {
            let lower = match kind {
                WindowKind::Week => today - Duration::days(7),
                WindowKind::Month => months_back(today, 1),
                WindowKind::ThreeMonths => months_back(today, 3),
            };
            DateBounds {
                lower: Some(lower),
                upper: None,
            }
        }
        FilterSpec::ExplicitRange { start, end } => DateBounds {
            lower: Some(*start),
            upper: Some(*end),
        },
    }
}

fn push_date_clauses(bounds: &DateBounds, sql: &mut String, params: &mut Vec<String>) {
    if let Some(lower) = bounds.lower {
        sql.push_str(" AND date>=?");
        params.push(lower.to_string());
    }
    if let Some(upper) = bounds.upper {
        sql.push_str(" AND date<=?");
        params.push(upper.to_string());
    }
}

fn run_query<T>(
    conn: &Connection,
    sql: &str,
    params: &[String],
    mut map: impl FnMut(&rusqlite::Row<'_>) -> Result<T, QueryError>,
) -> Result<Vec<T>, QueryError> {
    let mut stmt = conn.prepare(sql)?;
    let bound: Vec<&dyn rusqlite::ToSql> =
        params.iter().map(|s| s as &dyn rusqlite::ToSql).collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(bound))?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(map(r)?);
    }
    Ok(out)
}

fn read_date(s: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| QueryError::StoreUnavailable(format!("corrupt date '{}': {}", s, e)))
}

fn read_amount(s: &str) -> Result<Decimal, QueryError> {
    s.parse::<Decimal>()
        .map_err(|e| QueryError::StoreUnavailable(format!("corrupt amount '{}': {}", s, e)))
}

/// List one owner's entries under the resolved date bounds, optionally
/// refined to a single category (logical AND). Rows come back in insertion
/// order; no-match is an empty vec, not an error.
pub fn list_entries(
    conn: &Connection,
    kind: LedgerKind,
    owner_id: i64,
    spec: &FilterSpec,
    category_id: Option<i64>,
    today: NaiveDate,
) -> Result<Vec<Entry>, QueryError> {
    let bounds = resolve_date_bounds(spec, today);
    let mut sql = format!(
        "SELECT id, owner_id, title, amount, date, category_id, notes FROM {} WHERE owner_id=?",
        kind.table()
    );
    let mut params: Vec<String> = vec![owner_id.to_string()];
    push_date_clauses(&bounds, &mut sql, &mut params);
    if let Some(cat) = category_id {
        sql.push_str(" AND category_id=?");
        params.push(cat.to_string());
    }
    sql.push_str(" ORDER BY id");

    run_query(conn, &sql, &params, |r| {
        let date: String = r.get(4)?;
        let amount: String = r.get(3)?;
        Ok(Entry {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            title: r.get(2)?,
            amount: read_amount(&amount)?,
            date: read_date(&date)?,
            category_id: r.get(5)?,
            notes: r.get(6)?,
        })
    })
}

/// Sum one owner's amounts under the resolved date bounds. Accumulates in
/// `Decimal`; an empty window sums to zero.
pub fn sum_amount(
    conn: &Connection,
    kind: LedgerKind,
    owner_id: i64,
    spec: &FilterSpec,
    today: NaiveDate,
) -> Result<Decimal, QueryError> {
    let bounds = resolve_date_bounds(spec, today);
    let mut sql = format!("SELECT amount FROM {} WHERE owner_id=?", kind.table());
    let mut params: Vec<String> = vec![owner_id.to_string()];
    push_date_clauses(&bounds, &mut sql, &mut params);

    let amounts = run_query(conn, &sql, &params, |r| {
        let raw: String = r.get(0)?;
        read_amount(&raw)
    })?;
    Ok(amounts.into_iter().sum())
}

/// The dashboard aggregate: three independent rolling sums anchored to
/// `today`. Either all three buckets are computed or the call fails; a
/// caller never sees a partial result.
pub fn rolling_sums(
    conn: &Connection,
    kind: LedgerKind,
    owner_id: i64,
    today: NaiveDate,
) -> Result<RollingSums, QueryError> {
    let window = |w| sum_amount(conn, kind, owner_id, &FilterSpec::RelativeWindow(w), today);
    Ok(RollingSums {
        week: window(WindowKind::Week)?,
        month: window(WindowKind::Month)?,
        three_months: window(WindowKind::ThreeMonths)?,
    })
}
