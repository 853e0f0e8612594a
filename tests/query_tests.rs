// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use tallybook::models::LedgerKind;
use tallybook::query::{list_entries, rolling_sums, sum_amount, FilterSpec, WindowKind};

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE users(id INTEGER PRIMARY KEY, email TEXT NOT NULL UNIQUE);
        CREATE TABLE expense_categories(
            id INTEGER PRIMARY KEY,
            owner_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            UNIQUE(owner_id, name)
        );
        CREATE TABLE expenses(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            notes TEXT
        );
        "#,
    )
    .unwrap();
    conn.execute(
        "INSERT INTO users(id,email) VALUES (1,'a@example.com'),(2,'b@example.com')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO expense_categories(id,owner_id,name) VALUES (1,1,'Food'),(2,1,'Rent'),(3,2,'Food')",
        [],
    )
    .unwrap();
    conn
}

fn insert(conn: &Connection, owner: i64, date: &str, amount: &str, category: i64) {
    conn.execute(
        "INSERT INTO expenses(owner_id,title,amount,date,category_id) VALUES (?1,'t',?2,?3,?4)",
        params![owner, amount, date, category],
    )
    .unwrap();
}

#[test]
fn queries_never_cross_owners() {
    let conn = setup();
    insert(&conn, 1, "2025-07-10", "10", 1);
    insert(&conn, 2, "2025-07-10", "99", 3);

    let rows = list_entries(
        &conn,
        LedgerKind::Expense,
        1,
        &FilterSpec::AllTime,
        None,
        d("2025-07-15"),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows.iter().all(|e| e.owner_id == 1));

    let sums = rolling_sums(&conn, LedgerKind::Expense, 1, d("2025-07-15")).unwrap();
    assert_eq!(sums.week, Decimal::from(10));
}

#[test]
fn all_time_returns_everything_in_insertion_order() {
    let conn = setup();
    insert(&conn, 1, "2025-03-01", "3", 1);
    insert(&conn, 1, "2025-01-01", "1", 1);
    insert(&conn, 1, "2025-02-01", "2", 2);

    // "now" must not matter for AllTime.
    for today in ["2020-01-01", "2025-07-15", "2030-12-31"] {
        let rows = list_entries(
            &conn,
            LedgerKind::Expense,
            1,
            &FilterSpec::AllTime,
            None,
            d(today),
        )
        .unwrap();
        let dates: Vec<String> = rows.iter().map(|e| e.date.to_string()).collect();
        assert_eq!(dates, ["2025-03-01", "2025-01-01", "2025-02-01"]);
    }
}

#[test]
fn week_window_boundary_is_inclusive() {
    let conn = setup();
    insert(&conn, 1, "2025-07-08", "5", 1); // exactly 7 days before
    insert(&conn, 1, "2025-07-07", "7", 1); // one day too old

    let rows = list_entries(
        &conn,
        LedgerKind::Expense,
        1,
        &FilterSpec::RelativeWindow(WindowKind::Week),
        None,
        d("2025-07-15"),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].date, d("2025-07-08"));
}

#[test]
fn week_window_includes_future_dated_entries() {
    let conn = setup();
    insert(&conn, 1, "2025-08-01", "4", 1);

    let rows = list_entries(
        &conn,
        LedgerKind::Expense,
        1,
        &FilterSpec::RelativeWindow(WindowKind::Week),
        None,
        d("2025-07-15"),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn explicit_range_is_inclusive_on_both_ends() {
    let conn = setup();
    insert(&conn, 1, "2024-12-31", "1", 1);
    insert(&conn, 1, "2025-01-01", "2", 1);
    insert(&conn, 1, "2025-01-31", "3", 1);
    insert(&conn, 1, "2025-02-01", "4", 1);

    let spec = FilterSpec::ExplicitRange {
        start: d("2025-01-01"),
        end: d("2025-01-31"),
    };
    let rows = list_entries(&conn, LedgerKind::Expense, 1, &spec, None, d("2025-07-15")).unwrap();
    let dates: Vec<String> = rows.iter().map(|e| e.date.to_string()).collect();
    assert_eq!(dates, ["2025-01-01", "2025-01-31"]);
}

#[test]
fn category_refinement_composes_with_and() {
    let conn = setup();
    insert(&conn, 1, "2025-07-10", "10", 1); // in window, category 1
    insert(&conn, 1, "2025-07-10", "20", 2); // in window, category 2
    insert(&conn, 1, "2025-01-01", "30", 1); // out of window, category 1

    let rows = list_entries(
        &conn,
        LedgerKind::Expense,
        1,
        &FilterSpec::RelativeWindow(WindowKind::Month),
        Some(1),
        d("2025-07-15"),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].amount, Decimal::from(10));
}

#[test]
fn empty_windows_sum_to_zero() {
    let conn = setup();
    let sums = rolling_sums(&conn, LedgerKind::Expense, 1, d("2025-07-15")).unwrap();
    assert_eq!(sums.week, Decimal::ZERO);
    assert_eq!(sums.month, Decimal::ZERO);
    assert_eq!(sums.three_months, Decimal::ZERO);
}

#[test]
fn recent_entry_is_counted_in_all_three_windows() {
    let conn = setup();
    insert(&conn, 1, "2025-07-13", "25", 1); // two days before "now"

    let sums = rolling_sums(&conn, LedgerKind::Expense, 1, d("2025-07-15")).unwrap();
    assert_eq!(sums.week, Decimal::from(25));
    assert_eq!(sums.month, Decimal::from(25));
    assert_eq!(sums.three_months, Decimal::from(25));
}

#[test]
fn windows_diverge_for_older_entries() {
    let conn = setup();
    insert(&conn, 1, "2025-07-13", "5", 1); // within a week
    insert(&conn, 1, "2025-06-20", "7", 1); // within a month only
    insert(&conn, 1, "2025-05-01", "11", 1); // within three months only

    let sums = rolling_sums(&conn, LedgerKind::Expense, 1, d("2025-07-15")).unwrap();
    assert_eq!(sums.week, Decimal::from(5));
    assert_eq!(sums.month, Decimal::from(12));
    assert_eq!(sums.three_months, Decimal::from(23));
}

#[test]
fn sums_are_exact_over_decimal_amounts() {
    let conn = setup();
    for _ in 0..3 {
        insert(&conn, 1, "2025-07-14", "0.10", 1);
    }
    let total = sum_amount(
        &conn,
        LedgerKind::Expense,
        1,
        &FilterSpec::RelativeWindow(WindowKind::Week),
        d("2025-07-15"),
    )
    .unwrap();
    assert_eq!(total, "0.30".parse::<Decimal>().unwrap());
    assert_eq!(format!("{:.2}", total), "0.30");
}
