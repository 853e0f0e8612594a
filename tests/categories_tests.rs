// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tallybook::{cli, commands::categories, db, utils};

// Runs against the production schema so the UNIQUE(owner_id, name)
// constraint itself is under test.
fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(id,email) VALUES (1,'a@example.com'),(2,'b@example.com')",
        [],
    )
    .unwrap();
    utils::set_current_user(&conn, 1).unwrap();
    conn
}

fn category_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["tallybook", "category"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("category", cat_m)) = matches.subcommand() else {
        panic!("no category subcommand");
    };
    cat_m.clone()
}

#[test]
fn duplicate_name_for_one_owner_is_rejected() {
    let conn = setup();
    categories::handle(&conn, &category_matches(&["add", "Food"])).unwrap();
    let err = categories::handle(&conn, &category_matches(&["add", "Food"])).unwrap_err();
    assert!(err.to_string().contains("UNIQUE constraint failed"));
}

#[test]
fn two_owners_may_share_a_name() {
    let conn = setup();
    categories::handle(&conn, &category_matches(&["add", "Food"])).unwrap();
    utils::set_current_user(&conn, 2).unwrap();
    categories::handle(&conn, &category_matches(&["add", "Food"])).unwrap();

    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM expense_categories WHERE name='Food'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(n, 2);
}

#[test]
fn ledgers_have_separate_category_namespaces() {
    let conn = setup();
    categories::handle(&conn, &category_matches(&["add", "Salary"])).unwrap();
    categories::handle(
        &conn,
        &category_matches(&["--ledger", "income", "add", "Salary"]),
    )
    .unwrap();

    let incomes: i64 = conn
        .query_row("SELECT COUNT(*) FROM income_categories", [], |r| r.get(0))
        .unwrap();
    assert_eq!(incomes, 1);
}

#[test]
fn edit_and_rm_stay_in_the_owners_namespace() {
    let conn = setup();
    categories::handle(&conn, &category_matches(&["add", "Food"])).unwrap();
    utils::set_current_user(&conn, 2).unwrap();
    categories::handle(&conn, &category_matches(&["add", "Food"])).unwrap();

    // User 2 renames their Food; user 1's keeps its name.
    categories::handle(
        &conn,
        &category_matches(&["edit", "Food", "--rename", "Groceries"]),
    )
    .unwrap();
    let user1_food: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM expense_categories WHERE owner_id=1 AND name='Food'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(user1_food, 1);

    // User 2 no longer owns a 'Food'; user 1's is invisible to them.
    let err = categories::handle(&conn, &category_matches(&["rm", "Food"])).unwrap_err();
    assert!(err.to_string().contains("not found"));

    utils::set_current_user(&conn, 1).unwrap();
    categories::handle(&conn, &category_matches(&["rm", "Food"])).unwrap();
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM expense_categories", [], |r| r.get(0))
        .unwrap();
    assert_eq!(remaining, 1); // user 2's Groceries
}

#[test]
fn edit_without_changes_is_rejected() {
    let conn = setup();
    categories::handle(&conn, &category_matches(&["add", "Food"])).unwrap();
    let err = categories::handle(&conn, &category_matches(&["edit", "Food"])).unwrap_err();
    assert!(err.to_string().contains("Nothing to change"));
}
