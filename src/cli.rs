// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn ledger_arg() -> Arg {
    Arg::new("ledger")
        .long("ledger")
        .value_parser(["expense", "income"])
        .default_value("expense")
        .help("Which ledger to operate on")
}

fn ledger_cmd(name: &'static str, noun: &'static str) -> Command {
    Command::new(name)
        .about(format!("Record and query {}s", noun))
        .subcommand(
            Command::new("add")
                .about(format!("Add an {}", noun))
                .arg(Arg::new("date").long("date").required(true).help("YYYY-MM-DD"))
                .arg(Arg::new("title").long("title").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(
                    Arg::new("category")
                        .long("category")
                        .required(true)
                        .help("Category name (must already exist for the active user)"),
                )
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about(format!("List {}s with optional date/category filters", noun))
                .arg(
                    Arg::new("filter")
                        .long("filter")
                        .value_parser(["week", "month", "3months"])
                        .help("Rolling window anchored to today"),
                )
                .arg(Arg::new("from").long("from").help("Range start, YYYY-MM-DD (inclusive)"))
                .arg(Arg::new("to").long("to").help("Range end, YYYY-MM-DD (inclusive)"))
                .arg(Arg::new("category").long("category").help("Category name"))
                .arg(
                    Arg::new("as-of")
                        .long("as-of")
                        .help("Anchor date for --filter windows (defaults to today)"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(clap::value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("show")
                .about(format!("Show one {} by id", noun))
                .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64))),
        )
        .subcommand(
            Command::new("edit")
                .about(format!("Update fields of an existing {}", noun))
                .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64)))
                .arg(Arg::new("date").long("date"))
                .arg(Arg::new("title").long("title"))
                .arg(Arg::new("amount").long("amount"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(
            Command::new("rm")
                .about(format!("Delete an {}", noun))
                .arg(Arg::new("id").required(true).value_parser(clap::value_parser!(i64))),
        )
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Multi-user expense and income tracker with rolling spend summaries")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database and print its location"))
        .subcommand(
            Command::new("user")
                .about("Manage users and the active user")
                .subcommand(
                    Command::new("add")
                        .about("Register a user")
                        .arg(Arg::new("email").required(true)),
                )
                .subcommand(Command::new("list").about("List users"))
                .subcommand(
                    Command::new("use")
                        .about("Set the active user")
                        .arg(Arg::new("email").required(true)),
                )
                .subcommand(Command::new("whoami").about("Print the active user")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage per-user categories")
                .arg(ledger_arg())
                .subcommand(
                    Command::new("add")
                        .about("Add a category for the active user")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(Command::new("list").about("List the active user's categories"))
                .subcommand(
                    Command::new("edit")
                        .about("Rename or re-describe a category")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a category (and its entries)")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(ledger_cmd("expense", "expense"))
        .subcommand(ledger_cmd("income", "income"))
        .subcommand(json_flags(
            Command::new("dashboard")
                .about("Rolling week / month / 3-month sums for the active user")
                .arg(ledger_arg())
                .arg(
                    Arg::new("as-of")
                        .long("as-of")
                        .help("Anchor date, YYYY-MM-DD (defaults to today)"),
                ),
        ))
        .subcommand(
            Command::new("export")
                .about("Export the active user's entries")
                .arg(ledger_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["csv", "json"])
                        .default_value("csv"),
                )
                .arg(Arg::new("out").long("out").required(true).help("Output file path")),
        )
        .subcommand(Command::new("doctor").about("Scan the database for integrity problems"))
}
