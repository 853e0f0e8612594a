// Copyright (c) 2025 Tallybook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// One ledger row. Expenses and incomes share this shape; `owner_id` is set
/// at insert and never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_id: i64,
    pub notes: Option<String>,
}

/// Which of the two ledgers a command or query operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    Expense,
    Income,
}

impl LedgerKind {
    /// Map the CLI `--ledger` flag value. The parser has already limited
    /// the value to the two known names.
    pub fn from_flag(s: &str) -> LedgerKind {
        match s {
            "income" => LedgerKind::Income,
            _ => LedgerKind::Expense,
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            LedgerKind::Expense => "expenses",
            LedgerKind::Income => "incomes",
        }
    }

    pub fn category_table(self) -> &'static str {
        match self {
            LedgerKind::Expense => "expense_categories",
            LedgerKind::Income => "income_categories",
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            LedgerKind::Expense => "expense",
            LedgerKind::Income => "income",
        }
    }
}

/// The three rolling dashboard sums. All buckets are always present; a
/// window with no rows reports zero. Buckets overlap: a row two days old
/// counts in all three.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollingSums {
    pub week: Decimal,
    pub month: Decimal,
    pub three_months: Decimal,
}
