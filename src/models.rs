// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub const INCOME_CATEGORIES: [&str; 3] = [
    "Worldwide Work Donations",
    "Local Congregation Donations",
    "Other Income",
];

pub const EXPENSE_CATEGORIES: [&str; 3] = [
    "Worldwide Work Expenses",
    "Local Congregation Expenses",
    "Other Expenses",
];

/// Namespace a transaction or opening balance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ledger {
    #[default]
    Default,
    Khoc,
}

impl Ledger {
    pub const ALL: [Ledger; 2] = [Ledger::Default, Ledger::Khoc];

    pub fn as_str(self) -> &'static str {
        match self {
            Ledger::Default => "default",
            Ledger::Khoc => "khoc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Ledger::Default => "Congregation",
            Ledger::Khoc => "KHOC",
        }
    }

    pub fn income_categories(self) -> &'static [&'static str] {
        match self {
            Ledger::Default | Ledger::Khoc => &INCOME_CATEGORIES,
        }
    }

    pub fn expense_categories(self) -> &'static [&'static str] {
        match self {
            Ledger::Default | Ledger::Khoc => &EXPENSE_CATEGORIES,
        }
    }

    pub fn categories(self) -> impl Iterator<Item = &'static str> {
        self.income_categories()
            .iter()
            .chain(self.expense_categories())
            .copied()
    }

    pub fn has_category(self, category: &str) -> bool {
        self.categories().any(|c| c == category)
    }
}

impl fmt::Display for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ledger {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Ledger::Default),
            "khoc" => Ok(Ledger::Khoc),
            other => Err(ParseError::Ledger(other.to_string())),
        }
    }
}

impl ToSql for Ledger {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Ledger {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(ParseError::Kind(other.to_string())),
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: Decimal, // positive magnitude, sign comes from `kind`
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// An unsaved transaction; the store assigns id and timestamps.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: None,
            date,
            description: description.into(),
            category: category.into(),
            amount,
            kind,
            created_at: None,
            updated_at: None,
        }
    }

    /// `YYYY-MM` prefix of the ISO date.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

/// Partial update; `None` fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpeningBalance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub month: String, // YYYY-MM
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OpeningBalance {
    pub fn new(month: impl Into<String>, balance: Decimal) -> Self {
        Self {
            id: None,
            month: month.into(),
            balance,
            note: None,
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a new note. Timestamps default to "now" when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            created_at: None,
            updated_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyData {
    pub month: String,
    pub transactions: Vec<Transaction>,
    pub opening_balance: Option<OpeningBalance>,
    pub summary: TransactionSummary,
    pub ending_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub month: String,
    pub month_name: String,
    pub opening_balance: Decimal,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub ending_balance: Decimal,
    pub transaction_count: usize,
    pub income_transaction_count: usize,
    pub expense_transaction_count: usize,
}
