// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly aggregation: summaries, balances, month grouping and report text.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use rust_decimal::Decimal;

use crate::dates::next_month;
use crate::error::ParseError;
use crate::format::{format_currency, format_month_year};
use crate::models::{
    MonthlyData, MonthlyReport, OpeningBalance, Transaction, TransactionKind, TransactionSummary,
};

pub fn summarize(transactions: &[Transaction]) -> TransactionSummary {
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    for t in transactions {
        match t.kind {
            TransactionKind::Income => total_income += t.amount,
            TransactionKind::Expense => total_expenses += t.amount,
        }
    }
    TransactionSummary {
        total_income,
        total_expenses,
        net: total_income - total_expenses,
        count: transactions.len(),
    }
}

/// Opening amount carried through the month's income and expenses.
pub fn ending_balance(opening: Decimal, transactions: &[Transaction]) -> Decimal {
    opening + summarize(transactions).net
}

pub fn transactions_for_month(transactions: &[Transaction], month: &str) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| t.date.to_string().starts_with(month))
        .cloned()
        .collect()
}

/// Months that have any transaction or opening balance, most recent first.
pub fn available_months(
    transactions: &[Transaction],
    opening_balances: &[OpeningBalance],
) -> Vec<String> {
    let months: BTreeSet<String> = transactions
        .iter()
        .map(Transaction::month)
        .chain(opening_balances.iter().map(|b| b.month.clone()))
        .collect();
    months.into_iter().rev().collect()
}

pub fn most_recent_month(
    transactions: &[Transaction],
    opening_balances: &[OpeningBalance],
) -> Option<String> {
    available_months(transactions, opening_balances)
        .into_iter()
        .next()
}

/// Groups by category in first-seen order; transactions keep their relative order.
pub fn group_by_category(transactions: &[Transaction]) -> Vec<(String, Vec<Transaction>)> {
    let mut groups: Vec<(String, Vec<Transaction>)> = Vec::new();
    for t in transactions {
        match groups.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, members)) => members.push(t.clone()),
            None => groups.push((t.category.clone(), vec![t.clone()])),
        }
    }
    groups
}

pub fn monthly_data(
    month: &str,
    transactions: &[Transaction],
    opening_balances: &[OpeningBalance],
) -> MonthlyData {
    let monthly = transactions_for_month(transactions, month);
    let opening_balance = opening_balances.iter().find(|b| b.month == month).cloned();
    let opening = opening_balance
        .as_ref()
        .map(|b| b.balance)
        .unwrap_or(Decimal::ZERO);
    let summary = summarize(&monthly);
    MonthlyData {
        month: month.to_string(),
        ending_balance: opening + summary.net,
        transactions: monthly,
        opening_balance,
        summary,
    }
}

pub fn monthly_report(
    month: &str,
    transactions: &[Transaction],
    opening_balance: Option<&OpeningBalance>,
) -> Result<MonthlyReport> {
    let summary = summarize(transactions);
    let opening = opening_balance.map(|b| b.balance).unwrap_or(Decimal::ZERO);
    Ok(MonthlyReport {
        month: month.to_string(),
        month_name: format_month_year(month)?,
        opening_balance: opening,
        total_income: summary.total_income,
        total_expenses: summary.total_expenses,
        ending_balance: opening + summary.net,
        transaction_count: summary.count,
        income_transaction_count: transactions.iter().filter(|t| t.is_income()).count(),
        expense_transaction_count: transactions.iter().filter(|t| t.is_expense()).count(),
    })
}

pub fn format_report_text(report: &MonthlyReport) -> String {
    let opening = format_currency(report.opening_balance);
    let income = format_currency(report.total_income);
    let expenses = format_currency(report.total_expenses);
    let ending = format_currency(report.ending_balance);
    format!(
        "MONTHLY REPORT - {name}\n\
         \n\
         === MONTHLY BALANCE CALCULATION ===\n\
         Starting Balance: {opening}\n\
         Total Income: {income}\n\
         Total Expenses: {expenses}\n\
         End of Month Balance: {ending}\n\
         \n\
         === TRANSACTION COUNT ===\n\
         Total Transactions: {total}\n\
         Income Transactions: {inc}\n\
         Expense Transactions: {exp}\n\
         \n\
         === CALCULATION BREAKDOWN ===\n\
         {opening} + {income} - {expenses} = {ending}",
        name = report.month_name,
        total = report.transaction_count,
        inc = report.income_transaction_count,
        exp = report.expense_transaction_count,
    )
}

/// Percentage change from `old` to `new`; a zero baseline reports 0 or 100.
pub fn percentage_change(old: Decimal, new: Decimal) -> Decimal {
    if old.is_zero() {
        return if new.is_zero() {
            Decimal::ZERO
        } else {
            Decimal::ONE_HUNDRED
        };
    }
    (new - old) / old * Decimal::ONE_HUNDRED
}

pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

/// True when the month saw activity but the following month has no opening balance yet.
pub fn should_suggest_next_month_balance(
    month: &str,
    month_transactions: &[Transaction],
    opening_balances: &[OpeningBalance],
) -> Result<bool> {
    if month_transactions.is_empty() {
        return Ok(false);
    }
    let next = next_month(month)?;
    Ok(!opening_balances.iter().any(|b| b.month == next))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Description,
    Category,
    Kind,
}

impl FromStr for SortField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortField::Date),
            "amount" => Ok(SortField::Amount),
            "description" => Ok(SortField::Description),
            "category" => Ok(SortField::Category),
            "type" => Ok(SortField::Kind),
            other => Err(ParseError::SortField(other.to_string())),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortField::Date => "Date",
            SortField::Amount => "Amount",
            SortField::Description => "Description",
            SortField::Category => "Category",
            SortField::Kind => "Type",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(ParseError::SortOrder(other.to_string())),
        }
    }
}

impl SortOrder {
    pub fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }
}

/// Stable sort; ties keep their input order.
pub fn sort_transactions(transactions: &mut [Transaction], field: SortField, order: SortOrder) {
    transactions.sort_by(|a, b| {
        let ord = match field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Amount => a.amount.cmp(&b.amount),
            SortField::Description => a.description.to_lowercase().cmp(&b.description.to_lowercase()),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Kind => a.kind.as_str().cmp(b.kind.as_str()),
        };
        order.apply(ord)
    });
}
