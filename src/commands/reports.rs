// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calc::{
    available_months, format_report_text, group_by_category, monthly_data, monthly_report,
    most_recent_month, should_suggest_next_month_balance, summarize,
};
use crate::config::Settings;
use crate::dates::next_month;
use crate::format::{format_category_name, format_currency, format_month_year, format_plain};
use crate::models::{Ledger, MonthlyReport};
use crate::report::{MonthlyReportData, RendererKind, build_renderer, open_report, save_report};
use crate::store::{OpeningBalanceStore, TransactionStore};
use crate::utils::{ledger_arg, maybe_print_json, parse_month, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("months", sub)) => months(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("pdf", sub)) => pdf(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct MonthRow {
    pub month: String,
    pub label: String,
    pub transactions: usize,
    pub opening_balance: Option<Decimal>,
    pub ending_balance: Decimal,
}

/// One row per month with activity, most recent first.
pub fn month_rows(conn: &Connection, ledger: Ledger) -> Result<Vec<MonthRow>> {
    let transactions = TransactionStore::new(conn, ledger).get_all()?;
    let balances = OpeningBalanceStore::new(conn, ledger).get_all()?;
    available_months(&transactions, &balances)
        .into_iter()
        .map(|month| {
            let data = monthly_data(&month, &transactions, &balances);
            Ok(MonthRow {
                label: format_month_year(&month)?,
                transactions: data.summary.count,
                opening_balance: data.opening_balance.map(|b| b.balance),
                ending_balance: data.ending_balance,
                month,
            })
        })
        .collect()
}

fn months(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let rows = month_rows(conn, ledger_arg(sub)?)?;
    if !maybe_print_json(sub.get_flag("json"), false, &rows)? {
        let table = rows
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    r.label.clone(),
                    r.transactions.to_string(),
                    r.opening_balance.map(format_currency).unwrap_or_else(|| "-".into()),
                    format_currency(r.ending_balance),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Name", "Transactions", "Opening", "Ending"],
                table
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub count: usize,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MonthSummary {
    #[serde(flatten)]
    pub report: MonthlyReport,
    pub categories: Vec<CategoryTotal>,
    /// Set when the following month has no opening balance yet.
    pub suggested_next_opening: Option<String>,
}

/// Balance calculation for `month`, or the most recent month with activity.
pub fn month_summary(conn: &Connection, ledger: Ledger, month: Option<&str>) -> Result<MonthSummary> {
    let tx_store = TransactionStore::new(conn, ledger);
    let balances = OpeningBalanceStore::new(conn, ledger).get_all()?;
    let month = match month {
        Some(m) => parse_month(m)?,
        None => most_recent_month(&tx_store.get_all()?, &balances)
            .ok_or_else(|| anyhow!("No transactions or opening balances recorded yet"))?,
    };
    let transactions = tx_store.get_by_month(&month)?;
    let opening = balances.iter().find(|b| b.month == month);
    let report = monthly_report(&month, &transactions, opening)?;
    let categories = group_by_category(&transactions)
        .into_iter()
        .map(|(category, members)| {
            let s = summarize(&members);
            CategoryTotal {
                category,
                count: s.count,
                total_income: s.total_income,
                total_expenses: s.total_expenses,
            }
        })
        .collect();
    let suggested_next_opening =
        if should_suggest_next_month_balance(&month, &transactions, &balances)? {
            Some(next_month(&month)?)
        } else {
            None
        };
    Ok(MonthSummary {
        report,
        categories,
        suggested_next_opening,
    })
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ledger_arg(sub)?;
    let s = month_summary(
        conn,
        ledger,
        sub.get_one::<String>("month").map(String::as_str),
    )?;
    if maybe_print_json(sub.get_flag("json"), false, &s)? {
        return Ok(());
    }
    println!("{}", format_report_text(&s.report));
    if !s.categories.is_empty() {
        let rows = s
            .categories
            .iter()
            .map(|c| {
                vec![
                    format_category_name(&c.category).to_string(),
                    c.count.to_string(),
                    format_currency(c.total_income),
                    format_currency(c.total_expenses),
                ]
            })
            .collect();
        println!();
        println!(
            "{}",
            pretty_table(&["Category", "Count", "Income", "Expenses"], rows)
        );
    }
    if let Some(next) = &s.suggested_next_opening {
        println!();
        println!(
            "No opening balance for {} yet. To carry this month over run:\n  \
             congregation-accounts balance set --ledger {} --month {} --amount {}",
            next,
            ledger,
            next,
            format_plain(s.report.ending_balance)
        );
    }
    Ok(())
}

/// Gathers the month's transactions and opening balance for a renderer.
pub fn report_data(
    conn: &Connection,
    ledger: Ledger,
    month: &str,
    settings: &Settings,
    report_date: Option<String>,
) -> Result<MonthlyReportData> {
    let month = parse_month(month)?;
    Ok(MonthlyReportData {
        transactions: TransactionStore::new(conn, ledger).get_by_month(&month)?,
        opening_balance: OpeningBalanceStore::new(conn, ledger).get_for_month(&month)?,
        congregation_name: settings.congregation_name.clone(),
        report_date,
        month,
    })
}

fn pdf(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ledger_arg(sub)?;
    let settings = Settings::load(conn)?;
    let kind = match sub.get_one::<String>("renderer") {
        Some(r) => r.parse::<RendererKind>()?,
        None => settings.renderer,
    };
    let month = sub
        .get_one::<String>("month")
        .map(String::as_str)
        .unwrap_or_default();
    let data = report_data(
        conn,
        ledger,
        month,
        &settings,
        sub.get_one::<String>("report-date").cloned(),
    )?;
    let renderer = build_renderer(kind, &settings);
    let path = if sub.get_flag("open") {
        open_report(renderer.as_ref(), &data)?
    } else {
        let dir = sub
            .get_one::<String>("out")
            .map(String::as_str)
            .unwrap_or(".");
        save_report(renderer.as_ref(), &data, Path::new(dir))?
    };
    println!("Report ({} renderer) written to {}", kind, path.display());
    Ok(())
}
