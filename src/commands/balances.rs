// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::Connection;

use crate::format::{format_currency, format_month_year};
use crate::models::OpeningBalance;
use crate::store::OpeningBalanceStore;
use crate::utils::{ledger_arg, maybe_print_json, parse_decimal, parse_month, pretty_table};
use crate::validation::{OpeningBalanceForm, validate_opening_balance};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            set(conn, sub)?;
        }
        Some(("get", sub)) => get(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Creates or replaces a month's opening balance and returns the record id.
pub fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<i64> {
    let ledger = ledger_arg(sub)?;
    let form = OpeningBalanceForm {
        balance: sub.get_one::<String>("amount").cloned().unwrap_or_default(),
        note: sub.get_one::<String>("note").cloned().unwrap_or_default(),
        month: sub.get_one::<String>("month").cloned().unwrap_or_default(),
    };
    let check = validate_opening_balance(&form);
    if !check.is_valid {
        bail!("{}", check.summary());
    }
    let created_at = match sub.get_one::<String>("created-at") {
        Some(ts) => Some(
            DateTime::parse_from_rfc3339(ts.trim())
                .with_context(|| format!("Invalid timestamp '{}', expected RFC 3339", ts))?
                .with_timezone(&Utc),
        ),
        None => None,
    };
    let month = parse_month(&form.month)?;
    let balance = parse_decimal(&form.balance)?;
    let id = OpeningBalanceStore::new(conn, ledger).set_for_month(
        &month,
        balance,
        Some(form.note.as_str()),
        created_at,
    )?;
    println!(
        "Opening balance for {} set to {} ({} ledger)",
        format_month_year(&month)?,
        format_currency(balance),
        ledger
    );
    Ok(id)
}

fn get(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ledger_arg(sub)?;
    let month = parse_month(sub.get_one::<String>("month").map(String::as_str).unwrap_or_default())?;
    match OpeningBalanceStore::new(conn, ledger).get_for_month(&month)? {
        Some(b) => {
            if !maybe_print_json(sub.get_flag("json"), false, &b)? {
                println!("{}", pretty_table(HEADERS, vec![row(&b)]));
            }
        }
        None => println!("No opening balance recorded for {}", month),
    }
    Ok(())
}

const HEADERS: &[&str] = &["Month", "Balance", "Note", "Updated"];

fn row(b: &OpeningBalance) -> Vec<String> {
    vec![
        b.month.clone(),
        format_currency(b.balance),
        b.note.clone().unwrap_or_default(),
        b.updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
    ]
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ledger_arg(sub)?;
    let data = OpeningBalanceStore::new(conn, ledger).get_all()?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(HEADERS, data.iter().map(row).collect()));
    }
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ledger_arg(sub)?;
    let month = parse_month(sub.get_one::<String>("month").map(String::as_str).unwrap_or_default())?;
    if !OpeningBalanceStore::new(conn, ledger).delete_for_month(&month)? {
        bail!("No opening balance recorded for {}", month);
    }
    println!("Deleted opening balance for {}", month);
    Ok(())
}
