// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::dates::{month_key, parse_month_key};
use crate::models::Ledger;
use crate::utils::pretty_table;
use crate::validation::{MAX_AMOUNT, MIN_AMOUNT};

/// Problems found in stored data, as `(issue, detail)` pairs.
pub fn find_issues(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();

    // 1) Transaction rows the typed store would reject or misreport
    let mut stmt = conn.prepare(
        "SELECT id, ledger, date, category, amount FROM transactions ORDER BY ledger, date, id",
    )?;
    let mut cur = stmt.query([])?;
    let mut tx_months: BTreeSet<(String, String)> = BTreeSet::new();
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let ledger: String = r.get(1)?;
        let date: String = r.get(2)?;
        let category: String = r.get(3)?;
        let amount: String = r.get(4)?;

        match chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
            Ok(d) => {
                tx_months.insert((ledger.clone(), month_key(d)));
            }
            Err(_) => rows.push(("bad_date".into(), format!("tx {} ({}): '{}'", id, ledger, date))),
        }
        match amount.parse::<Decimal>() {
            Ok(a) if (MIN_AMOUNT..=MAX_AMOUNT).contains(&a) && a.scale() <= 2 => {}
            _ => rows.push(("bad_amount".into(), format!("tx {} ({}): '{}'", id, ledger, amount))),
        }
        let known = ledger
            .parse::<Ledger>()
            .map(|l| l.has_category(&category))
            .unwrap_or(false);
        if !known {
            rows.push((
                "unknown_category".into(),
                format!("tx {} ({}): '{}'", id, ledger, category),
            ));
        }
    }

    // 2) Opening balances
    let mut stmt2 = conn.prepare("SELECT ledger, month, balance FROM opening_balances")?;
    let mut cur2 = stmt2.query([])?;
    let mut balance_months: BTreeSet<(String, String)> = BTreeSet::new();
    while let Some(r) = cur2.next()? {
        let ledger: String = r.get(0)?;
        let month: String = r.get(1)?;
        let balance: String = r.get(2)?;
        if parse_month_key(&month).is_err() {
            rows.push(("bad_month".into(), format!("{} opening balance '{}'", ledger, month)));
        }
        if balance.parse::<Decimal>().is_err() {
            rows.push((
                "bad_balance".into(),
                format!("{} {}: '{}'", ledger, month, balance),
            ));
        }
        balance_months.insert((ledger, month));
    }

    // 3) Months with activity but nothing to start from
    for (ledger, month) in tx_months.difference(&balance_months) {
        rows.push((
            "missing_opening_balance".into(),
            format!("{} {}", ledger, month),
        ));
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = issues.into_iter().map(|(a, b)| vec![a, b]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
