// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

use crate::calc::{SortField, SortOrder, sort_transactions};
use crate::dates::today;
use crate::format::{format_category_name, format_currency, format_date};
use crate::models::{Transaction, TransactionKind, TransactionPatch};
use crate::store::TransactionStore;
use crate::utils::{
    ledger_arg, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table,
};
use crate::validation::{
    FormValidationResult, TransactionForm, validate_amount, validate_category,
    validate_description, validate_kind, validate_transaction,
};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            add(conn, sub)?;
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn arg<'m>(sub: &'m clap::ArgMatches, id: &str) -> Option<&'m str> {
    sub.get_one::<String>(id).map(|s| s.as_str())
}

fn ensure_valid(result: FormValidationResult) -> Result<()> {
    if !result.is_valid {
        bail!("{}", result.summary());
    }
    Ok(())
}

/// Adds the transaction described by `sub` and returns its id.
pub fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<i64> {
    let ledger = ledger_arg(sub)?;
    let form = TransactionForm {
        description: arg(sub, "description").unwrap_or_default().to_string(),
        category: arg(sub, "category").unwrap_or_default().trim().to_string(),
        amount: arg(sub, "amount").unwrap_or_default().to_string(),
        kind: arg(sub, "type").unwrap_or_default().to_string(),
        date: arg(sub, "date").map(str::to_string),
    };
    ensure_valid(validate_transaction(ledger, &form))?;

    let date = match form.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let tx = Transaction::new(
        date,
        form.description.trim(),
        form.category,
        parse_decimal(&form.amount)?,
        form.kind.parse()?,
    );
    let id = TransactionStore::new(conn, ledger).add(&tx)?;
    println!(
        "Recorded {} {} on {} '{}' (id {}, {} ledger)",
        tx.kind,
        format_currency(tx.amount),
        tx.date,
        tx.description,
        id,
        ledger
    );
    Ok(id)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.map(|i| i.to_string()).unwrap_or_default(),
                    format_date(t.date),
                    t.description.clone(),
                    format_category_name(&t.category).to_string(),
                    t.kind.to_string(),
                    format_currency(t.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Category", "Type", "Amount"],
                rows
            )
        );
    }
    Ok(())
}

/// Transactions selected by the `tx list` filters, sorted and limited.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let store = TransactionStore::new(conn, ledger_arg(sub)?);
    let mut data = match arg(sub, "month") {
        Some(month) => store.get_by_month(&parse_month(month)?)?,
        None => store.get_all()?,
    };
    if let Some(kind) = arg(sub, "type") {
        let kind: TransactionKind = kind.parse()?;
        data.retain(|t| t.kind == kind);
    }
    if let Some(category) = arg(sub, "category") {
        let category = category.trim();
        data.retain(|t| t.category == category);
    }
    let field: SortField = arg(sub, "sort").unwrap_or("date").parse()?;
    let order: SortOrder = arg(sub, "order").unwrap_or("desc").parse()?;
    sort_transactions(&mut data, field, order);
    if let Some(limit) = sub.get_one::<usize>("limit") {
        data.truncate(*limit);
    }
    Ok(data)
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ledger_arg(sub)?;
    let id = *sub
        .get_one::<i64>("ID")
        .ok_or_else(|| anyhow::anyhow!("Transaction id is required"))?;

    let mut patch = TransactionPatch::default();
    if let Some(d) = arg(sub, "date") {
        patch.date = Some(parse_date(d)?);
    }
    if let Some(d) = arg(sub, "description") {
        ensure_valid(validate_description(d))?;
        patch.description = Some(d.trim().to_string());
    }
    if let Some(c) = arg(sub, "category") {
        ensure_valid(validate_category(ledger, c))?;
        patch.category = Some(c.trim().to_string());
    }
    if let Some(a) = arg(sub, "amount") {
        ensure_valid(validate_amount(a))?;
        patch.amount = Some(parse_decimal(a)?);
    }
    if let Some(k) = arg(sub, "type") {
        ensure_valid(validate_kind(k))?;
        patch.kind = Some(k.parse()?);
    }
    if patch.is_empty() {
        bail!("Nothing to update; pass at least one field");
    }
    TransactionStore::new(conn, ledger).update(id, &patch)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ledger_arg(sub)?;
    let id = *sub
        .get_one::<i64>("ID")
        .ok_or_else(|| anyhow::anyhow!("Transaction id is required"))?;
    if !TransactionStore::new(conn, ledger).delete(id)? {
        bail!("Transaction {} not found in {} ledger", id, ledger);
    }
    println!("Deleted transaction {}", id);
    Ok(())
}

#[derive(Serialize)]
struct CategoryRow {
    category: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    kind: Option<TransactionKind>,
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ledger = ledger_arg(sub)?;
    let rows: Vec<CategoryRow> = if sub.get_flag("used") {
        TransactionStore::new(conn, ledger)
            .unique_categories()?
            .into_iter()
            .map(|category| CategoryRow {
                category,
                kind: None,
            })
            .collect()
    } else {
        let income = ledger.income_categories().iter().map(|c| CategoryRow {
            category: c.to_string(),
            kind: Some(TransactionKind::Income),
        });
        let expense = ledger.expense_categories().iter().map(|c| CategoryRow {
            category: c.to_string(),
            kind: Some(TransactionKind::Expense),
        });
        income.chain(expense).collect()
    };
    if !maybe_print_json(sub.get_flag("json"), false, &rows)? {
        let table_rows = rows
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.kind.map(|k| k.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Type"], table_rows));
    }
    Ok(())
}
