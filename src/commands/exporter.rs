// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;

use crate::store::TransactionStore;
use crate::utils::ledger_arg;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".into());
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let Some(out) = sub.get_one::<String>("out") else {
        bail!("--out is required");
    };
    let ledger = ledger_arg(sub)?;

    // oldest first, the order a ledger is read in
    let mut rows = TransactionStore::new(conn, ledger).get_all()?;
    rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["id", "date", "description", "category", "type", "amount"])?;
        for t in &rows {
            wtr.write_record([
                t.id.map(|i| i.to_string()).unwrap_or_default(),
                t.date.to_string(),
                t.description.clone(),
                t.category.clone(),
                t.kind.to_string(),
                format!("{:.2}", t.amount),
            ])?;
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
    }
    println!(
        "Exported {} {} transactions to {}",
        rows.len(),
        ledger,
        out
    );
    Ok(())
}
