// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sample data for trying the tool out: January 2024 with a few transactions.

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, TimeZone, Utc};
use log::info;
use rusqlite::Connection;
use rust_decimal::Decimal;

use crate::models::{Ledger, NoteDraft, Transaction, TransactionKind};
use crate::store::{NoteStore, OpeningBalanceStore, TransactionStore};
use crate::utils::ledger_arg;

pub const SAMPLE_MONTH: &str = "2024-01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedCounts {
    pub transactions: usize,
    pub notes: usize,
    pub opening_balances: usize,
}

fn day(d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, d).ok_or_else(|| anyhow!("invalid sample day {}", d))
}

fn sample_transactions() -> Result<Vec<Transaction>> {
    use TransactionKind::{Expense, Income};
    let rows = [
        (15, "Contributions to Worldwide Work", "Worldwide Work Donations", 50000, Income),
        (
            15,
            "Contributions - Local Congregation Expenses",
            "Local Congregation Donations",
            30000,
            Income,
        ),
        (20, "Electricity Bill", "Local Congregation Expenses", 15000, Expense),
        (25, "Internet Service", "Local Congregation Expenses", 5000, Expense),
    ];
    rows.into_iter()
        .map(|(d, desc, cat, cents, kind)| {
            Ok(Transaction::new(day(d)?, desc, cat, Decimal::new(cents, 2), kind))
        })
        .collect()
}

fn sample_notes() -> Vec<NoteDraft> {
    vec![
        NoteDraft::new(
            "Monthly Accounts Review",
            "Review completed for January 2024. All receipts have been verified and filed. \
             Total donations: ₱800. Total expenses: ₱200. Net balance: ₱600.",
        ),
        NoteDraft::new(
            "Upcoming Expenses",
            "Expected expenses for next month:\n- Electricity: ₱150\n- Internet: ₱50\n\
             - Office Supplies: ₱30\n- Cleaning Supplies: ₱20\nTotal Expected: ₱250",
        ),
        NoteDraft::new(
            "Circuit Overseer Visit",
            "CO visit scheduled for March 2024. Need to prepare:\n- Accommodation arrangements\n\
             - Transportation budget\n- Meal arrangements\nEstimated budget needed: ₱2000",
        ),
    ]
}

/// Loads the sample month into `ledger`. Running it twice duplicates the transactions and notes.
pub fn seed(conn: &Connection, ledger: Ledger) -> Result<SeedCounts> {
    let tx_store = TransactionStore::new(conn, ledger);
    let txs = sample_transactions()?;
    for t in &txs {
        tx_store.add(t)?;
    }

    let mut notes = NoteStore::new(conn);
    let drafts = sample_notes();
    for n in &drafts {
        notes.create(n)?;
    }

    let created = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| anyhow!("invalid sample timestamp"))?;
    OpeningBalanceStore::new(conn, ledger).set_for_month(
        SAMPLE_MONTH,
        Decimal::new(500000, 2),
        Some("Starting balance for January 2024"),
        Some(created),
    )?;

    info!("seeded {} ledger with sample data", ledger);
    Ok(SeedCounts {
        transactions: txs.len(),
        notes: drafts.len(),
        opening_balances: 1,
    })
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let ledger = ledger_arg(m)?;
    let counts = seed(conn, ledger)?;
    println!(
        "Seeded {} ledger: {} transactions, {} notes, {} opening balance for {}",
        ledger, counts.transactions, counts.notes, counts.opening_balances, SAMPLE_MONTH
    );
    Ok(())
}
