// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed persistence for transactions, opening balances and notes.
//!
//! Transactions and opening balances are scoped to a [`Ledger`](crate::models::Ledger);
//! one store type serves both ledgers.

pub mod balances;
pub mod notes;
pub mod transactions;

pub use balances::OpeningBalanceStore;
pub use notes::{NoteSortField, NoteStore, SubscriptionId, search_notes, sort_notes};
pub use transactions::TransactionStore;

use log::error;
use rusqlite::Row;
use rusqlite::types::Type;
use rust_decimal::Decimal;

/// Reads a decimal stored as TEXT.
pub(crate) fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Logs a failed store call and attaches a readable message for the caller.
pub(crate) fn logged<T>(res: rusqlite::Result<T>, action: &str) -> anyhow::Result<T> {
    res.map_err(|e| {
        error!("Error {action}: {e}");
        anyhow::Error::new(e).context(format!("Error {action}"))
    })
}
