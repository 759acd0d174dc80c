// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use log::{debug, info};
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;

use super::{decimal_at, logged};
use crate::dates::{month_end, month_start};
use crate::format::round_money;
use crate::models::{Ledger, Transaction, TransactionKind, TransactionPatch};
use crate::validation::{MAX_AMOUNT, MIN_AMOUNT};

const COLUMNS: &str = "id, date, description, category, amount, type, created_at, updated_at";

fn from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: Some(r.get(0)?),
        date: r.get(1)?,
        description: r.get(2)?,
        category: r.get(3)?,
        amount: decimal_at(r, 4)?,
        kind: r.get(5)?,
        created_at: Some(r.get(6)?),
        updated_at: Some(r.get(7)?),
    })
}

/// Stored amounts are whole cents in `[MIN_AMOUNT, MAX_AMOUNT]`, checked after rounding.
fn normalize_amount(amount: Decimal) -> Result<Decimal> {
    let rounded = round_money(amount);
    if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&rounded) {
        bail!(
            "Amount must be between {} and {}, got {}",
            MIN_AMOUNT,
            MAX_AMOUNT,
            amount
        );
    }
    Ok(rounded)
}

/// Transactions of one ledger.
pub struct TransactionStore<'a> {
    conn: &'a Connection,
    ledger: Ledger,
}

impl<'a> TransactionStore<'a> {
    pub fn new(conn: &'a Connection, ledger: Ledger) -> Self {
        Self { conn, ledger }
    }

    pub fn ledger(&self) -> Ledger {
        self.ledger
    }

    /// Saves a new transaction and returns its id. Any id or timestamps on `tx` are ignored.
    pub fn add(&self, tx: &Transaction) -> Result<i64> {
        let amount = normalize_amount(tx.amount)?;
        let now = Utc::now();
        logged(
            self.conn.execute(
                "INSERT INTO transactions(ledger, date, description, category, amount, type, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                params![
                    self.ledger,
                    tx.date,
                    tx.description.trim(),
                    tx.category,
                    amount.to_string(),
                    tx.kind,
                    now
                ],
            ),
            "adding transaction",
        )?;
        let id = self.conn.last_insert_rowid();
        info!("added {} transaction {} to {} ledger", tx.kind, id, self.ledger);
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Result<Option<Transaction>> {
        let sql = format!("SELECT {COLUMNS} FROM transactions WHERE ledger=?1 AND id=?2");
        logged(
            self.conn
                .query_row(&sql, params![self.ledger, id], from_row)
                .optional(),
            "getting transaction",
        )
    }

    /// Every transaction of the ledger, newest date first.
    pub fn get_all(&self) -> Result<Vec<Transaction>> {
        logged(self.select("", &[]), "getting transactions")
    }

    /// Transactions dated within `start..=end`, newest first.
    pub fn get_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Transaction>> {
        logged(
            self.select("AND date >= ?2 AND date <= ?3", &[&start, &end]),
            "getting transactions by date range",
        )
    }

    pub fn get_by_month(&self, month: &str) -> Result<Vec<Transaction>> {
        self.get_by_date_range(month_start(month)?, month_end(month)?)
    }

    pub fn get_by_type(&self, kind: TransactionKind) -> Result<Vec<Transaction>> {
        logged(
            self.select("AND type = ?2", &[&kind]),
            "getting transactions by type",
        )
    }

    pub fn get_by_category(&self, category: &str) -> Result<Vec<Transaction>> {
        logged(
            self.select("AND category = ?2", &[&category]),
            "getting transactions by category",
        )
    }

    /// Applies the non-empty fields of `patch` and bumps `updated_at`.
    pub fn update(&self, id: i64, patch: &TransactionPatch) -> Result<()> {
        let mut columns: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(date) = patch.date {
            columns.push("date");
            values.push(Box::new(date));
        }
        if let Some(description) = &patch.description {
            columns.push("description");
            values.push(Box::new(description.trim().to_string()));
        }
        if let Some(category) = &patch.category {
            columns.push("category");
            values.push(Box::new(category.clone()));
        }
        if let Some(amount) = patch.amount {
            columns.push("amount");
            values.push(Box::new(normalize_amount(amount)?.to_string()));
        }
        if let Some(kind) = patch.kind {
            columns.push("type");
            values.push(Box::new(kind));
        }
        columns.push("updated_at");
        values.push(Box::new(Utc::now()));

        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c}=?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let n = values.len();
        let sql = format!(
            "UPDATE transactions SET {assignments} WHERE id=?{} AND ledger=?{}",
            n + 1,
            n + 2
        );
        values.push(Box::new(id));
        values.push(Box::new(self.ledger));

        let changed = logged(
            self.conn.execute(&sql, params_from_iter(values.iter())),
            "updating transaction",
        )?;
        if changed == 0 {
            bail!("Transaction {} not found in {} ledger", id, self.ledger);
        }
        debug!("updated transaction {} ({} fields)", id, columns.len() - 1);
        Ok(())
    }

    /// Removes a transaction; returns false when nothing matched.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let changed = logged(
            self.conn.execute(
                "DELETE FROM transactions WHERE id=?1 AND ledger=?2",
                params![id, self.ledger],
            ),
            "deleting transaction",
        )?;
        Ok(changed > 0)
    }

    /// Distinct categories in use, sorted.
    pub fn unique_categories(&self) -> Result<Vec<String>> {
        let run = || -> rusqlite::Result<Vec<String>> {
            let mut stmt = self.conn.prepare(
                "SELECT DISTINCT category FROM transactions WHERE ledger=?1 AND category != '' ORDER BY category",
            )?;
            let rows = stmt.query_map(params![self.ledger], |r| r.get::<_, String>(0))?;
            rows.collect()
        };
        logged(run(), "getting unique categories")
    }

    fn select(&self, filter: &str, extra: &[&dyn ToSql]) -> rusqlite::Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM transactions WHERE ledger=?1 {filter} ORDER BY date DESC, id DESC"
        );
        let mut args: Vec<&dyn ToSql> = vec![&self.ledger];
        args.extend_from_slice(extra);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args.as_slice(), from_row)?;
        rows.collect()
    }
}
