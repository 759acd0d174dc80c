// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use super::{decimal_at, logged};
use crate::dates::parse_month_key;
use crate::format::round_money;
use crate::models::{Ledger, OpeningBalance};

fn from_row(r: &Row<'_>) -> rusqlite::Result<OpeningBalance> {
    Ok(OpeningBalance {
        id: Some(r.get(0)?),
        month: r.get(1)?,
        balance: decimal_at(r, 2)?,
        note: r.get(3)?,
        created_at: Some(r.get(4)?),
        updated_at: Some(r.get(5)?),
    })
}

/// Opening balances of one ledger, at most one per month.
pub struct OpeningBalanceStore<'a> {
    conn: &'a Connection,
    ledger: Ledger,
}

impl<'a> OpeningBalanceStore<'a> {
    pub fn new(conn: &'a Connection, ledger: Ledger) -> Self {
        Self { conn, ledger }
    }

    pub fn ledger(&self) -> Ledger {
        self.ledger
    }

    /// Creates or replaces the month's opening balance and returns the record id.
    ///
    /// A second call for the same month updates the existing row in place. `created_at`
    /// overrides the creation time on both paths; without it an update keeps the
    /// original creation time.
    pub fn set_for_month(
        &self,
        month: &str,
        balance: Decimal,
        note: Option<&str>,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<i64> {
        parse_month_key(month)?;
        let note = note.map(str::trim).filter(|n| !n.is_empty());
        let now = Utc::now();
        let id = logged(
            self.conn.query_row(
                "INSERT INTO opening_balances(ledger, month, balance, note, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, COALESCE(?5, ?6), ?6)
                 ON CONFLICT(ledger, month) DO UPDATE SET
                    balance=excluded.balance,
                    note=excluded.note,
                    created_at=COALESCE(?5, opening_balances.created_at),
                    updated_at=excluded.updated_at
                 RETURNING id",
                params![
                    self.ledger,
                    month,
                    round_money(balance).to_string(),
                    note,
                    created_at,
                    now
                ],
                |r| r.get::<_, i64>(0),
            ),
            "setting opening balance",
        )?;
        info!(
            "opening balance for {} ({} ledger) set to {}",
            month, self.ledger, balance
        );
        Ok(id)
    }

    pub fn get_for_month(&self, month: &str) -> Result<Option<OpeningBalance>> {
        logged(
            self.conn
                .query_row(
                    "SELECT id, month, balance, note, created_at, updated_at
                     FROM opening_balances WHERE ledger=?1 AND month=?2",
                    params![self.ledger, month],
                    from_row,
                )
                .optional(),
            "getting opening balance",
        )
    }

    /// All opening balances, most recent month first.
    pub fn get_all(&self) -> Result<Vec<OpeningBalance>> {
        let run = || -> rusqlite::Result<Vec<OpeningBalance>> {
            let mut stmt = self.conn.prepare(
                "SELECT id, month, balance, note, created_at, updated_at
                 FROM opening_balances WHERE ledger=?1 ORDER BY month DESC",
            )?;
            let rows = stmt.query_map(params![self.ledger], from_row)?;
            rows.collect()
        };
        logged(run(), "getting opening balances")
    }

    pub fn delete_for_month(&self, month: &str) -> Result<bool> {
        let changed = logged(
            self.conn.execute(
                "DELETE FROM opening_balances WHERE ledger=?1 AND month=?2",
                params![self.ledger, month],
            ),
            "deleting opening balance",
        )?;
        Ok(changed > 0)
    }

    /// The month's opening amount, zero when none is recorded.
    pub fn opening_amount(&self, month: &str) -> Result<Decimal> {
        Ok(self
            .get_for_month(month)?
            .map(|b| b.balance)
            .unwrap_or(Decimal::ZERO))
    }
}
