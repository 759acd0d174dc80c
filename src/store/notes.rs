// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};
use chrono::Utc;
use log::{debug, warn};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::logged;
use crate::calc::SortOrder;
use crate::error::ParseError;
use crate::models::{Note, NoteDraft, NoteUpdate};

fn from_row(r: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: r.get(0)?,
        title: r.get(1)?,
        content: r.get(2)?,
        created_at: r.get(3)?,
        updated_at: r.get(4)?,
    })
}

/// Handle returned by [`NoteStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type OnChange = Box<dyn FnMut(&[Note])>;
type OnError = Box<dyn FnMut(&str)>;

struct Subscriber {
    id: SubscriptionId,
    on_change: OnChange,
    on_error: OnError,
}

/// Notes are shared across ledgers.
///
/// Subscribers receive the full list, most recently updated first, when they
/// subscribe and again after every change made through this store instance.
pub struct NoteStore<'a> {
    conn: &'a Connection,
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl<'a> NoteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn list(&self) -> Result<Vec<Note>> {
        let run = || -> rusqlite::Result<Vec<Note>> {
            let mut stmt = self.conn.prepare(
                "SELECT id, title, content, created_at, updated_at
                 FROM notes ORDER BY updated_at DESC, id DESC",
            )?;
            let rows = stmt.query_map([], from_row)?;
            rows.collect()
        };
        logged(run(), "fetching notes")
    }

    pub fn get(&self, id: i64) -> Result<Option<Note>> {
        logged(
            self.conn
                .query_row(
                    "SELECT id, title, content, created_at, updated_at FROM notes WHERE id=?1",
                    params![id],
                    from_row,
                )
                .optional(),
            "getting note",
        )
    }

    pub fn create(&mut self, draft: &NoteDraft) -> Result<i64> {
        let title = draft.title.trim();
        if title.is_empty() {
            bail!("Note title is required");
        }
        let now = Utc::now();
        let created = draft.created_at.unwrap_or(now);
        let updated = draft.updated_at.unwrap_or(created);
        logged(
            self.conn.execute(
                "INSERT INTO notes(title, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![title, draft.content, created, updated],
            ),
            "creating note",
        )?;
        let id = self.conn.last_insert_rowid();
        debug!("created note {}", id);
        self.notify();
        Ok(id)
    }

    /// Changes the given fields and bumps `updated_at`.
    pub fn update(&mut self, id: i64, update: &NoteUpdate) -> Result<()> {
        if update.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            bail!("Note title is required");
        }
        let changed = logged(
            self.conn.execute(
                "UPDATE notes SET
                    title=COALESCE(?1, title),
                    content=COALESCE(?2, content),
                    updated_at=?3
                 WHERE id=?4",
                params![
                    update.title.as_deref().map(str::trim),
                    update.content,
                    Utc::now(),
                    id
                ],
            ),
            "updating note",
        )?;
        if changed == 0 {
            bail!("Note {} not found", id);
        }
        self.notify();
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let changed = logged(
            self.conn
                .execute("DELETE FROM notes WHERE id=?1", params![id]),
            "deleting note",
        )?;
        if changed > 0 {
            self.notify();
        }
        Ok(changed > 0)
    }

    /// Registers a listener and immediately pushes the current list to it.
    ///
    /// Only writes made through this `NoteStore` trigger a push. Changes made through
    /// another store or connection on the same database are seen on the next push.
    pub fn subscribe(
        &mut self,
        on_change: impl FnMut(&[Note]) + 'static,
        on_error: impl FnMut(&str) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let mut sub = Subscriber {
            id,
            on_change: Box::new(on_change),
            on_error: Box::new(on_error),
        };
        match self.list() {
            Ok(notes) => (sub.on_change)(&notes),
            Err(e) => (sub.on_error)(&format!("Failed to load notes: {e:#}")),
        }
        self.subscribers.push(sub);
        id
    }

    /// Returns false when the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        match self.list() {
            Ok(notes) => {
                for s in &mut self.subscribers {
                    (s.on_change)(&notes);
                }
            }
            Err(e) => {
                warn!("note refresh failed: {e:#}");
                let msg = format!("Failed to load notes: {e:#}");
                for s in &mut self.subscribers {
                    (s.on_error)(&msg);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteSortField {
    Title,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl FromStr for NoteSortField {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(NoteSortField::Title),
            "created" | "created_at" | "createdat" => Ok(NoteSortField::CreatedAt),
            "updated" | "updated_at" | "updatedat" => Ok(NoteSortField::UpdatedAt),
            other => Err(ParseError::NoteSortField(other.to_string())),
        }
    }
}

impl fmt::Display for NoteSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NoteSortField::Title => "title",
            NoteSortField::CreatedAt => "created",
            NoteSortField::UpdatedAt => "updated",
        })
    }
}

/// Notes whose title or content contains `term`, ignoring case.
pub fn search_notes(notes: &[Note], term: &str) -> Vec<Note> {
    let term = term.to_lowercase();
    notes
        .iter()
        .filter(|n| n.title.to_lowercase().contains(&term) || n.content.to_lowercase().contains(&term))
        .cloned()
        .collect()
}

pub fn sort_notes(notes: &[Note], field: NoteSortField, order: SortOrder) -> Vec<Note> {
    let mut sorted = notes.to_vec();
    sorted.sort_by(|a, b| {
        let ord = match field {
            NoteSortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            NoteSortField::CreatedAt => a.created_at.cmp(&b.created_at),
            NoteSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        };
        order.apply(ord)
    });
    sorted
}
