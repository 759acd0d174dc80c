// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow, bail};
use rusqlite::Connection;

use crate::calc::SortOrder;
use crate::models::{Note, NoteDraft, NoteUpdate};
use crate::store::{NoteSortField, NoteStore, search_notes, sort_notes};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let mut store = NoteStore::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let title = sub.get_one::<String>("title").cloned().unwrap_or_default();
            let content = sub.get_one::<String>("content").cloned().unwrap_or_default();
            let id = store.create(&NoteDraft::new(title, content))?;
            println!("Created note {}", id);
        }
        Some(("update", sub)) => {
            let id = note_id(sub)?;
            let update = NoteUpdate {
                title: sub.get_one::<String>("title").cloned(),
                content: sub.get_one::<String>("content").cloned(),
            };
            if update.title.is_none() && update.content.is_none() {
                bail!("Nothing to update; pass --title or --content");
            }
            store.update(id, &update)?;
            println!("Updated note {}", id);
        }
        Some(("rm", sub)) => {
            let id = note_id(sub)?;
            if !store.delete(id)? {
                bail!("Note {} not found", id);
            }
            println!("Deleted note {}", id);
        }
        Some(("list", sub)) => list(&store, sub)?,
        _ => {}
    }
    Ok(())
}

fn note_id(sub: &clap::ArgMatches) -> Result<i64> {
    sub.get_one::<i64>("ID")
        .copied()
        .ok_or_else(|| anyhow!("Note id is required"))
}

/// Notes matching the `note list` search, in the requested order.
pub fn query_notes(store: &NoteStore<'_>, sub: &clap::ArgMatches) -> Result<Vec<Note>> {
    let mut notes = store.list()?;
    if let Some(term) = sub.get_one::<String>("search") {
        notes = search_notes(&notes, term);
    }
    let field: NoteSortField = sub
        .get_one::<String>("sort")
        .map(String::as_str)
        .unwrap_or("updated")
        .parse()?;
    let order: SortOrder = sub
        .get_one::<String>("order")
        .map(String::as_str)
        .unwrap_or("desc")
        .parse()?;
    Ok(sort_notes(&notes, field, order))
}

fn list(store: &NoteStore<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let notes = query_notes(store, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &notes)? {
        let rows = notes
            .iter()
            .map(|n| {
                vec![
                    n.id.to_string(),
                    n.title.clone(),
                    n.content.clone(),
                    n.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Title", "Content", "Updated"], rows)
        );
    }
    Ok(())
}
