// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{TimeZone, Utc};
use congregation_accounts::calc::SortOrder;
use congregation_accounts::cli;
use congregation_accounts::commands::notes::query_notes;
use congregation_accounts::db::init_schema;
use congregation_accounts::models::{NoteDraft, NoteUpdate};
use congregation_accounts::store::{NoteSortField, NoteStore, search_notes, sort_notes};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    conn
}

fn dated(title: &str, content: &str, day: u32) -> NoteDraft {
    let ts = Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap();
    NoteDraft {
        title: title.into(),
        content: content.into(),
        created_at: Some(ts),
        updated_at: Some(ts),
    }
}

#[test]
fn list_is_most_recently_updated_first() {
    let conn = setup();
    let mut store = NoteStore::new(&conn);
    store.create(&dated("Budget", "Plan for February", 3)).unwrap();
    store.create(&dated("Audit", "Receipts verified", 10)).unwrap();
    store.create(&dated("Visit", "CO visit in March", 5)).unwrap();

    let titles: Vec<String> = store.list().unwrap().into_iter().map(|n| n.title).collect();
    assert_eq!(titles, vec!["Audit", "Visit", "Budget"]);
}

#[test]
fn update_moves_note_to_the_top() {
    let conn = setup();
    let mut store = NoteStore::new(&conn);
    let old = store.create(&dated("Budget", "Plan", 3)).unwrap();
    store.create(&dated("Audit", "Receipts", 10)).unwrap();

    store
        .update(old, &NoteUpdate { content: Some("Plan for March".into()), title: None })
        .unwrap();
    let notes = store.list().unwrap();
    assert_eq!(notes[0].id, old);
    assert_eq!(notes[0].title, "Budget");
    assert_eq!(notes[0].content, "Plan for March");
    assert!(notes[0].updated_at > notes[0].created_at);

    assert!(store.update(old + 50, &NoteUpdate::default()).is_err());
    assert!(store.create(&NoteDraft::new("  ", "empty title")).is_err());
}

#[test]
fn subscribers_get_the_list_now_and_after_each_change() {
    let conn = setup();
    let mut store = NoteStore::new(&conn);
    store.create(&dated("Existing", "Already here", 1)).unwrap();

    let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let errors: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_cb = Rc::clone(&seen);
    let errors_cb = Rc::clone(&errors);
    let sub = store.subscribe(
        move |notes| seen_cb.borrow_mut().push(notes.len()),
        move |msg| errors_cb.borrow_mut().push(msg.to_string()),
    );
    assert_eq!(*seen.borrow(), vec![1]);

    let id = store.create(&NoteDraft::new("New", "Fresh note")).unwrap();
    store
        .update(id, &NoteUpdate { title: Some("Renamed".into()), content: None })
        .unwrap();
    assert!(store.delete(id).unwrap());
    assert_eq!(*seen.borrow(), vec![1, 2, 2, 1]);

    assert!(store.unsubscribe(sub));
    assert!(!store.unsubscribe(sub));
    store.create(&NoteDraft::new("Quiet", "nobody listens")).unwrap();
    assert_eq!(seen.borrow().len(), 4);
    assert!(errors.borrow().is_empty());
}

#[test]
fn refresh_failures_reach_the_error_callback() {
    let conn = setup();
    let mut store = NoteStore::new(&conn);
    let errors: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let errors_cb = Rc::clone(&errors);
    store.subscribe(|_| {}, move |msg| errors_cb.borrow_mut().push(msg.to_string()));

    store.create(&NoteDraft::new("Bad row", "next")).unwrap();
    conn.execute("UPDATE notes SET created_at='not a time'", []).unwrap();
    store.create(&NoteDraft::new("Trigger", "refresh")).unwrap();

    let errors = errors.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Failed to load notes"));
}

#[test]
fn search_and_sort_helpers() {
    let conn = setup();
    let mut store = NoteStore::new(&conn);
    store.create(&dated("Monthly Accounts Review", "Receipts verified", 3)).unwrap();
    store.create(&dated("upcoming expenses", "Electricity and internet", 5)).unwrap();
    store.create(&dated("Circuit Overseer Visit", "Accommodation", 4)).unwrap();
    let notes = store.list().unwrap();

    let hits = search_notes(&notes, "ELECTRICITY");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "upcoming expenses");
    assert_eq!(search_notes(&notes, "review").len(), 1);
    assert_eq!(search_notes(&notes, "").len(), 3);

    let by_title: Vec<String> = sort_notes(&notes, NoteSortField::Title, SortOrder::Asc)
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(
        by_title,
        vec!["Circuit Overseer Visit", "Monthly Accounts Review", "upcoming expenses"]
    );

    let by_created: Vec<String> = sort_notes(&notes, NoteSortField::CreatedAt, SortOrder::Desc)
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(by_created[0], "upcoming expenses");

    assert_eq!("created".parse::<NoteSortField>().unwrap(), NoteSortField::CreatedAt);
    assert!("colour".parse::<NoteSortField>().is_err());
}

#[test]
fn note_list_cli_filters_and_sorts() {
    let conn = setup();
    let mut store = NoteStore::new(&conn);
    store.create(&dated("Budget", "Plan for February", 3)).unwrap();
    store.create(&dated("Audit", "Receipts for February", 10)).unwrap();
    store.create(&dated("Visit", "CO visit in March", 5)).unwrap();

    let matches = cli::build_cli().get_matches_from([
        "congregation-accounts",
        "note",
        "list",
        "--search",
        "february",
        "--sort",
        "title",
        "--order",
        "asc",
    ]);
    let Some(("note", note_m)) = matches.subcommand() else {
        panic!("no note subcommand");
    };
    let Some(("list", list_m)) = note_m.subcommand() else {
        panic!("no list subcommand");
    };
    let titles: Vec<String> = query_notes(&store, list_m)
        .unwrap()
        .into_iter()
        .map(|n| n.title)
        .collect();
    assert_eq!(titles, vec!["Audit", "Budget"]);
}

#[test]
fn pushes_come_only_from_the_subscribed_store() {
    let conn = setup();
    let mut watched = NoteStore::new(&conn);
    let mut other = NoteStore::new(&conn);

    let seen: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let seen_cb = Rc::clone(&seen);
    watched.subscribe(move |notes| seen_cb.borrow_mut().push(notes.len()), |_| {});
    assert_eq!(*seen.borrow(), vec![0]);

    other.create(&NoteDraft::new("Elsewhere", "written by another store")).unwrap();
    assert_eq!(*seen.borrow(), vec![0]);

    watched.create(&NoteDraft::new("Here", "picks up both")).unwrap();
    assert_eq!(*seen.borrow(), vec![0, 2]);
}
