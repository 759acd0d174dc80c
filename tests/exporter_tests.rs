// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use congregation_accounts::commands::seed;
use congregation_accounts::db::init_schema;
use congregation_accounts::models::Ledger;
use congregation_accounts::{cli, commands::exporter};
use rusqlite::Connection;
use serde_json::Value;
use tempfile::tempdir;

fn seeded() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    init_schema(&conn).unwrap();
    seed::seed(&conn, Ledger::Default).unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["congregation-accounts", "export"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    exporter::handle(conn, export_m)
}

#[test]
fn export_transactions_writes_pretty_json_oldest_first() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.json");
    let out_str = out.to_string_lossy().to_string();

    run_export(&conn, &["transactions", "--format", "json", "--out", &out_str]).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains('\n'));
    let rows: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["date"], "2024-01-15");
    assert_eq!(rows[0]["category"], "Worldwide Work Donations");
    assert_eq!(rows[3]["date"], "2024-01-25");
    assert_eq!(rows[3]["type"], "expense");
}

#[test]
fn export_transactions_writes_csv() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.csv");
    let out_str = out.to_string_lossy().to_string();

    run_export(&conn, &["transactions", "--out", &out_str]).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "date", "description", "category", "type", "amount"]
    );
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 4);
    assert_eq!(&records[2][4], "expense");
    assert_eq!(&records[2][5], "150.00");
}

#[test]
fn export_other_ledger_is_empty() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("khoc.json");
    let out_str = out.to_string_lossy().to_string();

    run_export(
        &conn,
        &["transactions", "--ledger", "khoc", "--format", "json", "--out", &out_str],
    )
    .unwrap();
    let rows: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert!(rows.is_empty());
}

#[test]
fn unknown_format_creates_no_file() {
    let conn = seeded();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.xml");
    let out_str = out.to_string_lossy().to_string();

    let err = run_export(&conn, &["transactions", "--format", "xml", "--out", &out_str]).unwrap_err();
    assert!(err.to_string().contains("Unknown format"));
    assert!(!out.exists());
}
