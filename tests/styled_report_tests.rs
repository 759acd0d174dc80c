// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use congregation_accounts::error::ReportError;
use congregation_accounts::format::format_date;
use congregation_accounts::models::{OpeningBalance, Transaction, TransactionKind};
use congregation_accounts::report::pdf::{text_width, wrap_text};
use congregation_accounts::report::{
    MonthlyReportData, ReportRenderer, StyledReport, report_filename, save_report,
};
use lopdf::Document;
use lopdf::content::{Content, Operation};
use rust_decimal::Decimal;

fn january(count: usize) -> MonthlyReportData {
    let transactions = (0..count)
        .map(|i| {
            let day = NaiveDate::from_ymd_opt(2024, 1, (i % 28) as u32 + 1).unwrap();
            if i % 3 == 0 {
                Transaction::new(
                    day,
                    "Electricity Bill",
                    "Local Congregation Expenses",
                    Decimal::new(15000, 2),
                    TransactionKind::Expense,
                )
            } else {
                Transaction::new(
                    day,
                    "Contributions to Worldwide Work",
                    "Worldwide Work Donations",
                    Decimal::new(50000, 2),
                    TransactionKind::Income,
                )
            }
        })
        .collect();
    MonthlyReportData {
        month: "2024-01".into(),
        transactions,
        opening_balance: Some(OpeningBalance::new("2024-01", Decimal::new(500000, 2))),
        congregation_name: Some("Riverside Congregation".into()),
        report_date: Some("Feb 1, 2024".into()),
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}

#[test]
fn renders_a_single_page_pdf_for_a_small_month() {
    let bytes = StyledReport.render(&january(4)).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
    assert!(contains(&bytes, "Riverside Congregation"));
    assert!(contains(&bytes, "Generated on: Feb 1, 2024"));
    assert!(contains(&bytes, "Page 1 of 1"));
    assert!(contains(&bytes, "Total Transactions: 4"));
}

#[test]
fn long_months_spill_onto_more_pages_with_numbered_footers() {
    let bytes = StyledReport.render(&january(120)).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages().len();
    assert!(pages > 1, "expected several pages, got {pages}");
    assert!(contains(&bytes, &format!("Page {pages} of {pages}")));
    assert!(contains(&bytes, "Generated by Congregation Accounts System"));
}

#[test]
fn empty_month_says_so() {
    let data = MonthlyReportData {
        month: "2024-05".into(),
        ..Default::default()
    };
    let bytes = StyledReport.render(&data).unwrap();
    assert!(contains(&bytes, "No transactions found for this month."));
    assert!(contains(&bytes, "Congregation Accounts"));
    assert!(!contains(&bytes, "Total Transactions"));
}

#[test]
fn invalid_month_is_rejected() {
    let data = MonthlyReportData {
        month: "January".into(),
        ..Default::default()
    };
    assert!(matches!(
        StyledReport.render(&data),
        Err(ReportError::InvalidMonth(_))
    ));
}

#[test]
fn wrapped_lines_fit_the_column() {
    let text = "Purchase of cleaning supplies, light bulbs and a replacement \
                microphone cable for the main hall sound system";
    let lines = wrap_text(text, 60.0, 9.0);
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(text_width(line, 9.0, false) <= 60.0, "too wide: {line}");
    }
    assert_eq!(lines.join(" "), text);

    let word = "Supercalifragilisticexpialidocious-and-then-some-more";
    let cut = wrap_text(word, 20.0, 9.0);
    assert_eq!(cut.len(), 1);
    assert!(cut[0].ends_with("..."));
    assert!(text_width(&cut[0], 9.0, false) <= 20.0);
}

#[test]
fn save_report_writes_the_month_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports");
    let path = save_report(&StyledReport, &january(3), &out).unwrap();
    assert_eq!(path, out.join("monthly-report-2024-01.pdf"));
    assert_eq!(report_filename("2024-01"), "monthly-report-2024-01.pdf");
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn failed_render_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("reports");
    let data = MonthlyReportData {
        month: "2024-1".into(),
        ..Default::default()
    };
    assert!(save_report(&StyledReport, &data, &out).is_err());
    assert!(!out.exists());
}

/// Content-stream operations of every page, in page order.
fn page_ops(bytes: &[u8]) -> Vec<Vec<Operation>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|id| {
            let raw = doc.get_page_content(*id).unwrap();
            Content::decode(&raw).unwrap().operations
        })
        .collect()
}

fn shown_text(op: &Operation) -> Option<String> {
    if op.operator != "Tj" {
        return None;
    }
    let bytes = op.operands.first()?.as_str().ok()?;
    Some(String::from_utf8_lossy(bytes).into_owned())
}

fn floats(op: &Operation) -> Vec<f32> {
    op.operands.iter().map(|o| o.as_float().unwrap()).collect()
}

fn is_rgb(values: &[f32], rgb: (u8, u8, u8)) -> bool {
    let want = [rgb.0, rgb.1, rgb.2].map(|c| f32::from(c) / 255.0);
    values.len() == 3 && values.iter().zip(want).all(|(a, b)| (a - b).abs() < 0.01)
}

fn day_tx(day: u32, desc: &str, cents: i64, kind: TransactionKind) -> Transaction {
    let category = match kind {
        TransactionKind::Income => "Worldwide Work Donations",
        TransactionKind::Expense => "Local Congregation Expenses",
    };
    Transaction::new(
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        desc,
        category,
        Decimal::new(cents, 2),
        kind,
    )
}

fn month_of(transactions: Vec<Transaction>, opening_cents: i64) -> MonthlyReportData {
    MonthlyReportData {
        month: "2024-01".into(),
        transactions,
        opening_balance: Some(OpeningBalance::new("2024-01", Decimal::new(opening_cents, 2))),
        congregation_name: None,
        report_date: Some("Feb 1, 2024".into()),
    }
}

#[test]
fn table_rows_run_oldest_first_and_keep_same_day_order() {
    let txs = vec![
        day_tx(9, "Ninth", 1000, TransactionKind::Income),
        day_tx(1, "First", 1000, TransactionKind::Income),
        day_tx(5, "Fifth A", 1000, TransactionKind::Expense),
        day_tx(2, "Second", 1000, TransactionKind::Income),
        day_tx(5, "Fifth B", 1000, TransactionKind::Income),
    ];
    let bytes = StyledReport.render(&month_of(txs, 0)).unwrap();
    let texts: Vec<String> = page_ops(&bytes).iter().flatten().filter_map(shown_text).collect();

    let dates: Vec<String> = texts.iter().filter(|t| t.starts_with("Jan ")).cloned().collect();
    let expected: Vec<String> = [1, 2, 5, 5, 9]
        .into_iter()
        .map(|d| format_date(NaiveDate::from_ymd_opt(2024, 1, d).unwrap()))
        .collect();
    assert_eq!(dates, expected);

    let descriptions: Vec<&String> = texts
        .iter()
        .filter(|t| ["First", "Second", "Fifth A", "Fifth B", "Ninth"].contains(&t.as_str()))
        .collect();
    assert_eq!(descriptions, vec!["First", "Second", "Fifth A", "Fifth B", "Ninth"]);
}

#[test]
fn a_light_rule_follows_every_fifth_row() {
    let separators = |rows: u32| {
        let txs = (1..=rows)
            .map(|d| day_tx(d, "Contributions", 1000, TransactionKind::Income))
            .collect();
        let bytes = StyledReport.render(&month_of(txs, 0)).unwrap();
        page_ops(&bytes)
            .iter()
            .flatten()
            .filter(|op| op.operator == "RG" && is_rgb(&floats(op), (230, 230, 230)))
            .count()
    };
    assert_eq!(separators(10), 2);
    assert_eq!(separators(9), 1);
    assert_eq!(separators(4), 0);
}

/// The fill colour and font of the last text op that shows `label`.
fn style_of(ops: &[Operation], label: &str) -> (Vec<f32>, String) {
    let at = ops
        .iter()
        .rposition(|op| shown_text(op).as_deref() == Some(label))
        .unwrap_or_else(|| panic!("{label} not drawn"));
    let colour = ops[..at]
        .iter()
        .rev()
        .find(|op| op.operator == "rg")
        .map(floats)
        .unwrap();
    let font = ops[..at]
        .iter()
        .rev()
        .find(|op| op.operator == "Tf")
        .and_then(|op| op.operands.first())
        .and_then(|o| o.as_name().ok())
        .map(|n| String::from_utf8_lossy(n).into_owned())
        .unwrap();
    (colour, font)
}

#[test]
fn ending_balance_is_bold_green_or_red_by_sign() {
    let positive = month_of(vec![day_tx(3, "Contributions", 50000, TransactionKind::Income)], 500000);
    let bytes = StyledReport.render(&positive).unwrap();
    let (colour, font) = style_of(&page_ops(&bytes)[0], "PHP 5,500");
    assert!(is_rgb(&colour, (0x10, 0xB9, 0x81)), "{colour:?}");
    assert_eq!(font, "F2");

    let negative = month_of(vec![day_tx(3, "Electricity Bill", 60000, TransactionKind::Expense)], 10000);
    let bytes = StyledReport.render(&negative).unwrap();
    let (colour, font) = style_of(&page_ops(&bytes)[0], "-PHP 500");
    assert!(is_rgb(&colour, (0xEF, 0x44, 0x44)), "{colour:?}");
    assert_eq!(font, "F2");

    let zero = month_of(vec![day_tx(3, "Electricity Bill", 10000, TransactionKind::Expense)], 10000);
    let bytes = StyledReport.render(&zero).unwrap();
    let (colour, _) = style_of(&page_ops(&bytes)[0], "PHP 0");
    assert!(is_rgb(&colour, (0x10, 0xB9, 0x81)), "{colour:?}");
}

#[test]
fn counts_block_never_runs_into_the_footer() {
    // 40 mm footer zone on a 355.6 mm page, in points from the bottom edge
    let footer_top = 40.0 * 72.0 / 25.4;
    let mut moved_to_own_page = false;
    for rows in 40..=110usize {
        let txs = (0..rows)
            .map(|i| day_tx((i % 28) as u32 + 1, "Contributions", 1000, TransactionKind::Income))
            .collect();
        let bytes = StyledReport.render(&month_of(txs, 0)).unwrap();
        let pages = page_ops(&bytes);
        let (page, ops) = pages
            .iter()
            .enumerate()
            .find(|(_, ops)| ops.iter().any(|op| shown_text(op).is_some_and(|t| t.starts_with("Expense Transactions"))))
            .unwrap();
        let at = ops
            .iter()
            .position(|op| shown_text(op).is_some_and(|t| t.starts_with("Expense Transactions")))
            .unwrap();
        let td = ops[..at].iter().rev().find(|op| op.operator == "Td").unwrap();
        let baseline = floats(td)[1];
        assert!(baseline > footer_top, "{rows} rows: counts at {baseline}pt");

        let has_rows = ops
            .iter()
            .any(|op| shown_text(op).is_some_and(|t| t.starts_with("Jan ")));
        if page > 0 && !has_rows {
            moved_to_own_page = true;
        }
    }
    assert!(moved_to_own_page);
}
