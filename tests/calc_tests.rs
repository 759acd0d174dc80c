// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use congregation_accounts::calc::{
    SortField, SortOrder, available_months, ending_balance, format_report_text,
    group_by_category, monthly_data, monthly_report, most_recent_month, percentage_change,
    recent_transactions, should_suggest_next_month_balance, sort_transactions, summarize,
    transactions_for_month,
};
use congregation_accounts::models::{OpeningBalance, Transaction, TransactionKind};
use rust_decimal::Decimal;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn tx(date: &str, category: &str, amount: &str, kind: TransactionKind) -> Transaction {
    Transaction::new(
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        format!("{category} on {date}"),
        category,
        d(amount),
        kind,
    )
}

fn january() -> Vec<Transaction> {
    vec![
        tx("2024-01-15", "Worldwide Work Donations", "500", TransactionKind::Income),
        tx("2024-01-15", "Local Congregation Donations", "300", TransactionKind::Income),
        tx("2024-01-20", "Local Congregation Expenses", "150", TransactionKind::Expense),
        tx("2024-01-25", "Local Congregation Expenses", "50", TransactionKind::Expense),
    ]
}

#[test]
fn summarize_empty_is_all_zero() {
    let s = summarize(&[]);
    assert_eq!(s.total_income, Decimal::ZERO);
    assert_eq!(s.total_expenses, Decimal::ZERO);
    assert_eq!(s.net, Decimal::ZERO);
    assert_eq!(s.count, 0);
}

#[test]
fn net_is_income_minus_expenses() {
    let lists = vec![
        january(),
        vec![tx("2024-02-01", "Other Income", "0.01", TransactionKind::Income)],
        vec![tx("2024-02-01", "Other Expenses", "999999.99", TransactionKind::Expense)],
    ];
    for ts in lists {
        let s = summarize(&ts);
        assert_eq!(s.net, s.total_income - s.total_expenses);
        assert_eq!(s.count, ts.len());
    }
}

#[test]
fn january_scenario_ends_at_5600() {
    let ts = january();
    let s = summarize(&ts);
    assert_eq!(s.total_income, d("800"));
    assert_eq!(s.total_expenses, d("200"));
    assert_eq!(s.net, d("600"));
    assert_eq!(s.count, 4);
    assert_eq!(ending_balance(d("5000.00"), &ts), d("5600.00"));
}

#[test]
fn ending_balance_moves_with_income_and_expense_amounts() {
    let base = january();
    let before = ending_balance(d("5000"), &base);

    let mut more_income = base.clone();
    more_income[0].amount += d("10");
    assert!(ending_balance(d("5000"), &more_income) > before);

    let mut more_expense = base.clone();
    more_expense[2].amount += d("10");
    assert!(ending_balance(d("5000"), &more_expense) < before);
}

#[test]
fn month_filter_is_idempotent() {
    let mut ts = january();
    ts.push(tx("2024-02-01", "Other Income", "20", TransactionKind::Income));
    let once = transactions_for_month(&ts, "2024-01");
    let twice = transactions_for_month(&once, "2024-01");
    assert_eq!(once.len(), 4);
    assert_eq!(once, twice);
}

#[test]
fn available_months_merges_and_orders_newest_first() {
    let ts = vec![
        tx("2024-01-15", "Other Income", "1", TransactionKind::Income),
        tx("2024-02-01", "Other Income", "1", TransactionKind::Income),
    ];
    let balances = vec![
        OpeningBalance::new("2024-01", d("5000")),
        OpeningBalance::new("2024-03", d("100")),
    ];
    assert_eq!(
        available_months(&ts, &balances),
        vec!["2024-03", "2024-02", "2024-01"]
    );
    assert_eq!(most_recent_month(&ts, &balances).as_deref(), Some("2024-03"));
    assert_eq!(most_recent_month(&[], &[]), None);
}

#[test]
fn group_by_category_keeps_first_seen_order() {
    let ts = january();
    let groups = group_by_category(&ts);
    let names: Vec<&str> = groups.iter().map(|(c, _)| c.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Worldwide Work Donations",
            "Local Congregation Donations",
            "Local Congregation Expenses"
        ]
    );
    let expenses = &groups[2].1;
    assert_eq!(expenses[0].amount, d("150"));
    assert_eq!(expenses[1].amount, d("50"));
}

#[test]
fn monthly_data_and_report_agree() {
    let mut ts = january();
    ts.push(tx("2024-02-03", "Other Income", "70", TransactionKind::Income));
    let balances = vec![OpeningBalance::new("2024-01", d("5000"))];

    let data = monthly_data("2024-01", &ts, &balances);
    assert_eq!(data.transactions.len(), 4);
    assert_eq!(data.ending_balance, d("5600"));
    assert_eq!(data.opening_balance.as_ref().map(|b| b.balance), Some(d("5000")));

    let report = monthly_report("2024-01", &data.transactions, balances.first()).unwrap();
    assert_eq!(report.month_name, "January 2024");
    assert_eq!(report.ending_balance, d("5600"));
    assert_eq!(report.income_transaction_count, 2);
    assert_eq!(report.expense_transaction_count, 2);

    let text = format_report_text(&report);
    assert!(text.starts_with("MONTHLY REPORT - January 2024"));
    assert!(text.contains("Starting Balance: ₱5,000.00"));
    assert!(text.contains("₱5,000.00 + ₱800.00 - ₱200.00 = ₱5,600.00"));
}

#[test]
fn missing_opening_balance_counts_as_zero() {
    let data = monthly_data("2024-01", &january(), &[]);
    assert!(data.opening_balance.is_none());
    assert_eq!(data.ending_balance, d("600"));
}

#[test]
fn percentage_change_handles_zero_baseline() {
    assert_eq!(percentage_change(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    assert_eq!(percentage_change(Decimal::ZERO, d("5")), d("100"));
    assert_eq!(percentage_change(d("200"), d("250")), d("25"));
    assert_eq!(percentage_change(d("200"), d("100")), d("-50"));
}

#[test]
fn recent_transactions_are_newest_first_and_limited() {
    let recent = recent_transactions(&january(), 2);
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].date.to_string(), "2024-01-25");
    assert_eq!(recent[1].date.to_string(), "2024-01-20");
}

#[test]
fn suggests_next_month_balance_only_when_missing() {
    let ts = january();
    let none = vec![OpeningBalance::new("2024-01", d("5000"))];
    assert!(should_suggest_next_month_balance("2024-01", &ts, &none).unwrap());

    let with_next = vec![OpeningBalance::new("2024-02", d("5600"))];
    assert!(!should_suggest_next_month_balance("2024-01", &ts, &with_next).unwrap());

    assert!(!should_suggest_next_month_balance("2024-01", &[], &none).unwrap());
}

#[test]
fn sort_by_amount_and_description() {
    let mut ts = january();
    sort_transactions(&mut ts, SortField::Amount, SortOrder::Asc);
    let amounts: Vec<Decimal> = ts.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, vec![d("50"), d("150"), d("300"), d("500")]);

    sort_transactions(&mut ts, SortField::Date, SortOrder::Desc);
    assert_eq!(ts[0].date.to_string(), "2024-01-25");

    assert_eq!("type".parse::<SortField>().unwrap(), SortField::Kind);
    assert!("size".parse::<SortField>().is_err());
    assert!("sideways".parse::<SortOrder>().is_err());
}
