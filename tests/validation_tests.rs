// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use congregation_accounts::models::Ledger;
use congregation_accounts::validation::{
    OpeningBalanceForm, TransactionForm, validate_amount, validate_category, validate_date,
    validate_description, validate_kind, validate_month, validate_note, validate_opening_balance,
    validate_transaction,
};

#[test]
fn amount_bounds() {
    assert!(!validate_amount("0.00").is_valid);
    assert!(validate_amount("0.01").is_valid);
    assert!(validate_amount("999999.99").is_valid);
    assert!(!validate_amount("1000000").is_valid);
    assert!(!validate_amount("").is_valid);
    assert!(!validate_amount("ten").is_valid);
}

#[test]
fn description_length() {
    assert!(!validate_description("ab").is_valid);
    assert!(validate_description("abc").is_valid);
    assert!(!validate_description("   ").is_valid);
    assert!(!validate_description(&"x".repeat(201)).is_valid);
    assert!(validate_description(&"x".repeat(200)).is_valid);
}

#[test]
fn note_month_kind_and_category() {
    assert!(validate_note(None).is_valid);
    assert!(validate_note(Some(&"n".repeat(500))).is_valid);
    assert!(!validate_note(Some(&"n".repeat(501))).is_valid);

    assert!(validate_month("2024-01").is_valid);
    assert!(!validate_month("2024-1").is_valid);
    assert!(!validate_month("").is_valid);

    assert!(validate_kind("income").is_valid);
    assert!(!validate_kind("transfer").is_valid);

    assert!(validate_category(Ledger::Khoc, "Other Expenses").is_valid);
    assert!(!validate_category(Ledger::Default, "Groceries").is_valid);

    assert!(validate_date("2024-02-29").is_valid);
    assert!(!validate_date("2023-02-29").is_valid);
}

#[test]
fn transaction_form_collects_every_error() {
    let form = TransactionForm {
        description: "ab".into(),
        category: "".into(),
        amount: "0".into(),
        kind: "gift".into(),
        date: Some("yesterday".into()),
    };
    let result = validate_transaction(Ledger::Default, &form);
    assert!(!result.is_valid);
    let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["description", "category", "amount", "type", "date"]);
    assert!(result.summary().contains("description: "));
}

#[test]
fn valid_transaction_form_passes() {
    let form = TransactionForm {
        description: "Electricity Bill".into(),
        category: "Local Congregation Expenses".into(),
        amount: "150".into(),
        kind: "expense".into(),
        date: None,
    };
    let result = validate_transaction(Ledger::Default, &form);
    assert!(result.is_valid, "{}", result.summary());
    assert!(result.errors.is_empty());
}

#[test]
fn opening_balance_may_be_negative() {
    let ok = OpeningBalanceForm {
        balance: "-250.00".into(),
        note: "".into(),
        month: "2024-01".into(),
    };
    assert!(validate_opening_balance(&ok).is_valid);

    let bad = OpeningBalanceForm {
        balance: "lots".into(),
        note: "x".repeat(501),
        month: "Jan".into(),
    };
    let result = validate_opening_balance(&bad);
    assert_eq!(result.errors.len(), 3);
}
