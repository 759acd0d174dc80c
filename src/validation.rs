// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Form checks. Every validator returns all violations it finds rather than the first one.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::dates::is_valid_date;
use crate::models::{Ledger, TransactionKind};

pub const MIN_AMOUNT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(99_999_999, 0, 0, false, 2);
pub const MIN_DESCRIPTION_LENGTH: usize = 3;
pub const MAX_DESCRIPTION_LENGTH: usize = 200;
pub const MAX_NOTE_LENGTH: usize = 500;

static MONTH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl FormValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Messages joined for one-line display.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

fn amount_errors(field: &str, raw: &str) -> Vec<ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return vec![err(field, "Amount is required")];
    }
    match raw.parse::<Decimal>() {
        Err(_) => vec![err(field, "Amount must be a number")],
        Ok(v) if v < MIN_AMOUNT => vec![err(field, format!("Amount must be at least {MIN_AMOUNT}"))],
        Ok(v) if v > MAX_AMOUNT => vec![err(field, format!("Amount cannot exceed {MAX_AMOUNT}"))],
        Ok(_) => Vec::new(),
    }
}

fn description_errors(raw: &str) -> Vec<ValidationError> {
    let len = raw.trim().chars().count();
    if len == 0 {
        vec![err("description", "Description is required")]
    } else if len < MIN_DESCRIPTION_LENGTH {
        vec![err(
            "description",
            format!("Description must be at least {MIN_DESCRIPTION_LENGTH} characters"),
        )]
    } else if len > MAX_DESCRIPTION_LENGTH {
        vec![err(
            "description",
            format!("Description must be at most {MAX_DESCRIPTION_LENGTH} characters"),
        )]
    } else {
        Vec::new()
    }
}

fn note_errors(note: Option<&str>) -> Vec<ValidationError> {
    match note {
        Some(n) if n.chars().count() > MAX_NOTE_LENGTH => vec![err(
            "note",
            format!("Note must be at most {MAX_NOTE_LENGTH} characters"),
        )],
        _ => Vec::new(),
    }
}

fn month_errors(raw: &str) -> Vec<ValidationError> {
    if MONTH_RE.is_match(raw) {
        Vec::new()
    } else {
        vec![err("month", "Valid month is required (YYYY-MM format)")]
    }
}

fn category_errors(ledger: Ledger, raw: &str) -> Vec<ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        vec![err("category", "Category is required")]
    } else if !ledger.has_category(raw) {
        vec![err("category", format!("Unknown category '{raw}'"))]
    } else {
        Vec::new()
    }
}

fn kind_errors(raw: &str) -> Vec<ValidationError> {
    if raw.parse::<TransactionKind>().is_ok() {
        Vec::new()
    } else {
        vec![err("type", "Valid transaction type is required")]
    }
}

pub fn validate_amount(raw: &str) -> FormValidationResult {
    FormValidationResult::from_errors(amount_errors("amount", raw))
}

pub fn validate_description(raw: &str) -> FormValidationResult {
    FormValidationResult::from_errors(description_errors(raw))
}

pub fn validate_note(note: Option<&str>) -> FormValidationResult {
    FormValidationResult::from_errors(note_errors(note))
}

pub fn validate_month(raw: &str) -> FormValidationResult {
    FormValidationResult::from_errors(month_errors(raw))
}

pub fn validate_category(ledger: Ledger, raw: &str) -> FormValidationResult {
    FormValidationResult::from_errors(category_errors(ledger, raw))
}

pub fn validate_kind(raw: &str) -> FormValidationResult {
    FormValidationResult::from_errors(kind_errors(raw))
}

pub fn validate_date(raw: &str) -> FormValidationResult {
    let errors = if is_valid_date(raw) {
        Vec::new()
    } else {
        vec![err("date", "Valid date is required (YYYY-MM-DD format)")]
    };
    FormValidationResult::from_errors(errors)
}

/// Raw transaction form input, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    pub description: String,
    pub category: String,
    pub amount: String,
    pub kind: String,
    pub date: Option<String>,
}

pub fn validate_transaction(ledger: Ledger, form: &TransactionForm) -> FormValidationResult {
    let mut errors = description_errors(&form.description);
    errors.extend(category_errors(ledger, &form.category));
    errors.extend(amount_errors("amount", &form.amount));
    errors.extend(kind_errors(&form.kind));
    if let Some(date) = form.date.as_deref() {
        errors.extend(validate_date(date).errors);
    }
    FormValidationResult::from_errors(errors)
}

#[derive(Debug, Clone, Default)]
pub struct OpeningBalanceForm {
    pub balance: String,
    pub note: String,
    pub month: String,
}

/// Opening balances may be negative (an overdrawn month) but share the amount ceiling.
pub fn validate_opening_balance(form: &OpeningBalanceForm) -> FormValidationResult {
    let mut errors = Vec::new();
    let raw = form.balance.trim();
    if raw.is_empty() {
        errors.push(err("balance", "Balance is required"));
    } else {
        match raw.parse::<Decimal>() {
            Err(_) => errors.push(err("balance", "Balance must be a number")),
            Ok(v) if v.abs() > MAX_AMOUNT => errors.push(err(
                "balance",
                format!("Balance cannot exceed {MAX_AMOUNT} in magnitude"),
            )),
            Ok(_) => {}
        }
    }
    let note = form.note.trim();
    errors.extend(note_errors((!note.is_empty()).then_some(note)));
    errors.extend(month_errors(form.month.trim()));
    FormValidationResult::from_errors(errors)
}
