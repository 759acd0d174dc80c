// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display formatting for amounts, dates, month labels and categories.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::dates::month_start;
use crate::models::TransactionKind;

pub const CURRENCY_SYMBOL: &str = "₱";
pub const CURRENCY_CODE: &str = "PHP";

/// Inserts `,` between every group of three integer digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rounds to whole cents, halves away from zero. Stores and displays share this rule.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn format_grouped(amount: Decimal, dp: u32, prefix: &str) -> String {
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.*}", dp as usize, rounded.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut out = format!("{sign}{prefix}{}", group_thousands(int_part));
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// `₱1,234.56`, `-₱12.00`.
pub fn format_currency(amount: Decimal) -> String {
    format_grouped(amount, 2, CURRENCY_SYMBOL)
}

/// Whole-unit amount for printed reports: `PHP 1,235`.
///
/// The standard PDF fonts have no peso sign, so the ISO code is used instead.
pub fn format_currency_whole(amount: Decimal) -> String {
    format_grouped(amount, 0, &format!("{CURRENCY_CODE} "))
}

/// Plain two-place decimal with no grouping, e.g. `5000.00`.
pub fn format_plain(amount: Decimal) -> String {
    let rounded = round_money(amount);
    format!("{:.2}", rounded)
}

/// Parses a displayed currency string back into an amount; unparsable input yields zero.
pub fn parse_currency(s: &str) -> Decimal {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().unwrap_or(Decimal::ZERO)
}

/// `Jan 15, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `2024-01` becomes `January 2024`.
pub fn format_month_year(month: &str) -> Result<String> {
    Ok(month_start(month)?.format("%B %Y").to_string())
}

/// Shorter names for the long congregation categories.
pub fn format_category_name(category: &str) -> &str {
    match category {
        "Local Congregation Donations" => "Local Donations",
        "Worldwide Work Donations" => "Worldwide Donations",
        "Local Congregation Expenses" => "Local Expenses",
        "Worldwide Work Expenses" => "Worldwide Expenses",
        other => other,
    }
}

const MAX_CODE_LEN: usize = 12;

/// Compact category label used in the printed transaction table.
pub fn category_code(category: &str, kind: TransactionKind) -> String {
    let income = kind == TransactionKind::Income;
    let code = if category.contains("Worldwide Work") {
        if income { "WWW" } else { "WWE" }.to_string()
    } else if category.contains("Local Congregation") {
        if income { "LCD" } else { "LCE" }.to_string()
    } else if category.contains("Other") {
        if income {
            "Other Donations"
        } else {
            "Other Expenses"
        }
        .to_string()
    } else {
        category.to_string()
    };
    if code.chars().count() > MAX_CODE_LEN {
        let head: String = code.chars().take(MAX_CODE_LEN - 2).collect();
        format!("{head}...")
    } else {
        code
    }
}
