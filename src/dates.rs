// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month-key (`YYYY-MM`) arithmetic and calendar helpers.

use anyhow::{Result, anyhow};
use chrono::{Datelike, Local, Months, NaiveDate};

/// Splits a `YYYY-MM` key into year and month number.
pub fn parse_month_key(month: &str) -> Result<(i32, u32)> {
    let (y, m) = month
        .split_once('-')
        .ok_or_else(|| anyhow!("Invalid month '{}', expected YYYY-MM", month))?;
    if y.len() != 4 || m.len() != 2 {
        return Err(anyhow!("Invalid month '{}', expected YYYY-MM", month));
    }
    let year: i32 = y
        .parse()
        .map_err(|_| anyhow!("Invalid year in month '{}'", month))?;
    let num: u32 = m
        .parse()
        .map_err(|_| anyhow!("Invalid month number in '{}'", month))?;
    if !(1..=12).contains(&num) {
        return Err(anyhow!("Invalid month number {} in '{}'", num, month));
    }
    Ok((year, num))
}

/// First day of the month named by `month`.
pub fn month_start(month: &str) -> Result<NaiveDate> {
    let (y, m) = parse_month_key(month)?;
    NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(|| anyhow!("Invalid month '{}'", month))
}

/// Last day of the month named by `month`.
pub fn month_end(month: &str) -> Result<NaiveDate> {
    let start = month_start(month)?;
    start
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| anyhow!("Month '{}' is out of range", month))
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn next_month(month: &str) -> Result<String> {
    let start = month_start(month)?;
    start
        .checked_add_months(Months::new(1))
        .map(month_key)
        .ok_or_else(|| anyhow!("Month '{}' is out of range", month))
}

pub fn previous_month(month: &str) -> Result<String> {
    let start = month_start(month)?;
    start
        .checked_sub_months(Months::new(1))
        .map(month_key)
        .ok_or_else(|| anyhow!("Month '{}' is out of range", month))
}

/// Every month from `start` to `end`, both inclusive. Empty when `start > end`.
pub fn months_between(start: &str, end: &str) -> Result<Vec<String>> {
    parse_month_key(end)?;
    let mut out = Vec::new();
    let mut current = start.to_string();
    while current.as_str() <= end {
        let next = next_month(&current)?;
        out.push(current);
        current = next;
    }
    Ok(out)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_month() -> String {
    month_key(today())
}

pub fn is_month_in_future(month: &str) -> bool {
    month > current_month().as_str()
}

pub fn is_valid_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").is_ok()
}
