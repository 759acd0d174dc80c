// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use log::debug;
use rust_decimal::Decimal;

use super::pdf::{Align, PdfCanvas, Rgb, wrap_text};
use super::{MonthlyReportData, ReportRenderer};
use crate::calc::summarize;
use crate::dates::today;
use crate::error::ReportError;
use crate::format::{category_code, format_currency_whole, format_date, format_month_year};
use crate::models::{Transaction, TransactionKind};

const MARGIN_LEFT: f32 = 10.0;
const MARGIN_RIGHT: f32 = 10.0;
const MARGIN_TOP: f32 = 15.0;
const MARGIN_BOTTOM: f32 = 15.0;

/// Rows stop this far above the bottom edge to keep clear of the footer.
const FOOTER_ZONE: f32 = 40.0;

const SIZE_TITLE: f32 = 16.0;
const SIZE_HEADER: f32 = 14.0;
const SIZE_SUBHEADER: f32 = 12.0;
const SIZE_BODY: f32 = 10.0;
const SIZE_SMALL: f32 = 8.0;

const COL_DATE: f32 = 25.0;
const COL_DESCRIPTION: f32 = 120.0;
const COL_CATEGORY: f32 = 35.0;
const DESCRIPTION_WRAP: f32 = COL_DESCRIPTION - 5.0;

const LINE_STEP: f32 = 4.0;
const MIN_ROW_HEIGHT: f32 = 5.0;

const DEFAULT_TITLE: &str = "Congregation Accounts";

fn primary() -> Rgb {
    Rgb::hex("#4F46E5")
}
fn success() -> Rgb {
    Rgb::hex("#10B981")
}
fn danger() -> Rgb {
    Rgb::hex("#EF4444")
}
fn body() -> Rgb {
    Rgb::hex("#374151")
}

/// Draws the monthly report from scratch on legal-size pages.
#[derive(Debug, Default, Clone, Copy)]
pub struct StyledReport;

impl ReportRenderer for StyledReport {
    fn render(&self, data: &MonthlyReportData) -> Result<Vec<u8>, ReportError> {
        let month_label = format_month_year(&data.month)
            .map_err(|_| ReportError::InvalidMonth(data.month.clone()))?;
        let mut pdf = PdfCanvas::new();
        let mut y = MARGIN_TOP;
        y = header(&mut pdf, data, &month_label, y) + 10.0;
        y = summary(&mut pdf, data, y) + 10.0;
        transactions(&mut pdf, &data.transactions, y);
        footer(&mut pdf);
        debug!(
            "styled report for {} rendered on {} page(s)",
            data.month,
            pdf.page_count()
        );
        pdf.finish()
    }
}

fn header(pdf: &mut PdfCanvas, data: &MonthlyReportData, month_label: &str, mut y: f32) -> f32 {
    let center = pdf.width() / 2.0;
    let title = data
        .congregation_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    pdf.set_font_size(SIZE_TITLE);
    pdf.set_text_color(primary());
    pdf.text(title, center, y, Align::Center);
    y += 10.0;

    pdf.set_font_size(SIZE_HEADER);
    pdf.set_text_color(body());
    pdf.text(
        &format!("Monthly Financial Report – {month_label}"),
        center,
        y,
        Align::Center,
    );
    y += 8.0;

    pdf.set_font_size(SIZE_BODY);
    let generated = data
        .report_date
        .clone()
        .unwrap_or_else(|| format_date(today()));
    pdf.text(&format!("Generated on: {generated}"), center, y, Align::Center);
    y += 5.0;

    pdf.set_draw_color(primary());
    pdf.line(MARGIN_LEFT, y, pdf.width() - MARGIN_RIGHT, y);
    y + 5.0
}

fn summary(pdf: &mut PdfCanvas, data: &MonthlyReportData, mut y: f32) -> f32 {
    let opening = data
        .opening_balance
        .as_ref()
        .map(|b| b.balance)
        .unwrap_or(Decimal::ZERO);
    let totals = summarize(&data.transactions);
    let ending = opening + totals.net;

    pdf.set_font_size(SIZE_SUBHEADER);
    pdf.set_text_color(primary());
    pdf.text("FINANCIAL SUMMARY", MARGIN_LEFT, y, Align::Left);
    y += 10.0;

    let box_width = pdf.width() - MARGIN_LEFT - MARGIN_RIGHT;
    pdf.set_draw_color(body());
    pdf.rect(MARGIN_LEFT, y - 5.0, box_width, 55.0);

    let center = MARGIN_LEFT + box_width / 2.0;
    let label_x = center - 40.0;
    let value_x = center + 20.0;
    pdf.set_font_size(SIZE_BODY);

    let rows = [
        ("Opening Balance:", opening, body(), 10.0),
        ("Total Donations:", totals.total_income, success(), 22.0),
        ("Total Expenses:", totals.total_expenses, danger(), 34.0),
    ];
    for (label, amount, color, offset) in rows {
        pdf.set_text_color(body());
        pdf.text(label, label_x, y + offset, Align::Left);
        pdf.set_text_color(color);
        pdf.text(&format_currency_whole(amount), value_x, y + offset, Align::Left);
    }

    pdf.set_text_color(body());
    pdf.text("Ending Balance:", label_x, y + 46.0, Align::Left);
    pdf.set_text_color(if ending >= Decimal::ZERO {
        success()
    } else {
        danger()
    });
    pdf.set_bold(true);
    pdf.text(&format_currency_whole(ending), value_x, y + 46.0, Align::Left);
    pdf.set_bold(false);

    y + 55.0
}

fn transactions(pdf: &mut PdfCanvas, txs: &[Transaction], mut y: f32) -> f32 {
    pdf.set_font_size(SIZE_SUBHEADER);
    pdf.set_text_color(primary());
    pdf.text("TRANSACTION DETAILS", MARGIN_LEFT, y, Align::Left);
    y += 8.0;

    if txs.is_empty() {
        pdf.set_font_size(SIZE_BODY);
        pdf.set_text_color(body());
        pdf.text("No transactions found for this month.", MARGIN_LEFT, y, Align::Left);
        return y + 10.0;
    }

    let right = pdf.width() - MARGIN_RIGHT;
    let x_description = MARGIN_LEFT + COL_DATE;
    let x_category = x_description + COL_DESCRIPTION;
    let x_amount = x_category + COL_CATEGORY;

    pdf.set_fill_color(Rgb(240, 240, 240));
    pdf.fill_rect(MARGIN_LEFT, y - 2.0, right - MARGIN_LEFT, 6.0);
    pdf.set_font_size(SIZE_SMALL);
    pdf.set_text_color(body());
    pdf.set_bold(true);
    pdf.text("Date", MARGIN_LEFT, y, Align::Left);
    pdf.text("Description", x_description, y, Align::Left);
    pdf.text("Category", x_category, y, Align::Left);
    pdf.text("Amount", x_amount, y, Align::Left);
    pdf.set_bold(false);
    y += 6.0;

    let mut sorted: Vec<&Transaction> = txs.iter().collect();
    sorted.sort_by_key(|t| t.date);

    for (i, t) in sorted.iter().enumerate() {
        let lines = wrap_text(&t.description, DESCRIPTION_WRAP, SIZE_SMALL);
        let row_height = MIN_ROW_HEIGHT.max(lines.len() as f32 * LINE_STEP);
        if y + row_height > pdf.height() - FOOTER_ZONE {
            pdf.add_page();
            y = MARGIN_TOP;
        }

        pdf.set_font_size(SIZE_SMALL);
        pdf.set_text_color(body());
        pdf.text(&format_date(t.date), MARGIN_LEFT, y, Align::Left);
        for (n, line) in lines.iter().enumerate() {
            pdf.text(line, x_description, y + n as f32 * LINE_STEP, Align::Left);
        }
        pdf.text(&category_code(&t.category, t.kind), x_category, y, Align::Left);
        pdf.set_text_color(match t.kind {
            TransactionKind::Income => success(),
            TransactionKind::Expense => danger(),
        });
        pdf.text(&format_currency_whole(t.amount), x_amount, y, Align::Left);

        y += row_height;
        if i % 5 == 4 {
            pdf.set_draw_color(Rgb(230, 230, 230));
            pdf.line(MARGIN_LEFT, y, right, y);
            y += 1.0;
        }
    }

    // counts block: a rule plus three lines
    if y + 34.0 > pdf.height() - FOOTER_ZONE {
        pdf.add_page();
        y = MARGIN_TOP;
    }
    y += 6.0;
    pdf.set_draw_color(body());
    pdf.line(MARGIN_LEFT, y, right, y);
    y += 6.0;

    let totals = summarize(txs);
    let income = txs.iter().filter(|t| t.is_income()).count();
    pdf.set_font_size(SIZE_BODY);
    pdf.set_text_color(body());
    pdf.set_bold(true);
    pdf.text(
        &format!("Total Transactions: {}", totals.count),
        MARGIN_LEFT,
        y,
        Align::Left,
    );
    pdf.text(
        &format!("Donation Transactions: {income}"),
        MARGIN_LEFT,
        y + 8.0,
        Align::Left,
    );
    pdf.text(
        &format!("Expense Transactions: {}", totals.count - income),
        MARGIN_LEFT,
        y + 16.0,
        Align::Left,
    );
    pdf.set_bold(false);
    y + 20.0
}

fn footer(pdf: &mut PdfCanvas) {
    let total = pdf.page_count();
    let y = pdf.height() - MARGIN_BOTTOM;
    let right = pdf.width() - MARGIN_RIGHT;
    for page in 0..total {
        pdf.set_page(page);
        pdf.set_font_size(SIZE_SMALL);
        pdf.set_text_color(body());
        pdf.text(
            "Generated by Congregation Accounts System",
            MARGIN_LEFT,
            y,
            Align::Left,
        );
        pdf.text(
            &format!("Page {} of {}", page + 1, total),
            right,
            y,
            Align::Right,
        );
        pdf.set_draw_color(body());
        pdf.line(MARGIN_LEFT, y - 5.0, right, y - 5.0);
    }
}
