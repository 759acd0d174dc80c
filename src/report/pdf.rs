// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! A small drawing surface over `lopdf` with millimetre coordinates measured
//! from the top-left corner, the way the report layout is written.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

use crate::error::ReportError;

/// US legal, portrait.
pub const PAGE_WIDTH_MM: f32 = 215.9;
pub const PAGE_HEIGHT_MM: f32 = 355.6;

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Advance widths (1/1000 em) of Helvetica for ASCII 32..=126.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48-63
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80-95
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96-111
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 112-126
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48-63
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80-95
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96-111
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 112-126
];

const DEFAULT_WIDTH: u16 = 556;

fn glyph_width(ch: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    match ch as u32 {
        c @ 32..=126 => table[(c - 32) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Rendered width of `text` in millimetres.
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c, bold))).sum();
    units as f32 / 1000.0 * size / PT_PER_MM
}

/// Breaks `text` on spaces into lines no wider than `max_width` mm.
///
/// A single word wider than the column is cut short and ends in `...`.
pub fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, size, false) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, size, false) <= max_width {
            current = word.to_string();
        } else {
            lines.push(truncate_to_width(word, max_width, size));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn truncate_to_width(word: &str, max_width: f32, size: f32) -> String {
    let mut out = String::new();
    for ch in word.chars() {
        out.push(ch);
        if text_width(&format!("{out}..."), size, false) > max_width {
            out.pop();
            break;
        }
    }
    out.push_str("...");
    out
}

/// Maps text onto the WinAnsi code page used by the standard fonts; unmapped characters become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match ch {
            '\u{20}'..='\u{7e}' => ch as u8,
            '\u{a0}'..='\u{ff}' => ch as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses `#RRGGBB`; anything else yields black.
    pub fn hex(s: &str) -> Rgb {
        let s = s.trim_start_matches('#');
        let channel = |i: usize| {
            s.get(i..i + 2)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .unwrap_or(0)
        };
        if s.len() == 6 {
            Rgb(channel(0), channel(2), channel(4))
        } else {
            Rgb(0, 0, 0)
        }
    }

    fn operands(self) -> Vec<Object> {
        [self.0, self.1, self.2]
            .iter()
            .map(|c| Object::Real(f32::from(*c) / 255.0))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

fn pt(mm: f32) -> Object {
    Object::Real(mm * PT_PER_MM)
}

/// Page-oriented drawing state. Draw calls go to the current page.
pub struct PdfCanvas {
    pages: Vec<Vec<Operation>>,
    current: usize,
    font_size: f32,
    bold: bool,
    text_color: Rgb,
    draw_color: Rgb,
    fill_color: Rgb,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            current: 0,
            font_size: 10.0,
            bold: false,
            text_color: Rgb(0, 0, 0),
            draw_color: Rgb(0, 0, 0),
            fill_color: Rgb(0, 0, 0),
        }
    }

    pub fn width(&self) -> f32 {
        PAGE_WIDTH_MM
    }

    pub fn height(&self) -> f32 {
        PAGE_HEIGHT_MM
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.font_size = size;
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    pub fn set_text_color(&mut self, c: Rgb) {
        self.text_color = c;
    }

    pub fn set_draw_color(&mut self, c: Rgb) {
        self.draw_color = c;
    }

    pub fn set_fill_color(&mut self, c: Rgb) {
        self.fill_color = c;
    }

    pub fn add_page(&mut self) {
        self.pages.push(Vec::new());
        self.current = self.pages.len() - 1;
    }

    /// Switches drawing to page `index` (0-based); out of range is ignored.
    pub fn set_page(&mut self, index: usize) {
        if index < self.pages.len() {
            self.current = index;
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Width of `text` in the current font.
    pub fn measure(&self, text: &str) -> f32 {
        text_width(text, self.font_size, self.bold)
    }

    /// Draws `text` with its baseline at `y`; `x` is the left edge, centre or right edge per `align`.
    pub fn text(&mut self, text: &str, x: f32, y: f32, align: Align) {
        let w = self.measure(text);
        let left = match align {
            Align::Left => x,
            Align::Center => x - w / 2.0,
            Align::Right => x - w,
        };
        let font = if self.bold { "F2" } else { "F1" };
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), Object::Real(self.font_size)]),
            Operation::new("rg", self.text_color.operands()),
            Operation::new("Td", vec![pt(left), pt(PAGE_HEIGHT_MM - y)]),
            Operation::new("Tj", vec![Object::string_literal(encode_win_ansi(text))]),
            Operation::new("ET", vec![]),
        ];
        self.pages[self.current].extend(ops);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let ops = vec![
            Operation::new("RG", self.draw_color.operands()),
            Operation::new("w", vec![Object::Real(0.57)]),
            Operation::new("m", vec![pt(x1), pt(PAGE_HEIGHT_MM - y1)]),
            Operation::new("l", vec![pt(x2), pt(PAGE_HEIGHT_MM - y2)]),
            Operation::new("S", vec![]),
        ];
        self.pages[self.current].extend(ops);
    }

    /// Outlined rectangle with its top-left corner at `(x, y)`.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let ops = vec![
            Operation::new("RG", self.draw_color.operands()),
            Operation::new("re", vec![pt(x), pt(PAGE_HEIGHT_MM - y - h), pt(w), pt(h)]),
            Operation::new("S", vec![]),
        ];
        self.pages[self.current].extend(ops);
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let ops = vec![
            Operation::new("rg", self.fill_color.operands()),
            Operation::new("re", vec![pt(x), pt(PAGE_HEIGHT_MM - y - h), pt(w), pt(h)]),
            Operation::new("f", vec![]),
        ];
        self.pages[self.current].extend(ops);
    }

    /// Serialises every page into a standalone PDF document.
    pub fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations }.encode()?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            let page_id: ObjectId = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources,
            });
            kids.push(page_id.into());
        }
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(PAGE_WIDTH_MM * PT_PER_MM),
                    Object::Real(PAGE_HEIGHT_MM * PT_PER_MM),
                ],
            }),
        );
        let catalog = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog);

        let mut out = Vec::new();
        doc.save_to(&mut out)?;
        Ok(out)
    }
}
