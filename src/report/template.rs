// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Fills the AcroForm fields of a prepared PDF template.

use std::fs;
use std::path::PathBuf;

use log::{debug, info};
use lopdf::{Document, Object, ObjectId, StringFormat};
use reqwest::StatusCode;
use rust_decimal::Decimal;

use super::{MonthlyReportData, ReportRenderer};
use crate::error::ReportError;
use crate::format::{format_month_year, format_plain};
use crate::models::TransactionKind;
use crate::utils::http_client;

const FLAG_RADIO: i64 = 1 << 15;
const FLAG_PUSHBUTTON: i64 = 1 << 16;

/// Nesting limit for the field tree; deeper entries are ignored.
const MAX_FIELD_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    Url(String),
}

impl TemplateSource {
    /// `http://` and `https://` locations are fetched, anything else is a file path.
    pub fn parse(location: &str) -> TemplateSource {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            TemplateSource::Url(trimmed.to_string())
        } else {
            TemplateSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn location(&self) -> String {
        match self {
            TemplateSource::File(p) => p.display().to_string(),
            TemplateSource::Url(u) => u.clone(),
        }
    }

    fn load(&self) -> Result<Vec<u8>, ReportError> {
        match self {
            TemplateSource::File(path) => {
                if !path.is_file() {
                    return Err(ReportError::TemplateMissing(self.location()));
                }
                Ok(fs::read(path)?)
            }
            TemplateSource::Url(url) => {
                let fetch_err = |source| ReportError::TemplateFetch {
                    location: url.clone(),
                    source,
                };
                let resp = http_client()
                    .and_then(|c| c.get(url).send())
                    .map_err(fetch_err)?;
                if resp.status() == StatusCode::NOT_FOUND {
                    return Err(ReportError::TemplateMissing(url.clone()));
                }
                let bytes = resp
                    .error_for_status()
                    .and_then(|r| r.bytes())
                    .map_err(fetch_err)?;
                Ok(bytes.to_vec())
            }
        }
    }
}

/// Renders by filling a fixed set of named form fields in a template PDF.
#[derive(Debug, Clone)]
pub struct TemplateReport {
    source: TemplateSource,
}

impl TemplateReport {
    pub fn new(source: TemplateSource) -> Self {
        Self { source }
    }

    pub fn from_location(location: &str) -> Self {
        Self::new(TemplateSource::parse(location))
    }

    pub fn source(&self) -> &TemplateSource {
        &self.source
    }
}

impl ReportRenderer for TemplateReport {
    fn render(&self, data: &MonthlyReportData) -> Result<Vec<u8>, ReportError> {
        let location = self.source.location();
        let bytes = self.source.load()?;
        if bytes.is_empty() {
            return Err(ReportError::TemplateEmpty(location));
        }
        let mut doc = Document::load_mem(&bytes).map_err(|source| ReportError::TemplateParse {
            location: location.clone(),
            source,
        })?;
        if doc.get_pages().is_empty() {
            return Err(ReportError::TemplateEmpty(location));
        }

        let values = field_values(data)?;
        let fields = form_fields(&doc);
        let mut filled = 0usize;
        for field in &fields {
            let Some(value) = lookup(&values, &field.name) else {
                continue;
            };
            match field.kind() {
                FieldKind::Checkbox => {
                    debug!("skipping checkbox field {}", field.name);
                }
                FieldKind::Button => {
                    debug!("skipping button field {}", field.name);
                }
                FieldKind::Text => match write_value(&mut doc, field, value) {
                    Ok(()) => filled += 1,
                    Err(e) => debug!("could not fill field {}: {}", field.name, e),
                },
            }
        }
        if !fields.is_empty() {
            set_need_appearances(&mut doc);
        }
        info!(
            "filled {} of {} template fields from {}",
            filled,
            fields.len(),
            location
        );

        let mut out = Vec::new();
        doc.save_to(&mut out)?;
        Ok(out)
    }
}

fn income_total(data: &MonthlyReportData, category: &str) -> Decimal {
    data.transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income && t.category.contains(category))
        .map(|t| t.amount)
        .sum()
}

/// The field name to value mapping for one report.
fn field_values(data: &MonthlyReportData) -> Result<Vec<(&'static str, String)>, ReportError> {
    let month_year = format_month_year(&data.month)
        .map_err(|_| ReportError::InvalidMonth(data.month.clone()))?;
    let opening = data
        .opening_balance
        .as_ref()
        .map(|b| b.balance)
        .unwrap_or(Decimal::ZERO);
    let mut values = Vec::new();
    if let Some(name) = data
        .congregation_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        values.push(("congregation_name", name.to_string()));
    }
    values.push(("month_year", month_year));
    values.push(("opening_balance", format_plain(opening)));
    values.push((
        "worldwide_work_donations",
        format_plain(income_total(data, "Worldwide Work Donations")),
    ));
    values.push((
        "local_congregation_donations",
        format_plain(income_total(data, "Local Congregation Donations")),
    ));
    Ok(values)
}

/// Matches the full dotted name first, then its last segment.
fn lookup<'v>(values: &'v [(&'static str, String)], name: &str) -> Option<&'v str> {
    let last = name.rsplit('.').next().unwrap_or(name);
    values
        .iter()
        .find(|(k, _)| *k == name)
        .or_else(|| values.iter().find(|(k, _)| *k == last))
        .map(|(_, v)| v.as_str())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Checkbox,
    Button,
}

#[derive(Debug, Clone)]
struct FormField {
    id: ObjectId,
    name: String,
    field_type: Option<Vec<u8>>,
    flags: i64,
}

impl FormField {
    fn kind(&self) -> FieldKind {
        match self.field_type.as_deref() {
            Some(b"Btn") if self.flags & (FLAG_RADIO | FLAG_PUSHBUTTON) == 0 => FieldKind::Checkbox,
            Some(b"Btn") => FieldKind::Button,
            _ => FieldKind::Text,
        }
    }
}

/// PDF text strings are PDFDocEncoding or UTF-16BE with a byte order mark.
fn decode_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        bytes.iter().map(|&b| char::from(b)).collect()
    }
}

fn encode_text(value: &str) -> Object {
    if value.is_ascii() {
        return Object::string_literal(value);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in value.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Literal)
}

fn form_fields(doc: &Document) -> Vec<FormField> {
    let mut out = Vec::new();
    let Ok(catalog) = doc.catalog() else {
        return out;
    };
    let Ok(acro) = catalog.get(b"AcroForm") else {
        return out;
    };
    let Ok((_, acro)) = doc.dereference(acro) else {
        return out;
    };
    let Ok(acro) = acro.as_dict() else {
        return out;
    };
    let Ok(fields) = acro.get(b"Fields") else {
        return out;
    };
    let Ok((_, fields)) = doc.dereference(fields) else {
        return out;
    };
    if let Ok(fields) = fields.as_array() {
        walk_fields(doc, fields, None, None, 0, 0, &mut out);
    }
    out
}

fn walk_fields(
    doc: &Document,
    entries: &[Object],
    parent: Option<&str>,
    inherited_type: Option<&[u8]>,
    inherited_flags: i64,
    depth: usize,
    out: &mut Vec<FormField>,
) {
    if depth > MAX_FIELD_DEPTH {
        return;
    }
    for entry in entries {
        let Ok(id) = entry.as_reference() else {
            continue;
        };
        let Ok(dict) = doc.get_dictionary(id) else {
            continue;
        };
        let partial = dict.get(b"T").and_then(Object::as_str).ok().map(decode_text);
        let name = match (parent, partial) {
            (Some(p), Some(t)) => format!("{p}.{t}"),
            (None, Some(t)) => t,
            (Some(p), None) => p.to_string(),
            (None, None) => continue,
        };
        let field_type = dict
            .get(b"FT")
            .and_then(Object::as_name)
            .ok()
            .or(inherited_type);
        let flags = dict
            .get(b"Ff")
            .and_then(Object::as_i64)
            .unwrap_or(inherited_flags);

        let kids = dict.get(b"Kids").and_then(Object::as_array).ok();
        let child_fields: Vec<Object> = kids
            .map(|k| {
                k.iter()
                    .filter(|o| {
                        o.as_reference()
                            .and_then(|id| doc.get_dictionary(id))
                            .is_ok_and(|d| d.has(b"T"))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if child_fields.is_empty() {
            out.push(FormField {
                id,
                name,
                field_type: field_type.map(<[u8]>::to_vec),
                flags,
            });
        } else {
            walk_fields(
                doc,
                &child_fields,
                Some(&name),
                field_type,
                flags,
                depth + 1,
                out,
            );
        }
    }
}

fn write_value(doc: &mut Document, field: &FormField, value: &str) -> lopdf::Result<()> {
    let dict = doc.get_dictionary_mut(field.id)?;
    dict.set("V", encode_text(value));
    dict.remove(b"AP");
    let widgets: Vec<ObjectId> = dict
        .get(b"Kids")
        .and_then(Object::as_array)
        .map(|k| k.iter().filter_map(|o| o.as_reference().ok()).collect())
        .unwrap_or_default();
    for widget in widgets {
        if let Ok(w) = doc.get_dictionary_mut(widget) {
            w.remove(b"AP");
        }
    }
    Ok(())
}

fn set_need_appearances(doc: &mut Document) {
    let acro_ref = doc
        .catalog()
        .and_then(|c| c.get(b"AcroForm"))
        .and_then(Object::as_reference);
    let acro = match acro_ref {
        Ok(id) => doc.get_dictionary_mut(id),
        Err(_) => doc
            .catalog_mut()
            .and_then(|c| c.get_mut(b"AcroForm"))
            .and_then(Object::as_dict_mut),
    };
    match acro {
        Ok(d) => d.set("NeedAppearances", true),
        Err(e) => debug!("could not set NeedAppearances: {}", e),
    }
}
