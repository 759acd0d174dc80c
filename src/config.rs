// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Deployment settings kept in the `settings` table.

use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use crate::db::data_dir;
use crate::report::RendererKind;

pub const CONGREGATION_NAME: &str = "congregation_name";
pub const REPORT_RENDERER: &str = "report.renderer";
pub const REPORT_TEMPLATE: &str = "report.template";

pub const KNOWN_KEYS: [&str; 3] = [CONGREGATION_NAME, REPORT_RENDERER, REPORT_TEMPLATE];

const TEMPLATE_FILE: &str = "report-template.pdf";

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()
        .with_context(|| format!("Read setting '{}'", key))?;
    Ok(v)
}

/// Stores a known setting. Renderer values are checked before they are saved.
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if !KNOWN_KEYS.contains(&key) {
        bail!(
            "Unknown setting '{}' (known: {})",
            key,
            KNOWN_KEYS.join(", ")
        );
    }
    let value = value.trim();
    if key == REPORT_RENDERER {
        value.parse::<RendererKind>()?;
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub congregation_name: Option<String>,
    pub renderer: RendererKind,
    pub template_location: String,
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Settings> {
        let congregation_name = get_setting(conn, CONGREGATION_NAME)?.filter(|s| !s.is_empty());
        let renderer = match get_setting(conn, REPORT_RENDERER)? {
            Some(r) => r.parse()?,
            None => RendererKind::default(),
        };
        let template_location = match get_setting(conn, REPORT_TEMPLATE)? {
            Some(t) if !t.is_empty() => t,
            _ => data_dir()?.join(TEMPLATE_FILE).display().to_string(),
        };
        Ok(Settings {
            congregation_name,
            renderer,
            template_location,
        })
    }
}
