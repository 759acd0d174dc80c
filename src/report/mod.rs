// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Monthly PDF reports. Two renderers share one input shape and trait.

pub mod pdf;
pub mod styled;
pub mod template;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use log::{info, warn};
use serde::Serialize;

use crate::config::Settings;
use crate::error::{ParseError, ReportError};
use crate::models::{OpeningBalance, Transaction};

pub use styled::StyledReport;
pub use template::{TemplateReport, TemplateSource};

/// Everything a renderer needs for one month.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthlyReportData {
    pub month: String,
    pub transactions: Vec<Transaction>,
    pub opening_balance: Option<OpeningBalance>,
    pub congregation_name: Option<String>,
    /// Preformatted date for the "Generated on" line; today when absent.
    pub report_date: Option<String>,
}

pub trait ReportRenderer {
    fn render(&self, data: &MonthlyReportData) -> Result<Vec<u8>, ReportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Styled,
    Template,
}

impl FromStr for RendererKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "styled" => Ok(RendererKind::Styled),
            "template" => Ok(RendererKind::Template),
            other => Err(ParseError::Renderer(other.to_string())),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RendererKind::Styled => "styled",
            RendererKind::Template => "template",
        })
    }
}

/// The renderer selected by `kind`, configured from `settings`.
pub fn build_renderer(kind: RendererKind, settings: &Settings) -> Box<dyn ReportRenderer> {
    match kind {
        RendererKind::Styled => Box::new(StyledReport),
        RendererKind::Template => Box::new(TemplateReport::from_location(&settings.template_location)),
    }
}

pub fn report_filename(month: &str) -> String {
    format!("monthly-report-{month}.pdf")
}

/// Renders into `dir/monthly-report-<month>.pdf`. Nothing is written when rendering fails.
pub fn save_report(
    renderer: &dyn ReportRenderer,
    data: &MonthlyReportData,
    dir: &Path,
) -> Result<PathBuf, ReportError> {
    let bytes = renderer.render(data)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(report_filename(&data.month));
    fs::write(&path, bytes)?;
    info!("saved report to {}", path.display());
    Ok(path)
}

/// Renders to the temp dir and hands the file to the platform viewer.
pub fn open_report(
    renderer: &dyn ReportRenderer,
    data: &MonthlyReportData,
) -> Result<PathBuf, ReportError> {
    let path = save_report(renderer, data, &std::env::temp_dir())?;
    let status = if cfg!(target_os = "macos") {
        Command::new("open").arg(&path).status()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(&path)
            .status()
    } else {
        Command::new("xdg-open").arg(&path).status()
    };
    match status {
        Ok(s) if s.success() => {}
        Ok(s) => warn!("viewer exited with {} for {}", s, path.display()),
        Err(e) => return Err(ReportError::Io(e)),
    }
    Ok(path)
}
