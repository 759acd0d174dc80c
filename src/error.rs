// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Rejected values for the small closed sets used across the CLI and the stores.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown ledger '{0}' (use default|khoc)")]
    Ledger(String),
    #[error("Unknown transaction type '{0}' (use income|expense)")]
    Kind(String),
    #[error("Unknown report renderer '{0}' (use styled|template)")]
    Renderer(String),
    #[error("Unknown sort field '{0}' (use date|amount|description|category|type)")]
    SortField(String),
    #[error("Unknown sort order '{0}' (use asc|desc)")]
    SortOrder(String),
    #[error("Unknown note sort field '{0}' (use title|created|updated)")]
    NoteSortField(String),
}

/// Failures while producing a monthly PDF report.
///
/// Missing or empty templates abort the report; no partial document is produced.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Report template not found at {0}")]
    TemplateMissing(String),
    #[error("Report template at {0} has no pages")]
    TemplateEmpty(String),
    #[error("Failed to parse report template {location}")]
    TemplateParse {
        location: String,
        #[source]
        source: lopdf::Error,
    },
    #[error("Failed to fetch report template from {location}")]
    TemplateFetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error(transparent)]
    Pdf(#[from] lopdf::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
