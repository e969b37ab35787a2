//! Export formats, scopes and file naming

use crate::domain::entry::Privacy;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Prefix of every downloaded export file
pub const EXPORT_FILE_PREFIX: &str = "hatchling-export";

/// Document format produced by the export renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Csv,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Csv, ExportFormat::Json];

    /// Value for the `Accept` header
    pub fn accept(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Invalid format: '{}'. Valid formats are: pdf, csv, json",
                s
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Per-format rendering time limits.
///
/// PDF composition is slower than tabular output, so it gets the longer budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportTimeouts {
    pub pdf: Duration,
    pub data: Duration,
}

impl ExportTimeouts {
    pub fn for_format(&self, format: ExportFormat) -> Duration {
        match format {
            ExportFormat::Pdf => self.pdf,
            ExportFormat::Csv | ExportFormat::Json => self.data,
        }
    }
}

impl Default for ExportTimeouts {
    fn default() -> Self {
        ExportTimeouts {
            pdf: Duration::from_secs(30),
            data: Duration::from_secs(15),
        }
    }
}

/// Which entries an export covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    /// Everything the requester can see
    All,
    Single(String),
    /// Several ids, in caller order
    Batch(Vec<String>),
}

impl ExportScope {
    /// Scope from a list of ids: none means all, duplicates are dropped.
    pub fn from_ids<S: AsRef<str>>(ids: &[S]) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for id in ids {
            let id = id.as_ref().trim();
            if !id.is_empty() && !unique.iter().any(|existing| existing == id) {
                unique.push(id.to_string());
            }
        }

        match unique.len() {
            0 => ExportScope::All,
            1 => ExportScope::Single(unique.remove(0)),
            _ => ExportScope::Batch(unique),
        }
    }

    pub fn ids(&self) -> &[String] {
        match self {
            ExportScope::All => &[],
            ExportScope::Single(id) => std::slice::from_ref(id),
            ExportScope::Batch(ids) => ids,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ExportScope::All => "all entries".to_string(),
            ExportScope::Single(id) => format!("entry {}", id),
            ExportScope::Batch(ids) => format!("{} entries", ids.len()),
        }
    }
}

/// Optional narrowing applied by the renderer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportFilters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub privacy: Option<Privacy>,
}

impl ExportFilters {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.privacy.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub format: ExportFormat,
    pub scope: ExportScope,
    pub requester: String,
    pub filters: ExportFilters,
}

/// File name for an export generated at `at`, unique to the second
pub fn export_filename(format: ExportFormat, at: NaiveDateTime) -> String {
    format!(
        "{}-{}.{}",
        EXPORT_FILE_PREFIX,
        at.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}
