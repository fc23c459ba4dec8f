use crate::error::CertEvalError;
use crate::models::{LogEntry, SummaryRecord};
use crate::store::table;
use std::path::{Path, PathBuf};

pub const LOG_COLUMNS: &[&str] = &[
    "id",
    "name",
    "category_id",
    "category_label",
    "certs",
    "Certification",
    "Mandate Number",
    "Mandate title",
    "Mandate Description",
    "prompt",
    "response",
    "recommendation",
    "model",
    "rec_datetime",
];

pub const SUMMARY_COLUMNS: &[&str] = &[
    "product",
    "model",
    "cert",
    "mandates passed",
    "mandates failed",
    "mandates na",
    "percentage_passed",
    "time",
    "cost",
];

/// Per-mandate evaluation log. Newest rows come first.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a run's entries, in evaluation order, ahead of all older rows.
    pub fn prepend(&self, entries: &[LogEntry]) -> Result<(), CertEvalError> {
        if entries.is_empty() {
            return Ok(());
        }
        table::prepend_records(&self.path, LOG_COLUMNS, entries)
    }

    pub fn read_all(&self) -> Result<Vec<LogEntry>, CertEvalError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        table::read_positional(&self.path, LOG_COLUMNS)
    }

    pub fn entries_for(
        &self,
        product_name: &str,
        certification: &str,
        provider_name: &str,
    ) -> Result<Vec<LogEntry>, CertEvalError> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|entry| {
                entry.product_name == product_name
                    && entry.certification == certification
                    && entry.provider_name == provider_name
            })
            .collect())
    }
}

/// One row per (product, certification, provider) run. Newest rows come first.
#[derive(Debug, Clone)]
pub struct SummaryStore {
    path: PathBuf,
}

impl SummaryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn prepend(&self, record: &SummaryRecord) -> Result<(), CertEvalError> {
        table::prepend_records(&self.path, SUMMARY_COLUMNS, std::slice::from_ref(record))
    }

    pub fn read_all(&self) -> Result<Vec<SummaryRecord>, CertEvalError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        table::read_positional(&self.path, SUMMARY_COLUMNS)
    }
}
