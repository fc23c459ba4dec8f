use crate::error::CertEvalError;
use crate::models::{ColumnSummary, DictionaryEntry};
use crate::store::table;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DICTIONARY_COLUMNS: &[&str] = &[
    "Product Category",
    "Column Name Raw",
    "Column Name",
    "Column Top Values",
    "Column Unit",
    "Column Min",
    "Column Max",
    "Column Definition",
    "Approved",
];

/// Column statistics produced when the dataset was imported.
#[derive(Debug, Clone, Default)]
pub struct ColumnSummaries {
    columns: Vec<ColumnSummary>,
}

impl ColumnSummaries {
    pub fn load(path: &Path) -> Result<Self, CertEvalError> {
        Ok(Self {
            columns: table::read_records(path)?,
        })
    }

    pub fn find(&self, column_name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column_cleaned == column_name)
    }
}

/// A dataset's data dictionary, rewritten in full on every approval.
#[derive(Debug, Clone)]
pub struct DataDictionary {
    path: PathBuf,
    entries: Vec<DictionaryEntry>,
}

impl DataDictionary {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, CertEvalError> {
        let path = path.into();
        let entries = table::read_records(&path)?;
        Ok(Self { path, entries })
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn pending(&self) -> impl Iterator<Item = &DictionaryEntry> {
        self.entries.iter().filter(|e| !e.approved)
    }

    pub fn next_pending(&self) -> Option<&DictionaryEntry> {
        self.pending().next()
    }

    pub fn find(&self, column_name: &str) -> Option<&DictionaryEntry> {
        self.entries.iter().find(|e| e.column_name == column_name)
    }

    /// Records an approved definition for every row carrying `column_name`
    /// and persists the dictionary.
    pub fn approve(&mut self, column_name: &str, definition: &str) -> Result<(), CertEvalError> {
        let mut updated = 0;
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| e.column_name == column_name)
        {
            entry.definition = definition.to_string();
            entry.approved = true;
            updated += 1;
        }

        if updated == 0 {
            return Err(CertEvalError::ColumnNotFound(column_name.to_string()));
        }

        table::write_records(&self.path, DICTIONARY_COLUMNS, &self.entries)?;
        info!(column = column_name, path = %self.path.display(), "definition approved");
        Ok(())
    }
}
