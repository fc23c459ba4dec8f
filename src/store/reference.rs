use crate::error::CertEvalError;
use crate::models::{DatasetEntry, Mandate, MandateRecord, Product, RelevanceRecord};
use crate::store::table;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// All mandates of every certification, with their ranked relevant columns.
#[derive(Debug, Clone, Default)]
pub struct MandateCatalog {
    mandates: Vec<Mandate>,
}

impl MandateCatalog {
    /// Loads the mandate reference file and joins the dataset's relevance file.
    /// A missing relevance file yields mandates without product attributes.
    pub fn load(mandates_path: &Path, relevance_path: &Path) -> Result<Self, CertEvalError> {
        let relevance: Vec<RelevanceRecord> = if relevance_path.is_file() {
            table::read_records(relevance_path)?
        } else {
            debug!(path = %relevance_path.display(), "no relevance file, prompts carry no attributes");
            Vec::new()
        };

        Self::join(mandates_path, &relevance)
    }

    /// Loads the mandate reference file alone.
    pub fn load_reference(mandates_path: &Path) -> Result<Self, CertEvalError> {
        Self::join(mandates_path, &[])
    }

    fn join(mandates_path: &Path, relevance: &[RelevanceRecord]) -> Result<Self, CertEvalError> {
        let records: Vec<MandateRecord> = table::read_records(mandates_path)?;
        let mandates = records
            .into_iter()
            .map(|record| Mandate::new(record).with_relevance(relevance))
            .collect();

        Ok(Self { mandates })
    }

    pub fn certifications(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for mandate in &self.mandates {
            if !seen.contains(&mandate.certification.as_str()) {
                seen.push(&mandate.certification);
            }
        }
        seen
    }

    /// Mandates of one certification in reference-file order.
    pub fn for_certification(&self, certification: &str) -> Vec<&Mandate> {
        self.mandates
            .iter()
            .filter(|m| m.certification == certification)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.mandates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mandates.is_empty()
    }
}

/// Rows of a product dataset file.
#[derive(Debug, Clone, Default)]
pub struct ProductDataset {
    products: Vec<Product>,
}

impl ProductDataset {
    pub fn load(path: &Path) -> Result<Self, CertEvalError> {
        let (header, rows) = table::read_raw(path)?;
        let columns: Vec<String> = header.iter().map(|h| h.trim().to_string()).collect();

        let products = rows
            .iter()
            .map(|row| {
                let attributes: HashMap<String, String> = columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(str::to_string))
                    .collect();
                Product::from_row(attributes)
            })
            .collect();

        Ok(Self { products })
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name.trim())
    }
}

/// The registry of uploaded datasets (`file_list.csv`). Newest first.
#[derive(Debug, Clone, Default)]
pub struct DatasetCatalog {
    entries: Vec<DatasetEntry>,
}

impl DatasetCatalog {
    pub fn load(path: &Path) -> Result<Self, CertEvalError> {
        Ok(Self {
            entries: table::read_records(path)?,
        })
    }

    pub fn find(&self, dataset: &str) -> Result<&DatasetEntry, CertEvalError> {
        self.entries
            .iter()
            .find(|entry| entry.file_folder == dataset)
            .ok_or_else(|| CertEvalError::DatasetNotFound(dataset.to_string()))
    }
}
