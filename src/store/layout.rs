use std::path::{Path, PathBuf};

const CERTIFICATION_DIR: &str = "Product Certification";
const DICTIONARY_DIR: &str = "Data Dictionary Output";

/// File locations of one working directory, resolved from its root.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dataset_catalog(&self) -> PathBuf {
        self.root.join("file_list.csv")
    }

    pub fn mandates(&self) -> PathBuf {
        self.root
            .join(CERTIFICATION_DIR)
            .join("certification_mandates_revised.csv")
    }

    pub fn mandate_relevance(&self, dataset: &str) -> PathBuf {
        self.certification_dir(dataset)
            .join("mandate_column_relevance_full.csv")
    }

    pub fn recommendation_log(&self, dataset: &str) -> PathBuf {
        self.certification_dir(dataset)
            .join("product_mandate_recommendation.csv")
    }

    pub fn recommendation_summary(&self, dataset: &str) -> PathBuf {
        self.certification_dir(dataset)
            .join("product_recommendation_summary.csv")
    }

    pub fn column_summary(&self, dataset: &str) -> PathBuf {
        self.root
            .join(DICTIONARY_DIR)
            .join(dataset)
            .join("columns_summary.csv")
    }

    pub fn data_dictionary(&self, dataset: &str) -> PathBuf {
        self.root
            .join(DICTIONARY_DIR)
            .join(dataset)
            .join(format!("{}_Data_Dictionary.csv", dataset))
    }

    /// Catalog paths are written relative to the workspace root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }

    fn certification_dir(&self, dataset: &str) -> PathBuf {
        self.root.join(CERTIFICATION_DIR).join(dataset)
    }
}

impl Default for WorkspaceLayout {
    fn default() -> Self {
        Self::new(".")
    }
}
