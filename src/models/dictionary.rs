use serde::{Deserialize, Serialize};

/// Precomputed statistics for one queryable dataset column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column_cleaned: String,
    #[serde(default)]
    pub column_values: String,
    #[serde(default)]
    pub column_unit: Option<String>,
    #[serde(default)]
    pub column_min: Option<String>,
    #[serde(default)]
    pub column_max: Option<String>,
}

impl ColumnSummary {
    /// Unit, ignoring the placeholders the summary tooling writes for "none".
    pub fn unit(&self) -> Option<&str> {
        present(self.column_unit.as_deref())
    }

    /// Min and max, when the column is numeric.
    pub fn range(&self) -> Option<(&str, &str)> {
        match (
            present(self.column_min.as_deref()),
            present(self.column_max.as_deref()),
        ) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "N/A" && !v.eq_ignore_ascii_case("nan"))
}

/// One row of a dataset's data dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    #[serde(rename = "Product Category")]
    pub product_category: String,
    #[serde(rename = "Column Name Raw")]
    pub raw_column_name: String,
    #[serde(rename = "Column Name")]
    pub column_name: String,
    #[serde(rename = "Column Top Values", default)]
    pub top_values: String,
    #[serde(rename = "Column Unit", default)]
    pub unit: String,
    #[serde(rename = "Column Min", default)]
    pub min: String,
    #[serde(rename = "Column Max", default)]
    pub max: String,
    #[serde(rename = "Column Definition", default)]
    pub definition: String,
    #[serde(rename = "Approved", with = "crate::models::title_case_bool")]
    pub approved: bool,
}

/// Row of the dataset catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetEntry {
    pub file_folder: String,
    pub file_name: String,
    #[serde(default)]
    pub file_description: String,
}
