use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column holding the certificates a product already carries.
pub const CERTIFICATES_COLUMN: &str = "Sustainability certificates.42513";

/// Suffix of the sibling column that carries a column's unit of measure.
pub const UNIT_SUFFIX: &str = ".unit";

// Pandas writes missing cells as empty, "nan" or "None".
fn is_missing(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("nan") || value.eq_ignore_ascii_case("none")
}

/// One row of a product dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub category_label: String,
    pub certs: String,
    attributes: HashMap<String, String>,
}

impl Product {
    /// Builds a product from a dataset row keyed by header name.
    pub fn from_row(attributes: HashMap<String, String>) -> Self {
        let field = |key: &str| {
            attributes
                .get(key)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        Self {
            id: field("id"),
            name: field("name"),
            category_id: field("category_id"),
            category_label: field("category_label"),
            certs: field(CERTIFICATES_COLUMN),
            attributes,
        }
    }

    /// Raw text of a present, non-missing value. `None` both when the dataset
    /// lacks the column and when the cell is empty.
    pub fn display_value(&self, column: &str) -> Option<&str> {
        self.attributes
            .get(column)
            .map(|raw| raw.trim())
            .filter(|raw| !is_missing(raw))
    }

    pub fn unit(&self, column: &str) -> Option<&str> {
        self.display_value(&format!("{}{}", column, UNIT_SUFFIX))
    }
}
