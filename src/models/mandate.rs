use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Row of the mandate reference file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandateRecord {
    #[serde(rename = "Certification")]
    pub certification: String,
    #[serde(rename = "Mandate Number")]
    pub number: String,
    #[serde(rename = "Mandate title")]
    pub title: String,
    #[serde(rename = "Mandate Description")]
    pub description: String,
}

/// Row of the mandate-to-column relevance file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevanceRecord {
    #[serde(rename = "Certification")]
    pub certification: String,
    #[serde(rename = "Mandate Number")]
    pub number: String,
    #[serde(rename = "Column Name Raw")]
    pub raw_column_name: String,
    #[serde(rename = "Column Name")]
    pub display_name: String,
    /// Empty when the relevance scorer left no rank for the column.
    #[serde(rename = "Column Rank")]
    pub rank: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantColumn {
    pub raw_column_name: String,
    pub display_name: String,
    pub rank: Option<f64>,
}

/// A single certification requirement together with the product columns
/// that matter for it, best-ranked first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mandate {
    pub certification: String,
    pub number: String,
    pub title: String,
    pub description: String,
    pub relevant_columns: Vec<RelevantColumn>,
}

impl Mandate {
    pub fn new(record: MandateRecord) -> Self {
        Self {
            certification: record.certification,
            number: record.number,
            title: record.title,
            description: record.description,
            relevant_columns: Vec::new(),
        }
    }

    /// Attaches the relevance rows that belong to this mandate, ordered by rank.
    /// Rows for other mandates are ignored.
    pub fn with_relevance(mut self, relevance: &[RelevanceRecord]) -> Self {
        let mut columns: Vec<RelevantColumn> = relevance
            .iter()
            .filter(|row| self.matches(&row.certification, &row.number))
            .map(|row| RelevantColumn {
                raw_column_name: row.raw_column_name.clone(),
                display_name: row.display_name.clone(),
                rank: row.rank.filter(|rank| !rank.is_nan()),
            })
            .collect();

        // Unranked columns go last, in file order.
        columns.sort_by(|a, b| match (a.rank, b.rank) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self.relevant_columns = columns;
        self
    }

    pub fn matches(&self, certification: &str, number: &str) -> bool {
        self.certification.trim() == certification.trim()
            && normalize_number(&self.number) == normalize_number(number)
    }

    pub fn label(&self) -> String {
        format!("{} Mandate {}: {}", self.certification, self.number, self.title)
    }
}

// "3" and "3.0" refer to the same mandate once a spreadsheet has touched the file.
fn normalize_number(number: &str) -> String {
    let trimmed = number.trim();
    match trimmed.strip_suffix(".0") {
        Some(integral) if !integral.is_empty() && integral.chars().all(|c| c.is_ascii_digit()) => {
            integral.to_string()
        }
        _ => trimmed.to_string(),
    }
}
