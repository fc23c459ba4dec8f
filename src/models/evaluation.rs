use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Mandate, Product};

/// Outcome of evaluating a product against one mandate.
///
/// The serialized names are the ones the recommendation log has always
/// used, so older logs stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "True")]
    Compliant,
    #[serde(rename = "False")]
    NonCompliant,
    #[serde(rename = "N/A")]
    Indeterminate,
    /// The provider never produced an answer for this mandate.
    #[serde(rename = "Error")]
    Error,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Compliant => "True",
            Verdict::NonCompliant => "False",
            Verdict::Indeterminate => "N/A",
            Verdict::Error => "Error",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Compliant => "Passed",
            Verdict::NonCompliant => "Failed",
            Verdict::Indeterminate => "More Info Needed",
            Verdict::Error => "Error",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the recommendation log. Never edited once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "id")]
    pub product_id: String,
    #[serde(rename = "name")]
    pub product_name: String,
    pub category_id: String,
    pub category_label: String,
    pub certs: String,
    #[serde(rename = "Certification")]
    pub certification: String,
    #[serde(rename = "Mandate Number")]
    pub mandate_number: String,
    #[serde(rename = "Mandate title")]
    pub mandate_title: String,
    #[serde(rename = "Mandate Description")]
    pub mandate_description: String,
    #[serde(rename = "prompt")]
    pub prompt_text: String,
    #[serde(rename = "response")]
    pub raw_response: String,
    #[serde(rename = "recommendation")]
    pub verdict: Verdict,
    #[serde(rename = "model")]
    pub provider_name: String,
    #[serde(rename = "rec_datetime", with = "crate::models::timestamp")]
    pub timestamp: NaiveDateTime,
}

impl LogEntry {
    pub fn new(
        product: &Product,
        mandate: &Mandate,
        prompt_text: String,
        raw_response: String,
        verdict: Verdict,
        provider_name: &str,
    ) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            category_id: product.category_id.clone(),
            category_label: product.category_label.clone(),
            certs: product.certs.clone(),
            certification: mandate.certification.clone(),
            mandate_number: mandate.number.clone(),
            mandate_title: mandate.title.clone(),
            mandate_description: mandate.description.clone(),
            prompt_text,
            raw_response,
            verdict,
            provider_name: provider_name.to_string(),
            timestamp: chrono::Local::now().naive_local(),
        }
    }
}

/// Aggregated result of one (product, certification, provider) run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(rename = "product")]
    pub product_name: String,
    #[serde(rename = "model")]
    pub provider_name: String,
    #[serde(rename = "cert")]
    pub certification: String,
    #[serde(rename = "mandates passed")]
    pub passed_count: usize,
    #[serde(rename = "mandates failed")]
    pub failed_count: usize,
    #[serde(rename = "mandates na")]
    pub indeterminate_count: usize,
    #[serde(rename = "percentage_passed")]
    pub pass_percentage: u32,
    #[serde(rename = "time")]
    pub elapsed_seconds: u64,
    pub cost: f64,
}

/// Whether a product is worth pursuing for one certification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAssessment {
    pub certification: String,
    pub provider_percentages: Vec<(String, u32)>,
    pub minimum_percentage: Option<u32>,
    pub good_candidate: bool,
}

impl CandidateAssessment {
    pub fn headline(&self) -> &'static str {
        if self.good_candidate {
            "Good Candidate"
        } else {
            "Not a Good Candidate"
        }
    }
}
