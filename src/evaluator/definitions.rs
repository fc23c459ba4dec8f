use crate::error::CertEvalError;
use crate::evaluator::gateway::{Credentials, LlmGateway};
use crate::evaluator::llm_client::GenerationOutcome;
use crate::evaluator::prompts::PromptTemplate;
use crate::store::ColumnSummaries;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Definition offered for columns absent from the column summary, which the
/// import step only leaves out for the identifier column.
pub const ID_COLUMN_DEFINITION: &str = "ID Column for the file. Definition not applicable.";

const EXTRACTION_FAILED: &str = "Error";

/// One provider's proposed definition for a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionCandidate {
    pub provider_name: String,
    pub definition: String,
}

pub struct DefinitionRequester<'a> {
    gateway: &'a LlmGateway,
}

impl<'a> DefinitionRequester<'a> {
    pub fn new(gateway: &'a LlmGateway) -> Self {
        Self { gateway }
    }

    /// Asks every provider in `providers`, in order, for a definition of
    /// `column`.
    pub async fn request_definition(
        &self,
        column: &str,
        summaries: &ColumnSummaries,
        dataset_description: &str,
        providers: &[String],
        credentials: &Credentials,
    ) -> Result<Vec<DefinitionCandidate>, CertEvalError> {
        let Some(summary) = summaries.find(column) else {
            info!(column, "column has no summary, treating it as the ID column");
            return Ok(providers
                .iter()
                .map(|provider| DefinitionCandidate {
                    provider_name: provider.clone(),
                    definition: ID_COLUMN_DEFINITION.to_string(),
                })
                .collect());
        };

        let prompt = PromptTemplate::build_definition_prompt(summary, dataset_description);
        let mut candidates = Vec::with_capacity(providers.len());

        for provider in providers {
            let credential = credentials.get(provider)?;
            let definition = match self.gateway.generate(&prompt, provider, credential).await? {
                GenerationOutcome::Text(text) => {
                    debug!(provider = %provider, column, response = %text, "definition response");
                    extract_definition(&text)
                }
                other => {
                    warn!(provider = %provider, column, outcome = ?other, "no definition produced");
                    EXTRACTION_FAILED.to_string()
                }
            };
            candidates.push(DefinitionCandidate {
                provider_name: provider.clone(),
                definition,
            });
        }

        Ok(candidates)
    }
}

/// Pulls the definition out of a model's JSON answer: the `definition` key,
/// else the first value, else `"Error"`.
pub fn extract_definition(response: &str) -> String {
    let Some(object) = parse_object(response) else {
        return EXTRACTION_FAILED.to_string();
    };

    let value = object
        .get("definition")
        .or_else(|| object.values().next());

    match value {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => EXTRACTION_FAILED.to_string(),
    }
}

// Models wrap the object in prose or code fences often enough that only the
// outermost braces are trusted.
fn parse_object(response: &str) -> Option<serde_json::Map<String, Value>> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end < start {
        return None;
    }

    match serde_json::from_str::<Value>(&response[start..=end]) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}
