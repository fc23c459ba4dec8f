use rig::client::CompletionClient;
use rig::completion::{AssistantContent, CompletionModel};
use rig::providers::{cohere, openai};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

/// What a single provider call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Text(String),
    RateLimited,
    ServiceUnavailable,
    Error(String),
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model_name: String,
    pub timeout_seconds: u64,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmConfig {
    pub fn new(model_name: &str, timeout_seconds: u64) -> Self {
        Self {
            model_name: model_name.to_string(),
            timeout_seconds,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// A text-generation provider. The credential is supplied per call and
/// never retained.
pub trait TextGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        credential: &'a str,
    ) -> Pin<Box<dyn Future<Output = GenerationOutcome> + Send + 'a>>;
    fn provider_name(&self) -> &str;
    fn get_model_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigBackend {
    OpenAI,
    Cohere,
}

/// Provider reached through rig's completion API.
pub struct RigLlmClient {
    name: String,
    backend: RigBackend,
    config: LlmConfig,
}

impl RigLlmClient {
    pub fn new(name: &str, backend: RigBackend, config: LlmConfig) -> Self {
        Self {
            name: name.to_string(),
            backend,
            config,
        }
    }

    async fn make_api_request(&self, prompt: &str, credential: &str) -> Result<String, String> {
        match self.backend {
            RigBackend::OpenAI => {
                let client = openai::Client::new(credential);
                let model = client.completion_model(&self.config.model_name);
                self.send_completion_request(model, prompt).await
            }
            RigBackend::Cohere => {
                let client = cohere::Client::new(credential);
                let model = client.completion_model(&self.config.model_name);
                let text = self.send_completion_request(model, prompt).await?;
                Ok(strip_trailing_comma(&text))
            }
        }
    }

    async fn send_completion_request<M: CompletionModel>(
        &self,
        model: M,
        prompt: &str,
    ) -> Result<String, String> {
        let mut builder = model.completion_request(prompt);

        if let Some(temp) = self.config.temperature {
            builder = builder.temperature(temp as f64);
        }

        if let Some(max_tokens) = self.config.max_tokens {
            builder = builder.max_tokens(max_tokens as u64);
        }

        let response = builder.send().await.map_err(|e| e.to_string())?;

        let mut extracted_text = String::new();
        for content in response.choice.iter() {
            if let AssistantContent::Text(text_content) = content {
                extracted_text.push_str(&text_content.text);
            }
        }

        Ok(extracted_text)
    }
}

impl TextGenerator for RigLlmClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        credential: &'a str,
    ) -> Pin<Box<dyn Future<Output = GenerationOutcome> + Send + 'a>> {
        Box::pin(async move {
            let start_time = std::time::Instant::now();
            let limit = Duration::from_secs(self.config.timeout_seconds);

            let outcome =
                match tokio::time::timeout(limit, self.make_api_request(prompt, credential)).await
                {
                    Ok(Ok(text)) => GenerationOutcome::Text(text),
                    Ok(Err(message)) => normalize_provider_error(&message),
                    Err(_) => {
                        warn!(provider = %self.name, timeout_secs = self.config.timeout_seconds, "provider call timed out");
                        GenerationOutcome::ServiceUnavailable
                    }
                };

            debug!(
                provider = %self.name,
                model = %self.config.model_name,
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "provider call finished"
            );
            outcome
        })
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn get_model_name(&self) -> &str {
        &self.config.model_name
    }
}

const RATE_LIMIT_PHRASES: &[&str] = &[
    "rate limit",
    "rate_limit",
    "too many requests",
    "status code: 429",
    "status: 429",
    "429 too many",
    "you are using a trial key",
];

const UNAVAILABLE_PHRASES: &[&str] = &[
    "service unavailable",
    "serviceunavailable",
    "503 service",
    "status: 503",
    "status code: 503",
    "bad gateway",
    "overloaded",
];

/// Maps a provider's error text onto the gateway's sentinels.
pub fn normalize_provider_error(message: &str) -> GenerationOutcome {
    let lower = message.to_lowercase();

    if RATE_LIMIT_PHRASES.iter().any(|p| lower.contains(p)) {
        GenerationOutcome::RateLimited
    } else if UNAVAILABLE_PHRASES.iter().any(|p| lower.contains(p)) {
        GenerationOutcome::ServiceUnavailable
    } else {
        GenerationOutcome::Error(message.to_string())
    }
}

/// Cohere's generate endpoint tends to end JSON answers with a stray comma
/// (`{"a": "b",}`); drop a comma found in the last three characters.
fn strip_trailing_comma(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let tail_start = chars.len().saturating_sub(3);
    if !chars[tail_start..].contains(&',') {
        return text.to_string();
    }

    let comma = match text.rfind(',') {
        Some(idx) => idx,
        None => return text.to_string(),
    };
    let mut cleaned = text[..comma].to_string();
    if let Some(last) = chars.last() {
        cleaned.push(*last);
    }
    cleaned
}
