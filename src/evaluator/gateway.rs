use crate::error::CertEvalError;
use crate::evaluator::llm_client::{
    GenerationOutcome, LlmConfig, RigBackend, RigLlmClient, TextGenerator,
};
use crate::evaluator::replicate::{ReplicateClient, LLAMA2_70B_CHAT_VERSION};
use crate::evaluator::retry::RetryPolicy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

pub const COHERE: &str = "Cohere";
pub const GPT_35: &str = "GPT-3.5";
pub const LLAMA2: &str = "LLaMA2";

/// Provider names in registration order of the default registry.
pub const DEFAULT_PROVIDERS: &[&str] = &[COHERE, LLAMA2, GPT_35];

/// Provider name to client.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn TextGenerator>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cohere `command`, Replicate-hosted LLaMA 2 70B chat and OpenAI
    /// `gpt-3.5-turbo`.
    pub fn with_defaults(timeout_seconds: u64) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RigLlmClient::new(
            COHERE,
            RigBackend::Cohere,
            LlmConfig::new("command", timeout_seconds)
                .with_max_tokens(1024)
                .with_temperature(0.0),
        )));
        registry.register(Arc::new(ReplicateClient::new(
            LLAMA2,
            LLAMA2_70B_CHAT_VERSION,
            timeout_seconds,
        )));
        registry.register(Arc::new(RigLlmClient::new(
            GPT_35,
            RigBackend::OpenAI,
            LlmConfig::new("gpt-3.5-turbo", timeout_seconds),
        )));
        registry
    }

    /// Adds a provider, replacing any registered under the same name.
    pub fn register(&mut self, provider: Arc<dyn TextGenerator>) {
        self.providers
            .retain(|p| p.provider_name() != provider.provider_name());
        self.providers.push(provider);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn TextGenerator>> {
        self.providers
            .iter()
            .find(|p| p.provider_name() == name)
            .cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.iter().any(|p| p.provider_name() == name)
    }
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

/// Provider credentials for one session. Never persisted or logged.
#[derive(Clone, Default)]
pub struct Credentials {
    secrets: HashMap<String, String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: &str, secret: impl Into<String>) -> Self {
        self.insert(provider, secret);
        self
    }

    pub fn insert(&mut self, provider: &str, secret: impl Into<String>) {
        let secret = secret.into();
        if !secret.trim().is_empty() {
            self.secrets.insert(provider.to_string(), secret);
        }
    }

    pub fn get(&self, provider: &str) -> Result<&str, CertEvalError> {
        self.secrets
            .get(provider)
            .map(String::as_str)
            .ok_or_else(|| CertEvalError::MissingCredential {
                provider: provider.to_string(),
            })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut providers: Vec<&String> = self.secrets.keys().collect();
        providers.sort();
        f.debug_struct("Credentials")
            .field("providers", &providers)
            .finish_non_exhaustive()
    }
}

/// Uniform entry point to every provider, applying the retry policy.
#[derive(Debug, Clone)]
pub struct LlmGateway {
    registry: ProviderRegistry,
    policy: RetryPolicy,
}

impl LlmGateway {
    pub fn new(registry: ProviderRegistry, policy: RetryPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Sends `prompt` to `provider`. Transient sentinels are retried after the
    /// policy's cooldown until attempts run out; the last outcome is returned.
    pub async fn generate(
        &self,
        prompt: &str,
        provider: &str,
        credential: &str,
    ) -> Result<GenerationOutcome, CertEvalError> {
        let client = self
            .registry
            .get(provider)
            .ok_or_else(|| CertEvalError::UnknownProvider(provider.to_string()))?;

        let mut attempt = 1;
        let mut outcome = client.generate(prompt, credential).await;

        while let Some(cooldown) = self.policy.cooldown_for(&outcome) {
            if !self.policy.allows_attempt(attempt + 1) {
                warn!(provider, attempts = attempt, outcome = ?outcome, "retries exhausted");
                break;
            }

            info!(
                provider,
                outcome = ?outcome,
                cooldown_secs = cooldown.as_secs(),
                "transient provider outcome, waiting before retry"
            );
            tokio::time::sleep(cooldown).await;

            attempt += 1;
            outcome = client.generate(prompt, credential).await;
        }

        Ok(outcome)
    }
}
