use crate::evaluator::llm_client::{GenerationOutcome, TextGenerator};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

pub const REPLICATE_API_URL: &str = "https://api.replicate.com";

/// meta/llama-2-70b-chat
pub const LLAMA2_70B_CHAT_VERSION: &str =
    "02e509c789964a7ea8736978a43525956ef40397be9033abf9fd2badfe68c9e3";

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    version: &'a str,
    input: PredictionInput<'a>,
}

#[derive(Debug, Serialize)]
struct PredictionInput<'a> {
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    status: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

/// Model hosted on Replicate's predictions API.
pub struct ReplicateClient {
    name: String,
    base_url: String,
    version: String,
    timeout: Duration,
    poll_interval: Duration,
    http: reqwest::Client,
}

impl ReplicateClient {
    pub fn new(name: &str, version: &str, timeout_seconds: u64) -> Self {
        Self {
            name: name.to_string(),
            base_url: REPLICATE_API_URL.to_string(),
            version: version.to_string(),
            timeout: Duration::from_secs(timeout_seconds),
            poll_interval: Duration::from_secs(1),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn run_prediction(&self, prompt: &str, credential: &str) -> GenerationOutcome {
        let request = PredictionRequest {
            version: &self.version,
            input: PredictionInput { prompt },
        };

        let response = self
            .http
            .post(format!("{}/v1/predictions", self.base_url))
            .bearer_auth(credential)
            .header("Prefer", "wait")
            .json(&request)
            .send()
            .await;

        let mut prediction = match self.read_prediction(response).await {
            Ok(prediction) => prediction,
            Err(outcome) => return outcome,
        };

        // "Prefer: wait" may still hand back a running prediction.
        while !is_terminal(&prediction.status) {
            let Some(poll_url) = prediction.urls.as_ref().and_then(|u| u.get.clone()) else {
                return GenerationOutcome::Error(format!(
                    "prediction still '{}' and no poll URL returned",
                    prediction.status
                ));
            };

            tokio::time::sleep(self.poll_interval).await;
            debug!(provider = %self.name, status = %prediction.status, "polling prediction");
            let response = self.http.get(poll_url).bearer_auth(credential).send().await;
            prediction = match self.read_prediction(response).await {
                Ok(prediction) => prediction,
                Err(outcome) => return outcome,
            };
        }

        match prediction.status.as_str() {
            "succeeded" => GenerationOutcome::Text(join_output(prediction.output.as_ref())),
            status => GenerationOutcome::Error(format!(
                "prediction {}: {}",
                status,
                prediction
                    .error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no error detail".to_string())
            )),
        }
    }

    async fn read_prediction(
        &self,
        response: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<Prediction, GenerationOutcome> {
        let response = response.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                GenerationOutcome::ServiceUnavailable
            } else {
                GenerationOutcome::Error(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(GenerationOutcome::RateLimited);
        }
        if status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::BAD_GATEWAY {
            return Err(GenerationOutcome::ServiceUnavailable);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationOutcome::Error(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<Prediction>()
            .await
            .map_err(|e| GenerationOutcome::Error(format!("invalid prediction payload: {}", e)))
    }
}

impl TextGenerator for ReplicateClient {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        credential: &'a str,
    ) -> Pin<Box<dyn Future<Output = GenerationOutcome> + Send + 'a>> {
        Box::pin(async move {
            match tokio::time::timeout(self.timeout, self.run_prediction(prompt, credential)).await
            {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(provider = %self.name, "prediction timed out");
                    GenerationOutcome::ServiceUnavailable
                }
            }
        })
    }

    fn provider_name(&self) -> &str {
        &self.name
    }

    fn get_model_name(&self) -> &str {
        &self.version
    }
}

fn is_terminal(status: &str) -> bool {
    matches!(status, "succeeded" | "failed" | "canceled")
}

// Language models stream their answer as a list of fragments.
fn join_output(output: Option<&Value>) -> String {
    match output {
        Some(Value::Array(parts)) => parts
            .iter()
            .map(|part| match part {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
