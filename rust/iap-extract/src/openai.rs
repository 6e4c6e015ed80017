use std::time::Duration;

use async_trait::async_trait;
use iap_core::{ActSet, RawActSet};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::json::extract_json_object;
use crate::prompt::{response_format, system_prompt, user_prompt};
use crate::{ActExtractor, ExtractError, ExtractionRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const MAX_BACKOFF_SECS: f64 = 8.0;
const BASE_BACKOFF_SECS: f64 = 0.75;

/// Connection settings for an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_retries: u32,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        OpenAiConfig {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Delay before retrying after failed attempt number `attempt` (1-based).
pub fn backoff(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16) as i32;
    Duration::from_secs_f64((BASE_BACKOFF_SECS * 2f64.powi(exponent)).min(MAX_BACKOFF_SECS))
}

/// Whether a failed request was refused because of the response format,
/// in which case it is worth repeating without one.
fn rejects_response_format(error: &ExtractError) -> bool {
    match error {
        ExtractError::Api { body, .. } => {
            body.contains("response_format") || body.contains("json_schema")
        }
        _ => false,
    }
}

/// Extracts act sets with a chat completions call and a strict JSON schema.
#[derive(Debug, Clone)]
pub struct OpenAiExtractor {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiExtractor {
    pub fn new(config: OpenAiConfig) -> Result<Self, ExtractError> {
        if config.api_key.trim().is_empty() {
            return Err(ExtractError::MissingApiKey);
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn payload(&self, request: &ExtractionRequest, with_format: bool) -> Value {
        let mut payload = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": system_prompt() },
                { "role": "user", "content": user_prompt(request) },
            ],
        });
        if with_format {
            payload["response_format"] = response_format();
        }
        payload
    }

    async fn post(&self, payload: &Value) -> Result<String, ExtractError> {
        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ExtractError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: Value = response.json().await?;
        data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or(ExtractError::EmptyResponse)
    }

    async fn complete(&self, request: &ExtractionRequest) -> Result<String, ExtractError> {
        match self.post(&self.payload(request, true)).await {
            Err(error) if rejects_response_format(&error) => {
                debug!(%error, "endpoint refused the response format, retrying without it");
                self.post(&self.payload(request, false)).await
            }
            result => result,
        }
    }

    async fn attempt(&self, request: &ExtractionRequest) -> Result<RawActSet, ExtractError> {
        let content = self.complete(request).await?;
        let object = extract_json_object(&content)?;
        let raw: RawActSet = serde_json::from_value(Value::Object(object))?;
        // Reject records the scorer could not ingest, so they are retried.
        ActSet::from_raw(&raw, &request.text)?;
        Ok(raw)
    }
}

#[async_trait]
impl ActExtractor for OpenAiExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<RawActSet, ExtractError> {
        let attempts = self.config.max_retries.max(1);
        let mut attempt = 1;
        loop {
            match self.attempt(request).await {
                Ok(raw) => return Ok(raw),
                Err(error) if attempt >= attempts => {
                    return Err(ExtractError::RetriesExhausted {
                        attempts,
                        last: Box::new(error),
                    });
                }
                Err(error) => {
                    let delay = backoff(attempt);
                    warn!(attempt, ?delay, %error, "act extraction failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
