//! Client for the external text-generation endpoint.
//!
//! One POST per request, bounded timeout, no internal retry. Retry policy,
//! if any, belongs to the caller. The wire contract follows the Gemini
//! `generateContent` shape: the prompt goes out as
//! `{"contents":[{"parts":[{"text": ...}]}]}` and the generated string
//! comes back at `candidates[0].content.parts[0].text`.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::prompt::build_prompt;

/// Errors from requesting a roadmap.
///
/// An empty 2xx response is deliberately distinct from a transport
/// failure: the caller may want to tell the user "try again" rather than
/// "check your network".
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The endpoint credential is missing from configuration.
    #[error("generation API key is not configured (set {})", GenerationConfig::API_KEY_ENV)]
    MissingApiKey,

    /// Network failure, timeout, or a non-success status from the endpoint.
    #[error("generation request failed: {message}")]
    Transport {
        /// Upstream HTTP status, when the endpoint responded at all.
        status: Option<u16>,
        message: String,
    },

    /// The call succeeded but yielded no usable text.
    #[error("generation endpoint returned no text")]
    EmptyResponse,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Explicit configuration for the generation client.
///
/// Passed into the constructor rather than read ambiently, so tests can
/// point the client at a local endpoint.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Full URL of the generation endpoint.
    pub endpoint: String,
    /// API key, sent as the `key` query parameter.
    pub api_key: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl GenerationConfig {
    pub const ENDPOINT_ENV: &str = "TRAILHEAD_GENERATION_URL";
    pub const API_KEY_ENV: &str = "TRAILHEAD_API_KEY";

    pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Build a config with the default timeout.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Build a config from the environment.
    ///
    /// The endpoint falls back to the public default; a missing or blank
    /// API key is a configuration error, not something to proceed past.
    pub fn from_env() -> Result<Self, GenerationError> {
        let endpoint =
            env::var(Self::ENDPOINT_ENV).unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_owned());
        let api_key = env::var(Self::API_KEY_ENV).unwrap_or_default();
        let config = Self::new(endpoint, api_key);
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> Result<(), GenerationError> {
        if self.api_key.trim().is_empty() {
            return Err(GenerationError::MissingApiKey);
        }
        Ok(())
    }
}

/// Interface for roadmap generation backends.
///
/// Object-safe so callers can hold `Box<dyn Generator>` and tests can
/// substitute a canned implementation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Request roadmap text for a topic. `detailed` selects the staged
    /// three-month prompt over the concise overview.
    async fn generate(&self, topic: &str, detailed: bool) -> Result<String, GenerationError>;
}

// Compile-time assertion: Generator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Generator) {}
};

/// Client for a Gemini-style `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GenerationConfig,
}

impl GeminiClient {
    /// Build a client from an explicit config.
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { http, config })
    }

    /// Build a client configured from the environment.
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::new(GenerationConfig::from_env()?)
    }

    async fn request_text(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!(endpoint = %self.config.endpoint, "requesting roadmap generation");

        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Transport {
                status: Some(status.as_u16()),
                message: if message.is_empty() {
                    format!("endpoint returned HTTP {status}")
                } else {
                    message
                },
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        match extract_text(parsed) {
            Some(text) => Ok(text),
            None => Err(GenerationError::EmptyResponse),
        }
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, topic: &str, detailed: bool) -> Result<String, GenerationError> {
        let prompt = build_prompt(topic, detailed);
        self.request_text(&prompt).await
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Pull the generated string out of the response envelope.
///
/// Missing candidates, content, parts, or text all count as "no usable
/// text", as does a blank string.
fn extract_text(response: GenerateResponse) -> Option<String> {
    let text = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()?
        .text?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_from_full_envelope() {
        let response: GenerateResponse = serde_json::from_str(
            r##"{"candidates":[{"content":{"parts":[{"text":"# X"}]}}]}"##,
        )
        .unwrap();
        assert_eq!(extract_text(response), Some("# X".to_string()));
    }

    #[test]
    fn extract_text_handles_missing_pieces() {
        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{}]}"#,
            r#"{"candidates":[{"content":{}}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{}]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#,
        ] {
            let response: GenerateResponse = serde_json::from_str(body).unwrap();
            assert_eq!(extract_text(response), None, "body: {body}");
        }
    }

    #[test]
    fn request_body_wire_shape() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hello" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
    }

    #[test]
    fn blank_api_key_is_a_configuration_error() {
        let err = GeminiClient::new(GenerationConfig::new("http://localhost", "  "))
            .err()
            .map(|e| matches!(e, GenerationError::MissingApiKey));
        assert_eq!(err, Some(true));
    }

    #[test]
    fn config_defaults() {
        let config = GenerationConfig::new("http://localhost/g", "k");
        assert_eq!(config.timeout, GenerationConfig::DEFAULT_TIMEOUT);
        let config = config.with_timeout(Duration::from_millis(50));
        assert_eq!(config.timeout, Duration::from_millis(50));
    }

    #[test]
    fn error_messages_name_the_failure() {
        assert!(GenerationError::MissingApiKey.to_string().contains("TRAILHEAD_API_KEY"));
        let transport = GenerationError::Transport {
            status: Some(503),
            message: "unavailable".to_string(),
        };
        assert!(transport.to_string().contains("unavailable"));
        assert!(GenerationError::EmptyResponse.to_string().contains("no text"));
    }
}
