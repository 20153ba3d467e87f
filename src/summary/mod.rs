//! Natural-language student summaries generated by an Ollama-compatible runtime.
//!
//! The client issues a single non-streaming `POST /api/generate` per request. There is no
//! timeout and no retry; every failure is reported once to the caller, which decides how much
//! of the cause to expose.

use crate::store::Student;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generation endpoint used when `OLLAMA_URL` is not set.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Model used when `SUMMARY_MODEL` is not set.
pub const DEFAULT_SUMMARY_MODEL: &str = "llama3";
/// Instruction line placed in front of the serialized record.
pub const SUMMARY_INSTRUCTION: &str = "generate summary for given student";

/// Errors surfaced while generating a summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// The record could not be serialized into the prompt.
    #[error("Failed to serialize student: {0}")]
    Serialization(#[from] serde_json::Error),
    /// HTTP client could not be built or the runtime could not be reached.
    #[error("Summary provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Runtime answered with a non-success status.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Runtime answered with a body that is not a generation response.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Interface implemented by summary providers.
#[async_trait]
pub trait SummaryClient: Send + Sync {
    /// Produce a free-text summary of a single record.
    async fn generate_summary(&self, student: &Student) -> Result<String, SummaryError>;
}

/// Assemble the prompt: instruction line followed by the record as compact JSON.
pub fn build_prompt(student: &Student) -> Result<String, SummaryError> {
    let record = serde_json::to_string(student)?;
    Ok(format!("{SUMMARY_INSTRUCTION}\n{record}"))
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// [`SummaryClient`] backed by Ollama's `/api/generate`.
pub struct OllamaSummaryClient {
    http: Client,
    base_url: String,
    model: String,
}

impl OllamaSummaryClient {
    /// Build a client for the runtime at `base_url` using `model`.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self, SummaryError> {
        let http = Client::builder()
            .user_agent("student-api/summary")
            .build()
            .map_err(|error| {
                SummaryError::ProviderUnavailable(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SummaryClient for OllamaSummaryClient {
    async fn generate_summary(&self, student: &Student) -> Result<String, SummaryError> {
        let payload = GenerateRequest {
            model: &self.model,
            prompt: build_prompt(student)?,
            stream: false,
        };

        tracing::debug!(id = %student.id, model = %self.model, "Requesting summary");
        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                SummaryError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|error| {
            SummaryError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        Ok(body.response)
    }
}
