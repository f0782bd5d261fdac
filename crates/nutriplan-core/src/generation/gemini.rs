use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{GenerationError, MAX_OUTPUT_TOKENS, TEMPERATURE, TOP_K, TOP_P, TextGenerator};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Client for the public endpoint with default model and timeout.
    pub fn with_defaults() -> Result<Self, GenerationError> {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

fn rejection_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string()
        })
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, credential: &str) -> Result<String, GenerationError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
                top_k: TOP_K,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending generation request");
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, credential)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = rejection_message(status, &text);
            warn!(status = status.as_u16(), %message, "generation request rejected");
            return Err(GenerationError::RemoteRejected {
                status: status.as_u16(),
                message,
            });
        }

        match serde_json::from_str::<GenerateResponse>(&text) {
            Ok(envelope) => envelope.into_text().ok_or(GenerationError::EmptyResponse),
            Err(e) => {
                warn!(error = %e, "undecodable generation response");
                Err(GenerationError::EmptyResponse)
            }
        }
    }
}
