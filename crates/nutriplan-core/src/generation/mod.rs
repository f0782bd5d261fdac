//! The text-generation endpoint adapter.
//!
//! [`TextGenerator`] is the seam the pipeline talks to. [`GeminiClient`] is
//! the HTTP implementation; tests substitute scripted generators.

mod gemini;

pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, GeminiClient};

use async_trait::async_trait;
use thiserror::Error;

/// Sampling temperature sent with every request.
pub const TEMPERATURE: f32 = 0.4;
/// Nucleus sampling bound.
pub const TOP_P: f32 = 0.95;
/// Top-k sampling bound.
pub const TOP_K: u32 = 40;
/// Maximum length of the reply, in tokens.
pub const MAX_OUTPUT_TOKENS: u32 = 8192;

/// How a generation request failed.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The request never produced an HTTP response (DNS, connect, TLS, timeout).
    #[error("request to the generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service rejected the request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },

    #[error("generation service returned no text")]
    EmptyResponse,
}

/// Produces raw model text for a prompt.
///
/// Implementations send exactly one request per call and never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, credential: &str) -> Result<String, GenerationError>;
}

// Compile-time assertion: usable as `dyn TextGenerator`.
const _: () = {
    fn _assert_object_safe(_: &dyn TextGenerator) {}
};
