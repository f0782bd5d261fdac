use thiserror::Error;

use crate::generation::GenerationError;
use crate::plan::{ExtractionError, ValidationError};
use crate::store::StoreError;

/// Everything a plan generation can fail with.
///
/// None of these are fatal: the previously active plan stays in place and
/// the user gets [`PipelineError::user_message`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no API key is configured")]
    CredentialMissing,

    #[error("a plan is already being generated")]
    Busy,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PipelineError {
    /// Short, actionable text for the end user. Never contains model output.
    pub fn user_message(&self) -> String {
        match self {
            Self::CredentialMissing => {
                "No API key configured. Run `nutriplan key set <KEY>` and try again.".to_string()
            }
            Self::Busy => {
                "A plan is already being generated. Wait for it to finish.".to_string()
            }
            Self::Store(_) => {
                "Local storage could not be read. Check the data directory permissions."
                    .to_string()
            }
            Self::Generation(GenerationError::Transport(_)) => {
                "Could not reach the generation service. Check your connection and try again."
                    .to_string()
            }
            Self::Generation(GenerationError::RemoteRejected { status, message }) => match status
            {
                400 | 401 | 403 => format!(
                    "The generation service rejected the request: {message}. \
                     Check your API key with `nutriplan key set <KEY>`."
                ),
                429 => "The generation service is rate limiting requests. Try again shortly."
                    .to_string(),
                _ => format!("The generation service rejected the request: {message}."),
            },
            Self::Generation(GenerationError::EmptyResponse) => {
                "The generation service returned an empty answer. Try again.".to_string()
            }
            Self::Extraction(_) | Self::Validation(_) => {
                "The generated plan could not be read. Try generating again.".to_string()
            }
        }
    }
}
