use std::time::Duration;

use crate::sance::Stage;

/// Invalid or missing configuration, detected before any work starts.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("invalid archive base URL {0:?}")]
    ArchiveUrl(String),
    #[error("invalid region {0:?}")]
    Region(String),
    #[error("invalid endpoint URL {0:?}")]
    Endpoint(String),
    #[error("configuration field `{0}` was not set")]
    Uninitialized(&'static str),
}

impl From<derive_builder::UninitializedFieldError> for ConfigError {
    fn from(e: derive_builder::UninitializedFieldError) -> Self {
        ConfigError::Uninitialized(e.field_name())
    }
}

/// Failure while acquiring audio for one utterance.
#[derive(thiserror::Error, Debug)]
pub enum AcquireError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("audio encoding error: {0}")]
    Audio(#[from] hound::Error),
    #[error("synthesis provider error: {0}")]
    Provider(String),
    #[error("utterance {0:?} cannot be synthesized")]
    Unsynthesizable(String),
    #[error("{stage} gave up after {attempts} attempts")]
    Exhausted { stage: Stage, attempts: u32 },
}

impl AcquireError {
    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            AcquireError::Http(_)
            | AcquireError::Timeout(_)
            | AcquireError::Io(_)
            | AcquireError::Provider(_) => true,
            AcquireError::Status { status, .. } => {
                matches!(status, 404 | 408 | 429) || *status >= 500
            }
            AcquireError::Audio(_)
            | AcquireError::Unsynthesizable(_)
            | AcquireError::Exhausted { .. } => false,
        }
    }
}
