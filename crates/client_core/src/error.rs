use shared::error::ValidationFailure;
use thiserror::Error;

/// Reasons a submit request never reached the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    AlreadyPending,
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

/// Everything that turns an in-flight submission into `Failure`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("complaint endpoint rejected the submission with status {status}")]
    Rejected { status: u16 },
    #[error("complaint endpoint did not answer before the request timeout")]
    Timeout,
    #[error("failed to reach complaint endpoint: {0}")]
    Unreachable(String),
    #[error("failed to read attachment {filename}: {reason}")]
    Attachment { filename: String, reason: String },
    #[error("submission was abandoned before a response arrived")]
    Abandoned,
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return TransportError::Timeout;
        }
        if let Some(status) = value.status() {
            return TransportError::Rejected {
                status: status.as_u16(),
            };
        }
        TransportError::Unreachable(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
