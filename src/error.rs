use reqwest::StatusCode;
use thiserror::Error;

/// Failure while talking to an upstream provider. Content routes never
/// surface these to the browser; they log and render the empty page state.
/// `is_transient` marks the kinds a retry could plausibly clear.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("http {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0} is not configured")]
    MissingKey(&'static str),
}

impl UpstreamError {
    pub fn is_transient(&self) -> bool {
        match self {
            UpstreamError::Transport(_) => true,
            UpstreamError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            UpstreamError::Decode(_) | UpstreamError::MissingKey(_) => false,
        }
    }
}
