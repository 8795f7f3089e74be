use thiserror::Error;

/// Failures from an embedding provider.
///
/// None of these are retried; the caller decides whether a failure aborts its work.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {reason}")]
    RequestFailed { reason: String },

    #[error("embedding provider returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("embedding provider rate limit exceeded")]
    RateLimited,

    #[error("malformed embedding response: {reason}")]
    MalformedResponse { reason: String },

    #[error("embedding request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EmbeddingError::MalformedResponse {
                reason: err.to_string(),
            }
        } else {
            EmbeddingError::RequestFailed {
                reason: err.to_string(),
            }
        }
    }
}
