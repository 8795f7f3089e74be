use thiserror::Error;

/// Failures talking to a completion provider.
///
/// The bias classifier absorbs these; they never reach an HTTP caller.
#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("completion request failed: {reason}")]
    CompletionFailed { reason: String },

    #[error("completion response contained no text")]
    EmptyResponse,

    #[error("completion request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl From<genai::Error> for ClassificationError {
    fn from(err: genai::Error) -> Self {
        ClassificationError::CompletionFailed {
            reason: err.to_string(),
        }
    }
}
