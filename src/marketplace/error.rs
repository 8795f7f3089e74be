use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by marketplace storage.
pub enum StoreError {
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness rule would be violated.
    #[error("conflict: {reason}")]
    Conflict { reason: String },

    /// The seed file could not be read.
    #[error("failed to read seed file '{path}': {source}")]
    SeedRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The seed file is not valid JSON for the expected shape.
    #[error("invalid seed file '{path}': {source}")]
    SeedParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
