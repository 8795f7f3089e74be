use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// Vectors of different lengths cannot be compared; this signals mixed embedding models.
    #[error("dimension mismatch: left has {left} components, right has {right}")]
    DimensionMismatch { left: usize, right: usize },
}
