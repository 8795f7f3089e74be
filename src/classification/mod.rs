//! Review bias classification.
//!
//! [`BiasClassifier`] asks a language model about the review and applies a keyword check to
//! its answer. It fails open: any provider failure yields an unbiased verdict.

pub mod bias;
pub mod completion;
pub mod error;


pub use bias::{BIAS_KEYWORDS, BiasClassifier, bias_prompt};
pub use completion::{
    CannedCompletionClient, CompletionClient, CompletionParams, GenaiCompletionClient,
    ProviderCompletion,
};
pub use error::ClassificationError;

use std::future::Future;

use serde::{Deserialize, Serialize};

/// Outcome of classifying a review.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiasVerdict {
    pub is_biased: bool,
    /// Model explanation; `None` unless biased.
    pub reason: Option<String>,
}

impl BiasVerdict {
    pub fn unbiased() -> Self {
        Self::default()
    }
}

/// Classifies free text. Infallible from the caller's side.
pub trait TextClassifier: Send + Sync {
    fn classify(&self, text: &str) -> impl Future<Output = BiasVerdict> + Send;
}
