use tracing::{debug, error};

use super::{BiasVerdict, CompletionClient, CompletionParams, TextClassifier};

/// Substrings that mark a model answer as flagging bias.
///
/// Plain substring matching: an answer like "no bias found" also counts as biased.
pub const BIAS_KEYWORDS: [&str; 3] = ["bias", "prejudice", "unfair"];

/// Prompt sent to the model for one review.
pub fn bias_prompt(review: &str) -> String {
    format!(
        "Analyze this review for bias, prejudice, or unfair criticism. Consider factors like \
         racial, gender, or nationality-based bias, personal attacks, or unreasonable \
         expectations. Review: \"{review}\""
    )
}

/// Bias detector over a [`CompletionClient`].
#[derive(Debug)]
pub struct BiasClassifier<C> {
    client: C,
    params: CompletionParams,
}

impl<C: CompletionClient> BiasClassifier<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            params: CompletionParams::default(),
        }
    }

    pub fn with_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Turns a model answer into a verdict.
    pub fn interpret(analysis: &str) -> BiasVerdict {
        let lowered = analysis.to_lowercase();
        let is_biased = BIAS_KEYWORDS.iter().any(|k| lowered.contains(k));

        BiasVerdict {
            is_biased,
            reason: is_biased.then(|| lowered.trim().to_string()),
        }
    }
}

impl<C: CompletionClient> TextClassifier for BiasClassifier<C> {
    async fn classify(&self, text: &str) -> BiasVerdict {
        match self.client.complete(&bias_prompt(text), self.params).await {
            Ok(analysis) => {
                let verdict = Self::interpret(&analysis);
                debug!(is_biased = verdict.is_biased, "Review classified");
                verdict
            }
            Err(err) => {
                error!(error = %err, "Bias detection failed; treating review as unbiased");
                BiasVerdict::unbiased()
            }
        }
    }
}
