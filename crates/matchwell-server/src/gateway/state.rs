use std::sync::Arc;

use matchwell::{Embedder, MarketplaceStore, Ranker, TextClassifier};

/// Shared, cheaply cloneable handler state.
pub struct HandlerState<E, C, S>
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    pub ranker: Arc<Ranker<E>>,

    pub classifier: Arc<C>,

    pub store: Arc<S>,

    /// Suggestions returned per kind.
    pub suggestion_top_k: usize,

    /// Candidates of each kind fetched from the store per suggestion request.
    pub candidate_pool_limit: usize,

    /// Reported by `/ready`.
    pub embedder_mode: &'static str,

    /// Reported by `/ready`.
    pub classifier_mode: &'static str,
}

impl<E, C, S> Clone for HandlerState<E, C, S>
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    fn clone(&self) -> Self {
        Self {
            ranker: Arc::clone(&self.ranker),
            classifier: Arc::clone(&self.classifier),
            store: Arc::clone(&self.store),
            suggestion_top_k: self.suggestion_top_k,
            candidate_pool_limit: self.candidate_pool_limit,
            embedder_mode: self.embedder_mode,
            classifier_mode: self.classifier_mode,
        }
    }
}

impl<E, C, S> HandlerState<E, C, S>
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    pub fn new(ranker: Ranker<E>, classifier: C, store: Arc<S>) -> Self {
        let candidate_pool_limit = ranker.config().candidate_pool_limit;
        Self {
            ranker: Arc::new(ranker),
            classifier: Arc::new(classifier),
            store,
            suggestion_top_k: matchwell::constants::DEFAULT_SUGGESTION_TOP_K,
            candidate_pool_limit,
            embedder_mode: "stub",
            classifier_mode: "canned",
        }
    }

    pub fn with_suggestion_top_k(mut self, top_k: usize) -> Self {
        self.suggestion_top_k = top_k;
        self
    }

    pub fn with_modes(mut self, embedder_mode: &'static str, classifier_mode: &'static str) -> Self {
        self.embedder_mode = embedder_mode;
        self.classifier_mode = classifier_mode;
        self
    }
}
