use futures_util::stream::{self, StreamExt};
use tracing::{debug, warn};

use super::{Candidate, FailurePolicy, RankerConfig, RankingError, ScoredCandidate};
use crate::embedding::Embedder;
use crate::scoring::cosine_similarity;

/// Ranks candidates by embedding similarity to a query.
///
/// The query is embedded once; each candidate's composite text is embedded with at most
/// `max_concurrency` calls in flight. Results come back in input order regardless of
/// completion order, and the final sort is stable, so equal scores keep corpus order.
#[derive(Debug, Clone)]
pub struct Ranker<E> {
    embedder: E,
    config: RankerConfig,
}

impl<E: Embedder> Ranker<E> {
    pub fn new(embedder: E, config: RankerConfig) -> Self {
        Self { embedder, config }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Top `top_k` candidates, most similar first, without scores.
    pub async fn rank<T: Candidate>(
        &self,
        query: &str,
        candidates: Vec<T>,
        top_k: usize,
    ) -> Result<Vec<T>, RankingError> {
        Ok(self
            .rank_scored(query, candidates, top_k)
            .await?
            .into_iter()
            .map(ScoredCandidate::into_candidate)
            .collect())
    }

    /// Top `top_k` candidates with their similarity scores, most similar first.
    pub async fn rank_scored<T: Candidate>(
        &self,
        query: &str,
        candidates: Vec<T>,
        top_k: usize,
    ) -> Result<Vec<ScoredCandidate<T>>, RankingError> {
        let query_vector = self.embedder.embed(query).await?;

        let total = candidates.len();
        let pool: Vec<T> = candidates
            .into_iter()
            .take(self.config.candidate_pool_limit)
            .collect();
        if pool.len() < total {
            debug!(
                total,
                pool = pool.len(),
                "Candidate pool capped; remaining candidates not embedded"
            );
        }

        let texts: Vec<String> = pool.iter().map(T::composite_text).collect();
        let pending: Vec<_> = texts
            .iter()
            .map(|text| self.embedder.embed(text.as_str()))
            .collect();
        let mut embeddings =
            stream::iter(pending).buffered(self.config.max_concurrency.max(1));

        let mut scored = Vec::with_capacity(pool.len());
        for candidate in pool {
            let Some(result) = embeddings.next().await else {
                break;
            };

            let vector = match result {
                Ok(vector) => vector,
                Err(err) => match self.config.failure_policy {
                    FailurePolicy::FailFast => {
                        warn!(
                            candidate_id = candidate.candidate_id(),
                            error = %err,
                            "Candidate embedding failed; aborting ranking"
                        );
                        return Err(err.into());
                    }
                    FailurePolicy::SkipFailed => {
                        warn!(
                            candidate_id = candidate.candidate_id(),
                            error = %err,
                            "Candidate embedding failed; skipping"
                        );
                        continue;
                    }
                },
            };

            let score = cosine_similarity(&query_vector, &vector)?;
            scored.push(ScoredCandidate { candidate, score });
        }

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);

        debug!(
            candidates = total,
            returned = scored.len(),
            top_score = scored.first().map(|s| s.score),
            "Ranking complete"
        );

        Ok(scored)
    }
}
