use super::*;
use crate::embedding::{Embedder, EmbeddingError, EmbeddingVector, StubEmbedder};
use crate::marketplace::{FreelancerProfile, Job, JobStatus, UserRole};
use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Embeds text to the vector of the first rule whose keyword it contains.
#[derive(Default)]
struct KeywordEmbedder {
    rules: Vec<(&'static str, Vec<f32>)>,
    delays_ms: Vec<(&'static str, u64)>,
    fail_on: Vec<&'static str>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl KeywordEmbedder {
    fn new(rules: Vec<(&'static str, Vec<f32>)>) -> Self {
        Self {
            rules,
            ..Default::default()
        }
    }

    fn with_delay(mut self, keyword: &'static str, ms: u64) -> Self {
        self.delays_ms.push((keyword, ms));
        self
    }

    fn failing_on(mut self, keyword: &'static str) -> Self {
        self.fail_on.push(keyword);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some((_, ms)) = self.delays_ms.iter().find(|(k, _)| text.contains(k)) {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.iter().any(|k| text.contains(k)) {
            return Err(EmbeddingError::RequestFailed {
                reason: format!("refusing '{text}'"),
            });
        }

        self.rules
            .iter()
            .find(|(k, _)| text.contains(k))
            .map(|(_, v)| EmbeddingVector::new(v.clone()))
            .ok_or_else(|| EmbeddingError::MalformedResponse {
                reason: format!("no rule for '{text}'"),
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Item {
    id: &'static str,
    text: &'static str,
}

impl Candidate for Item {
    fn candidate_id(&self) -> &str {
        self.id
    }

    fn text_fields(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.text)]
    }
}

fn item(id: &'static str, text: &'static str) -> Item {
    Item { id, text }
}

fn scoring_rules() -> Vec<(&'static str, Vec<f32>)> {
    vec![
        ("query", vec![1.0, 0.0]),
        ("high", vec![1.0, 0.0]),
        ("mid", vec![0.8, 0.6]),
        ("low", vec![0.6, 0.8]),
        ("orth", vec![0.0, 1.0]),
    ]
}

fn ranker<E: Embedder>(embedder: E) -> Ranker<E> {
    Ranker::new(embedder, RankerConfig::default())
}

fn ids<T: Candidate>(items: &[T]) -> Vec<&str> {
    items.iter().map(|i| i.candidate_id()).collect()
}

#[tokio::test]
async fn test_rank_orders_by_similarity() {
    let ranker = ranker(KeywordEmbedder::new(scoring_rules()));
    let corpus = vec![
        item("a", "low"),
        item("b", "high"),
        item("c", "orth"),
        item("d", "mid"),
    ];

    let ranked = ranker.rank("query", corpus, 3).await.unwrap();
    assert_eq!(ids(&ranked), vec!["b", "d", "a"]);
}

#[tokio::test]
async fn test_rank_scored_exposes_scores() {
    let ranker = ranker(KeywordEmbedder::new(scoring_rules()));
    let scored = ranker
        .rank_scored("query", vec![item("a", "mid"), item("b", "high")], 5)
        .await
        .unwrap();

    assert_eq!(scored.len(), 2);
    assert!((scored[0].score - 1.0).abs() < 1e-6);
    assert!((scored[1].score - 0.8).abs() < 1e-6);
    assert!(scored[0].score >= scored[1].score);
}

#[tokio::test]
async fn test_result_length_is_min_of_k_and_n() {
    let ranker = ranker(KeywordEmbedder::new(scoring_rules()));
    let corpus = || vec![item("a", "low"), item("b", "high"), item("c", "mid")];

    assert_eq!(ranker.rank("query", corpus(), 0).await.unwrap().len(), 0);
    assert_eq!(ranker.rank("query", corpus(), 2).await.unwrap().len(), 2);
    assert_eq!(ranker.rank("query", corpus(), 3).await.unwrap().len(), 3);
    assert_eq!(ranker.rank("query", corpus(), 10).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_ties_keep_input_order() {
    let ranker = ranker(KeywordEmbedder::new(scoring_rules()));
    let corpus = vec![
        item("first", "mid one"),
        item("top", "high"),
        item("second", "mid two"),
        item("third", "mid three"),
    ];

    let ranked = ranker.rank("query", corpus, 4).await.unwrap();
    assert_eq!(ids(&ranked), vec!["top", "first", "second", "third"]);
}

#[tokio::test]
async fn test_empty_corpus_returns_empty() {
    let embedder = KeywordEmbedder::new(scoring_rules());
    let ranker = ranker(embedder);

    let ranked = ranker.rank::<Item>("query", Vec::new(), 5).await.unwrap();
    assert!(ranked.is_empty());
    assert_eq!(ranker.embedder().calls(), 1);
}

#[tokio::test]
async fn test_ranking_is_deterministic() {
    let ranker = ranker(StubEmbedder::new(128));
    let corpus = || {
        vec![
            item("a", "rust backend engineer"),
            item("b", "react frontend developer"),
            item("c", "data scientist python"),
            item("d", "react native mobile developer"),
        ]
    };

    let first = ranker.rank_scored("react developer", corpus(), 4).await.unwrap();
    let second = ranker.rank_scored("react developer", corpus(), 4).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_query_failure_aborts_before_candidates() {
    let ranker = ranker(KeywordEmbedder::new(scoring_rules()).failing_on("query"));

    let err = ranker
        .rank("query", vec![item("a", "high"), item("b", "mid")], 2)
        .await
        .unwrap_err();

    assert!(matches!(err, RankingError::Embedding(_)));
    assert_eq!(ranker.embedder().calls(), 1);
}

#[tokio::test]
async fn test_fail_fast_on_candidate_failure() {
    let ranker = ranker(KeywordEmbedder::new(scoring_rules()).failing_on("broken"));

    let err = ranker
        .rank(
            "query",
            vec![item("a", "high"), item("b", "broken mid"), item("c", "low")],
            3,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RankingError::Embedding(EmbeddingError::RequestFailed { .. })
    ));
}

#[tokio::test]
async fn test_skip_policy_drops_only_failed_candidate() {
    let ranker = Ranker::new(
        KeywordEmbedder::new(scoring_rules()).failing_on("broken"),
        RankerConfig::default().with_failure_policy(FailurePolicy::SkipFailed),
    );

    let ranked = ranker
        .rank(
            "query",
            vec![item("a", "low"), item("b", "broken high"), item("c", "mid")],
            3,
        )
        .await
        .unwrap();

    assert_eq!(ids(&ranked), vec!["c", "a"]);
}

#[tokio::test]
async fn test_skip_policy_still_aborts_on_query_failure() {
    let ranker = Ranker::new(
        KeywordEmbedder::new(scoring_rules()).failing_on("query"),
        RankerConfig::default().with_failure_policy(FailurePolicy::SkipFailed),
    );

    let result = ranker.rank("query", vec![item("a", "high")], 1).await;
    assert!(matches!(result, Err(RankingError::Embedding(_))));
}

#[tokio::test]
async fn test_pool_cap_limits_embedding_calls() {
    let ranker = Ranker::new(
        KeywordEmbedder::new(scoring_rules()),
        RankerConfig {
            candidate_pool_limit: 3,
            ..RankerConfig::default()
        },
    );
    let corpus = vec![
        item("a", "low"),
        item("b", "mid"),
        item("c", "orth"),
        item("d", "high"),
        item("e", "high"),
    ];

    let ranked = ranker.rank("query", corpus, 5).await.unwrap();

    assert_eq!(ids(&ranked), vec!["b", "a", "c"]);
    assert_eq!(ranker.embedder().calls(), 4);
}

#[tokio::test]
async fn test_concurrent_fanout_preserves_input_order() {
    // Earlier candidates finish last.
    let embedder = KeywordEmbedder::new(scoring_rules())
        .with_delay("one", 60)
        .with_delay("two", 40)
        .with_delay("three", 20)
        .with_delay("four", 0);
    let ranker = Ranker::new(
        embedder,
        RankerConfig {
            max_concurrency: 2,
            ..RankerConfig::default()
        },
    );
    let corpus = vec![
        item("one", "mid one"),
        item("two", "mid two"),
        item("three", "mid three"),
        item("four", "mid four"),
    ];

    let ranked = ranker.rank("query", corpus, 4).await.unwrap();

    assert_eq!(ids(&ranked), vec!["one", "two", "three", "four"]);
    assert!(ranker.embedder().max_in_flight.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_dimension_mismatch_aborts() {
    let ranker = ranker(KeywordEmbedder::new(vec![
        ("query", vec![1.0, 0.0, 0.0]),
        ("short", vec![1.0, 0.0]),
    ]));

    let err = ranker
        .rank("query", vec![item("a", "short")], 1)
        .await
        .unwrap_err();

    match err {
        RankingError::Scoring(crate::scoring::ScoringError::DimensionMismatch { left, right }) => {
            assert_eq!((left, right), (3, 2));
        }
        other => panic!("Expected DimensionMismatch, got {other:?}"),
    }
}

#[test]
fn test_composite_text_joins_with_single_space() {
    struct Multi;
    impl Candidate for Multi {
        fn candidate_id(&self) -> &str {
            "m"
        }
        fn text_fields(&self) -> Vec<Cow<'_, str>> {
            vec![Cow::Borrowed("a"), Cow::Owned("b c".to_string()), Cow::Borrowed("d")]
        }
    }
    assert_eq!(Multi.composite_text(), "a b c d");
}

fn assert_send<T: Send>(_: &T) {}

fn rank_futures_are_send<E: Embedder>(ranker: &Ranker<E>) {
    assert_send(&ranker.rank("query", Vec::<Item>::new(), 1));
    assert_send(&ranker.rank_scored("query", Vec::<Item>::new(), 1));
}

#[test]
fn test_rank_futures_are_send_for_any_embedder() {
    rank_futures_are_send(&ranker(StubEmbedder::default()));
    rank_futures_are_send(&ranker(KeywordEmbedder::new(scoring_rules())));
}

#[tokio::test]
async fn test_rank_in_spawned_task() {
    let ranker = std::sync::Arc::new(ranker(KeywordEmbedder::new(scoring_rules())));
    let task = {
        let ranker = ranker.clone();
        tokio::spawn(async move {
            ranker
                .rank("query", vec![item("a", "low"), item("b", "high")], 2)
                .await
        })
    };

    let ranked = task.await.unwrap().unwrap();
    assert_eq!(ids(&ranked), vec!["b", "a"]);
}

#[tokio::test]
async fn test_overflowing_vectors_rank_with_finite_scores() {
    let ranker = ranker(KeywordEmbedder::new(vec![
        ("query", vec![3e19, 1.0]),
        ("huge", vec![3e19, 2.0]),
        ("inf", vec![f32::INFINITY, 1.0]),
        ("mid", vec![0.8, 0.6]),
    ]));
    let corpus = vec![item("a", "inf"), item("b", "mid"), item("c", "huge")];

    let scored = ranker.rank_scored("query", corpus, 3).await.unwrap();

    let order: Vec<_> = scored.iter().map(|s| s.candidate.id).collect();
    assert_eq!(order, vec!["c", "b", "a"]);
    assert!(scored.iter().all(|s| s.score.is_finite()));
    assert_eq!(scored[2].score, 0.0);
}

fn freelancer() -> FreelancerProfile {
    FreelancerProfile {
        id: "free-1".to_string(),
        name: "Alex".to_string(),
        image: None,
        role: UserRole::Freelancer,
        bio: Some("query".to_string()),
    }
}

fn match_job(id: &str, title: &str, status: JobStatus) -> Job {
    Job {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        budget: 100.0,
        skills: Vec::new(),
        category: String::new(),
        status,
        poster_id: "client-1".to_string(),
        applicant_id: None,
        location: None,
        hourly_rate: None,
        languages: Vec::new(),
    }
}

#[tokio::test]
async fn test_matching_filters_by_min_similarity() {
    let ranker = ranker(KeywordEmbedder::new(scoring_rules()));
    let jobs = vec![
        match_job("j-low", "low", JobStatus::Open),
        match_job("j-high", "high", JobStatus::Open),
        match_job("j-mid", "mid", JobStatus::Open),
        match_job("j-orth", "orth", JobStatus::Open),
    ];

    let matches = find_matching_jobs(&ranker, &freelancer(), jobs, MatchOptions::default())
        .await
        .unwrap();

    let ids: Vec<_> = matches.iter().map(|m| m.job.id.as_str()).collect();
    assert_eq!(ids, vec!["j-high", "j-mid"]);
    assert!((matches[1].similarity_score - 0.8).abs() < 1e-6);

    let value = serde_json::to_value(&matches[0]).unwrap();
    assert!(value.get("similarity_score").is_some());
    assert_eq!(value["job"]["id"], "j-high");
}

#[tokio::test]
async fn test_matching_respects_limit_and_open_status() {
    let ranker = ranker(KeywordEmbedder::new(scoring_rules()));
    let jobs = vec![
        match_job("closed", "high", JobStatus::Completed),
        match_job("j-mid", "mid", JobStatus::Open),
        match_job("j-high", "high", JobStatus::Open),
        match_job("j-low", "low", JobStatus::Open),
    ];

    let matches = find_matching_jobs(
        &ranker,
        &freelancer(),
        jobs,
        MatchOptions {
            limit: 2,
            min_similarity: 0.5,
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let ids: Vec<_> = matches.iter().map(|m| m.job.id.as_str()).collect();
    assert_eq!(ids, vec!["j-high", "j-mid"]);
}

#[tokio::test]
async fn test_matching_rejects_invalid_options() {
    let ranker = ranker(KeywordEmbedder::new(scoring_rules()));

    for options in [
        MatchOptions {
            limit: 0,
            min_similarity: 0.7,
            ..Default::default()
        },
        MatchOptions {
            limit: 51,
            min_similarity: 0.7,
            ..Default::default()
        },
        MatchOptions {
            limit: 10,
            min_similarity: 0.0,
            ..Default::default()
        },
        MatchOptions {
            limit: 10,
            min_similarity: 1.5,
            ..Default::default()
        },
    ] {
        let err = find_matching_jobs(&ranker, &freelancer(), Vec::new(), options)
            .await
            .unwrap_err();
        assert!(matches!(err, RankingError::InvalidOptions { .. }));
    }

    assert_eq!(ranker.embedder().calls(), 0);
}

fn located_job(id: &str, location: &str, rate: Option<f64>, languages: &[&str]) -> Job {
    Job {
        location: Some(location.to_string()),
        hourly_rate: rate,
        languages: languages.iter().map(|l| l.to_string()).collect(),
        ..match_job(id, "high", JobStatus::Open)
    }
}

fn filtered(filters: MatchFilters) -> MatchOptions {
    MatchOptions {
        min_similarity: 0.5,
        filters,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_matching_filters_before_scoring() {
    let jobs = || {
        vec![
            located_job("remote-cheap", "Remote", Some(20.0), &["English"]),
            located_job("remote-mid", "remote", Some(45.0), &["English", "Spanish"]),
            located_job("berlin", "Berlin", Some(60.0), &["German", "English"]),
            located_job("remote-unrated", "Remote", None, &[]),
        ]
    };
    let cases = [
        (
            MatchFilters {
                location: Some("REMOTE".to_string()),
                ..Default::default()
            },
            vec!["remote-cheap", "remote-mid", "remote-unrated"],
        ),
        (
            MatchFilters {
                min_rate: Some(30.0),
                ..Default::default()
            },
            vec!["remote-mid", "berlin"],
        ),
        (
            MatchFilters {
                max_rate: Some(45.0),
                ..Default::default()
            },
            vec!["remote-cheap", "remote-mid"],
        ),
        (
            MatchFilters {
                languages: vec!["english".to_string(), "Spanish".to_string()],
                ..Default::default()
            },
            vec!["remote-mid"],
        ),
        (
            MatchFilters {
                location: Some("Remote".to_string()),
                min_rate: Some(10.0),
                max_rate: Some(30.0),
                languages: vec!["English".to_string()],
            },
            vec!["remote-cheap"],
        ),
    ];

    for (filters, expected) in cases {
        let ranker = ranker(KeywordEmbedder::new(scoring_rules()));
        let matches = find_matching_jobs(&ranker, &freelancer(), jobs(), filtered(filters))
            .await
            .unwrap();

        let ids: Vec<_> = matches.iter().map(|m| m.job.id.as_str()).collect();
        assert_eq!(ids, expected);
        // Query plus surviving jobs only.
        assert_eq!(ranker.embedder().calls(), expected.len() + 1);
    }
}

#[test]
fn test_empty_filters_accept_everything() {
    let filters = MatchFilters::default();
    assert!(filters.is_empty());
    assert!(filters.accepts(&match_job("j", "high", JobStatus::Open)));
    assert!(filters.accepts(&located_job("j", "Mars", None, &[])));
}

#[test]
fn test_invalid_rate_filters_rejected() {
    for filters in [
        MatchFilters {
            min_rate: Some(-1.0),
            ..Default::default()
        },
        MatchFilters {
            max_rate: Some(f64::NAN),
            ..Default::default()
        },
        MatchFilters {
            min_rate: Some(50.0),
            max_rate: Some(20.0),
            ..Default::default()
        },
    ] {
        let err = filtered(filters).validate().unwrap_err();
        assert!(matches!(err, RankingError::InvalidOptions { .. }));
    }
}
