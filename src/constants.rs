//! Cross-cutting, shared constants.
//!
//! Defaults that more than one module (or the server crate) needs to agree on live here.
//! Module-local tunables stay next to the code that uses them.

/// HTTP port used when `MATCHWELL_PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Output dimension of `text-embedding-ada-002` and the stub embedder default.
pub const DEFAULT_EMBEDDING_DIM: usize = 1536;

/// Embedding model used when `MATCHWELL_EMBEDDING_MODEL` is not set.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Chat model used by the bias classifier when `MATCHWELL_CLASSIFIER_MODEL` is not set.
pub const DEFAULT_CLASSIFIER_MODEL: &str = "gpt-3.5-turbo";

/// OpenAI-compatible API root.
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Upper bound on how many candidates of one kind are embedded per request.
pub const DEFAULT_CANDIDATE_POOL_LIMIT: usize = 50;

/// Number of suggestions returned per candidate kind.
pub const DEFAULT_SUGGESTION_TOP_K: usize = 5;

/// Concurrent embedding calls issued while ranking one pool.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Per external call timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default entry count of the content-addressed embedding cache (0 disables it).
pub const DEFAULT_EMBEDDING_CACHE_CAPACITY: u64 = 10_000;

/// Job matching: default number of matches returned.
pub const DEFAULT_MATCH_LIMIT: usize = 10;

/// Job matching: hard cap for the `limit` query parameter.
pub const MAX_MATCH_LIMIT: usize = 50;

/// Job matching: default minimum similarity for a job to count as a match.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.7;
