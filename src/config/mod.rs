//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `MATCHWELL_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CANDIDATE_POOL_LIMIT, DEFAULT_CLASSIFIER_MODEL, DEFAULT_EMBEDDING_CACHE_CAPACITY,
    DEFAULT_EMBEDDING_MODEL, DEFAULT_MAX_CONCURRENCY, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_PORT, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SUGGESTION_TOP_K,
};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `MATCHWELL_*` overrides on top of defaults.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// API key for the embedding and completion provider.
    pub openai_api_key: Option<String>,

    /// Root of the OpenAI-compatible REST API.
    pub openai_base_url: String,

    /// Embedding model name.
    pub embedding_model: String,

    /// Chat model used by the bias classifier.
    pub classifier_model: String,

    /// Timeout applied to every external call.
    pub request_timeout: Duration,

    /// Max candidates of one kind embedded per request. Default: `50`.
    pub candidate_pool_limit: usize,

    /// Suggestions returned per kind. Default: `5`.
    pub suggestion_top_k: usize,

    /// Concurrent embedding calls per ranking. Default: `8`.
    pub max_concurrency: usize,

    /// Entries kept in the embedding cache; `0` disables caching.
    pub embedding_cache_capacity: u64,

    /// Use offline stub providers instead of calling the network.
    pub mock_provider: bool,

    /// Optional JSON file used to seed the in-memory marketplace store.
    pub seed_path: Option<PathBuf>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("bind_addr", &self.bind_addr)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openai_base_url", &self.openai_base_url)
            .field("embedding_model", &self.embedding_model)
            .field("classifier_model", &self.classifier_model)
            .field("request_timeout", &self.request_timeout)
            .field("candidate_pool_limit", &self.candidate_pool_limit)
            .field("suggestion_top_k", &self.suggestion_top_k)
            .field("max_concurrency", &self.max_concurrency)
            .field("embedding_cache_capacity", &self.embedding_cache_capacity)
            .field("mock_provider", &self.mock_provider)
            .field("seed_path", &self.seed_path)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            classifier_model: DEFAULT_CLASSIFIER_MODEL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            candidate_pool_limit: DEFAULT_CANDIDATE_POOL_LIMIT,
            suggestion_top_k: DEFAULT_SUGGESTION_TOP_K,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            embedding_cache_capacity: DEFAULT_EMBEDDING_CACHE_CAPACITY,
            mock_provider: false,
            seed_path: None,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "MATCHWELL_PORT";
    const ENV_BIND_ADDR: &'static str = "MATCHWELL_BIND_ADDR";
    const ENV_OPENAI_API_KEY: &'static str = "MATCHWELL_OPENAI_API_KEY";
    const ENV_OPENAI_API_KEY_FALLBACK: &'static str = "OPENAI_API_KEY";
    const ENV_OPENAI_BASE_URL: &'static str = "MATCHWELL_OPENAI_BASE_URL";
    const ENV_EMBEDDING_MODEL: &'static str = "MATCHWELL_EMBEDDING_MODEL";
    const ENV_CLASSIFIER_MODEL: &'static str = "MATCHWELL_CLASSIFIER_MODEL";
    const ENV_REQUEST_TIMEOUT_MS: &'static str = "MATCHWELL_REQUEST_TIMEOUT_MS";
    const ENV_CANDIDATE_POOL_LIMIT: &'static str = "MATCHWELL_CANDIDATE_POOL_LIMIT";
    const ENV_SUGGESTION_TOP_K: &'static str = "MATCHWELL_SUGGESTION_TOP_K";
    const ENV_MAX_CONCURRENCY: &'static str = "MATCHWELL_MAX_CONCURRENCY";
    const ENV_EMBEDDING_CACHE_CAPACITY: &'static str = "MATCHWELL_EMBEDDING_CACHE_CAPACITY";
    const ENV_MOCK_PROVIDER: &'static str = "MATCHWELL_MOCK_PROVIDER";
    const ENV_SEED_PATH: &'static str = "MATCHWELL_SEED_PATH";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let openai_api_key = Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_OPENAI_API_KEY_FALLBACK));
        let openai_base_url =
            Self::parse_string_from_env(Self::ENV_OPENAI_BASE_URL, defaults.openai_base_url);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let classifier_model =
            Self::parse_string_from_env(Self::ENV_CLASSIFIER_MODEL, defaults.classifier_model);
        let request_timeout = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_REQUEST_TIMEOUT_MS,
            DEFAULT_REQUEST_TIMEOUT_MS,
        ));
        let candidate_pool_limit = Self::parse_usize_from_env(
            Self::ENV_CANDIDATE_POOL_LIMIT,
            defaults.candidate_pool_limit,
        )?;
        let suggestion_top_k =
            Self::parse_usize_from_env(Self::ENV_SUGGESTION_TOP_K, defaults.suggestion_top_k)?;
        let max_concurrency =
            Self::parse_usize_from_env(Self::ENV_MAX_CONCURRENCY, defaults.max_concurrency)?;
        let embedding_cache_capacity = Self::parse_u64_from_env(
            Self::ENV_EMBEDDING_CACHE_CAPACITY,
            defaults.embedding_cache_capacity,
        );
        let mock_provider = Self::parse_bool_from_env(Self::ENV_MOCK_PROVIDER, false);
        let seed_path = Self::parse_optional_string_from_env(Self::ENV_SEED_PATH).map(PathBuf::from);

        Ok(Self {
            port,
            bind_addr,
            openai_api_key,
            openai_base_url,
            embedding_model,
            classifier_model,
            request_timeout,
            candidate_pool_limit,
            suggestion_top_k,
            max_concurrency,
            embedding_cache_capacity,
            mock_provider,
            seed_path,
        })
    }

    /// Validates basic invariants.
    ///
    /// A real provider needs an API key; mock mode does not.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mock_provider && self.openai_api_key.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_OPENAI_API_KEY,
            });
        }

        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_REQUEST_TIMEOUT_MS,
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_CONCURRENCY,
                reason: "at least one concurrent call is required".to_string(),
            });
        }

        if self.suggestion_top_k > self.candidate_pool_limit {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_SUGGESTION_TOP_K,
                reason: format!(
                    "top-k ({}) exceeds the candidate pool limit ({})",
                    self.suggestion_top_k, self.candidate_pool_limit
                ),
            });
        }

        if let Some(ref path) = self.seed_path
            && !path.is_file()
        {
            return Err(ConfigError::PathNotFound { path: path.clone() });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::IntParseError {
                    name: var_name,
                    value,
                    source: e,
                }),
            Err(_) => Ok(default),
        }
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &str, default: bool) -> bool {
        match env::var(var_name) {
            Ok(value) => matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
            Err(_) => default,
        }
    }
}
