use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use genai::resolver::{AuthData, AuthResolver};
use genai::{Client, ModelIden};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::ClassificationError;
use crate::config::Config;

/// Sampling settings for a single completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            max_tokens: 100,
            temperature: 0.5,
        }
    }
}

/// Single-turn text completion.
pub trait CompletionClient: Send + Sync {
    fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> impl Future<Output = Result<String, ClassificationError>> + Send;
}

/// Chat completion through `genai`.
#[derive(Clone)]
pub struct GenaiCompletionClient {
    client: Client,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for GenaiCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiCompletionClient")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GenaiCompletionClient {
    /// Uses genai's default credential lookup (provider environment variables).
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            timeout,
        }
    }

    /// Authenticates every request with `api_key`.
    pub fn with_api_key(api_key: String, model: impl Into<String>, timeout: Duration) -> Self {
        let auth_resolver = AuthResolver::from_resolver_fn(
            move |_model_iden: ModelIden| -> Result<Option<AuthData>, genai::resolver::Error> {
                Ok(Some(AuthData::from_single(api_key.clone())))
            },
        );

        Self {
            client: Client::builder().with_auth_resolver(auth_resolver).build(),
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match &config.openai_api_key {
            Some(key) => Self::with_api_key(
                key.clone(),
                config.classifier_model.clone(),
                config.request_timeout,
            ),
            None => Self::new(config.classifier_model.clone(), config.request_timeout),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl CompletionClient for GenaiCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, ClassificationError> {
        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
        let options = ChatOptions::default()
            .with_max_tokens(params.max_tokens)
            .with_temperature(params.temperature);

        debug!(model = %self.model, "Requesting completion");
        let response = tokio::time::timeout(
            self.timeout,
            self.client.exec_chat(&self.model, request, Some(&options)),
        )
        .await
        .map_err(|_| ClassificationError::Timeout {
            timeout_ms: self.timeout.as_millis() as u64,
        })??;

        response
            .first_text()
            .map(str::to_string)
            .ok_or(ClassificationError::EmptyResponse)
    }
}

/// Completion client that returns a fixed answer (or a fixed failure) without a network.
///
/// Records how often it was called and the last prompt it saw.
#[derive(Debug)]
pub struct CannedCompletionClient {
    outcome: Result<String, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl CannedCompletionClient {
    pub fn responding(text: impl Into<String>) -> Self {
        Self::with_outcome(Ok(text.into()))
    }

    #[cfg(any(test, feature = "mock"))]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_outcome(Err(reason.into()))
    }

    fn with_outcome(outcome: Result<String, String>) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    #[cfg(any(test, feature = "mock"))]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[cfg(any(test, feature = "mock"))]
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().clone()
    }
}

impl CompletionClient for CannedCompletionClient {
    async fn complete(
        &self,
        prompt: &str,
        _params: CompletionParams,
    ) -> Result<String, ClassificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock() = Some(prompt.to_string());

        self.outcome
            .clone()
            .map_err(|reason| ClassificationError::CompletionFailed { reason })
    }
}

/// Answer used by the canned client in mock-provider mode.
pub const MOCK_COMPLETION: &str = "The review appears balanced and constructive.";

/// Completion client chosen at startup.
#[derive(Debug)]
pub enum ProviderCompletion {
    Genai(GenaiCompletionClient),
    Canned(CannedCompletionClient),
}

impl ProviderCompletion {
    pub fn from_config(config: &Config) -> Self {
        if config.mock_provider {
            warn!("Bias classifier running with a canned completion (no network calls)");
            return Self::Canned(CannedCompletionClient::responding(MOCK_COMPLETION));
        }

        let client = GenaiCompletionClient::from_config(config);
        info!(model = %client.model(), "Bias classifier configured");
        Self::Genai(client)
    }

    pub fn mode(&self) -> &'static str {
        match self {
            Self::Genai(_) => "genai",
            Self::Canned(_) => "canned",
        }
    }
}

impl CompletionClient for ProviderCompletion {
    async fn complete(
        &self,
        prompt: &str,
        params: CompletionParams,
    ) -> Result<String, ClassificationError> {
        match self {
            Self::Genai(client) => client.complete(prompt, params).await,
            Self::Canned(client) => client.complete(prompt, params).await,
        }
    }
}
