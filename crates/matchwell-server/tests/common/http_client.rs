//! HTTP client helpers for tests.

use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
    user_id: Option<String>,
}

/// Status code plus parsed JSON body (`Null` when the body is not JSON).
#[derive(Debug)]
pub struct TestResponse {
    pub status: u16,
    pub matchwell_status: String,
    pub body: Value,
}

impl TestResponse {
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            user_id: None,
        }
    }

    /// Sends `x-user-id` on every request.
    pub fn as_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    fn add_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("Content-Type", "application/json");
        match &self.user_id {
            Some(id) => builder.header("x-user-id", id),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<TestResponse, TestClientError> {
        let resp = self.add_headers(builder).send().await?;

        let status = resp.status().as_u16();
        let matchwell_status = resp
            .headers()
            .get("x-matchwell-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let text = resp.text().await?;

        Ok(TestResponse {
            status,
            matchwell_status,
            body: serde_json::from_str(&text).unwrap_or(Value::Null),
        })
    }

    pub async fn suggestions(&self, body: Value) -> Result<TestResponse, TestClientError> {
        self.send(self.client.post(self.url("/search/suggestions")).json(&body))
            .await
    }

    pub async fn create_review(
        &self,
        receiver_id: &str,
        body: Value,
    ) -> Result<TestResponse, TestClientError> {
        self.send(
            self.client
                .post(self.url(&format!("/reviews/{receiver_id}")))
                .json(&body),
        )
        .await
    }

    pub async fn reviews(&self, receiver_id: &str) -> Result<TestResponse, TestClientError> {
        self.send(self.client.get(self.url(&format!("/reviews/{receiver_id}"))))
            .await
    }

    pub async fn vote(&self, body: Value) -> Result<TestResponse, TestClientError> {
        self.send(self.client.post(self.url("/votes")).json(&body))
            .await
    }

    pub async fn votes(&self, query: &str) -> Result<TestResponse, TestClientError> {
        self.send(self.client.get(self.url(&format!("/votes?{query}"))))
            .await
    }

    pub async fn match_jobs(&self, query: &str) -> Result<TestResponse, TestClientError> {
        self.send(self.client.get(self.url(&format!("/match-jobs?{query}"))))
            .await
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentStatus {
    pub http: String,
    pub store: String,
    pub embedder_mode: String,
    pub classifier_mode: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),
}
