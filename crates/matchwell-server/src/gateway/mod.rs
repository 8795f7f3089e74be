//! HTTP gateway (Axum): search suggestions, job matching, reviews and votes.
//!
//! This module is primarily used by the `matchwell` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use handler::{
    create_review_handler, list_reviews_handler, list_votes_handler, match_jobs_handler,
    suggestions_handler, vote_handler,
};
pub use state::HandlerState;

use matchwell::{Embedder, MarketplaceStore, TextClassifier};

/// Response header summarizing the outcome (`healthy`, `ready`, `invalid_request`, ...).
pub const MATCHWELL_STATUS_HEADER: &str = "x-matchwell-status";
pub const MATCHWELL_STATUS_HEALTHY: &str = "healthy";
pub const MATCHWELL_STATUS_READY: &str = "ready";

pub fn create_router_with_state<E, C, S>(state: HandlerState<E, C, S>) -> Router
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E, C, S>))
        .route("/search/suggestions", post(suggestions_handler::<E, C, S>))
        .route(
            "/reviews/{receiver_id}",
            post(create_review_handler::<E, C, S>).get(list_reviews_handler::<E, C, S>),
        )
        .route(
            "/votes",
            post(vote_handler::<E, C, S>).get(list_votes_handler::<E, C, S>),
        )
        .route("/match-jobs", get(match_jobs_handler::<E, C, S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub store: &'static str,
    pub embedder_mode: &'static str,
    pub classifier_mode: &'static str,
}

fn status_headers(value: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(MATCHWELL_STATUS_HEADER, HeaderValue::from_static(value));
    headers
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    (
        StatusCode::OK,
        status_headers(MATCHWELL_STATUS_HEALTHY),
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Readiness plus which providers are live. Providers are lazy network clients, so
/// there is nothing to wait on once the router exists.
#[tracing::instrument(skip(state))]
pub async fn ready_handler<E, C, S>(State(state): State<HandlerState<E, C, S>>) -> Response
where
    E: Embedder + 'static,
    C: TextClassifier + 'static,
    S: MarketplaceStore + 'static,
{
    let components = ComponentStatus {
        http: MATCHWELL_STATUS_READY,
        store: MATCHWELL_STATUS_READY,
        embedder_mode: state.embedder_mode,
        classifier_mode: state.classifier_mode,
    };

    (
        StatusCode::OK,
        status_headers(MATCHWELL_STATUS_READY),
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}
