use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::gateway::MATCHWELL_STATUS_HEADER;

/// Errors a handler can return. `Display` is the client-facing message.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    /// `message` goes to the client; `detail` is only logged.
    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: String,
    },
}

impl GatewayError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: &'static str, detail: impl std::fmt::Display) -> Self {
        Self::Internal {
            message,
            detail: detail.to_string(),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, matchwell_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            GatewayError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            GatewayError::Internal { message, detail } => {
                error!(detail = %detail, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            MATCHWELL_STATUS_HEADER,
            HeaderValue::from_static(matchwell_status),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
