use crate::domain::error::DomainError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// An HTTP error carrying only caller-safe text. Dependency details stay in
/// the logs.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Map a domain failure, using `context` as the message for anything
    /// that is not the caller's fault.
    pub fn from_domain(err: DomainError, context: &str) -> Self {
        if !err.is_client_error() {
            tracing::error!(error = %err, "{context}");
            return Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: context.to_string(),
            };
        }

        let status = match &err {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        };

        tracing::warn!(error = %err, %status, "{context}");
        let message = match err {
            DomainError::InvalidQuery(m) | DomainError::InvalidInput(m) => m,
            DomainError::NotFound(_) => "Not found".to_string(),
            DomainError::Conflict(_) => "A record with that id or name already exists".to_string(),
            other => other.to_string(),
        };
        Self { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { message: self.message })).into_response()
    }
}
