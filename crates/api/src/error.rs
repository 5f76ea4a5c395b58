use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use strata_core::StrataError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Error returned by every handler, rendered as `{"message": ...}`.
#[derive(Debug, Clone)]
pub struct RequestError {
    pub inner: ErrorResponse,
    pub status: StatusCode,
}

impl RequestError {
    pub fn new<S: Into<String>>(message: S, status: StatusCode) -> Self {
        RequestError {
            inner: ErrorResponse {
                message: message.into(),
            },
            status,
        }
    }

    pub fn not_found(key: impl std::fmt::Display) -> Self {
        Self::new(format!("{key} not found"), StatusCode::NOT_FOUND)
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST)
    }
}

impl From<StrataError> for RequestError {
    fn from(e: StrataError) -> Self {
        let status = match &e {
            StrataError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            StrataError::Provider(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::warn!(%status, error = %e, "request failed");
        }
        Self::new(e.to_string(), status)
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (self.status, Json(self.inner)).into_response()
    }
}
