//! Route handlers. Everything except delegations is a cache read.

pub mod chain;
pub mod contracts;
pub mod csr;
pub mod gov;
pub mod staking;

use crate::error::RequestError;
use crate::state::AppState;
use axum::http::header;
use axum::response::{IntoResponse, Response};

/// Wraps an already-serialized JSON document as a response.
pub(crate) fn json_body(body: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

/// Returns the value stored at `key`, or 404.
pub(crate) async fn cached_value(state: &AppState, key: &str) -> Result<Response, RequestError> {
    match state.reader().get_value(key).await? {
        Some(body) => Ok(json_body(body)),
        None => {
            tracing::debug!(key, "cache miss");
            Err(RequestError::not_found(key))
        }
    }
}

/// Returns one record from the hash at `key`, or 404 naming the field.
pub(crate) async fn cached_field(
    state: &AppState,
    key: &str,
    field: &str,
) -> Result<Response, RequestError> {
    match state.reader().get_hash_field(key, field).await? {
        Some(body) => Ok(json_body(body)),
        None => Err(RequestError::not_found(field)),
    }
}

pub(crate) fn parse_id(raw: &str) -> Result<u64, RequestError> {
    raw.parse::<u64>()
        .map_err(|_| RequestError::bad_request(format!("invalid id {raw:?}, expected an unsigned integer")))
}
