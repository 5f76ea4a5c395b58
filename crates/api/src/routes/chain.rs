use super::cached_value;
use crate::error::RequestError;
use crate::state::AppState;
use axum::extract::State;
use axum::response::Response;
use strata_engine::cache::keys;

pub async fn block_number(State(state): State<AppState>) -> Result<Response, RequestError> {
    cached_value(&state, keys::BLOCK_NUMBER).await
}
