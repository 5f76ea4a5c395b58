use super::{cached_field, cached_value, parse_id};
use crate::error::RequestError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::Response;
use strata_engine::cache::keys;

pub async fn proposals(State(state): State<AppState>) -> Result<Response, RequestError> {
    cached_value(&state, keys::ALL_PROPOSALS).await
}

pub async fn proposal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, RequestError> {
    let id = parse_id(&id)?;
    cached_field(&state, keys::PROPOSAL_MAP, &id.to_string()).await
}
