use super::{cached_field, cached_value};
use crate::error::RequestError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use strata_core::DelegationSnapshot;
use strata_engine::cache::keys;
use strata_engine::fetch_user_delegations;

pub async fn apr(State(state): State<AppState>) -> Result<Response, RequestError> {
    cached_value(&state, keys::STAKING_APR).await
}

pub async fn validators(State(state): State<AppState>) -> Result<Response, RequestError> {
    cached_value(&state, keys::ALL_VALIDATORS).await
}

pub async fn validator(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Response, RequestError> {
    if !address.starts_with(state.validator_prefix()) {
        return Err(RequestError::bad_request(format!(
            "invalid validator address {address:?}, expected prefix {}",
            state.validator_prefix()
        )));
    }
    cached_field(&state, keys::VALIDATOR_MAP, &address).await
}

/// Not cached: three live queries per request.
pub async fn delegations(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<DelegationSnapshot>, RequestError> {
    let snapshot = fetch_user_delegations(state.querier(), &address).await?;
    Ok(Json(snapshot))
}
