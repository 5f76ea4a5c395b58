//! One GET route per keyless general contract method.

use super::cached_value;
use crate::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use strata_engine::ContractCall;

/// Adds a route for every method of every call. Routes must already have
/// passed [`ContractCall::validate`] so registration cannot conflict.
pub fn register(mut router: Router<AppState>, calls: &[ContractCall]) -> Router<AppState> {
    for call in calls {
        for (route, key) in call.routes().into_iter().zip(call.cache_keys()) {
            tracing::debug!(route = %route, key = %key, "registering contract route");
            router = router.route(
                &route,
                get(move |State(state): State<AppState>| async move {
                    cached_value(&state, &key).await
                }),
            );
        }
    }
    router
}
