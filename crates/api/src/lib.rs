//! Read API over the Strata cache.
//!
//! Handlers never call the chain, with one exception: the per-delegator
//! snapshot, which is fetched live on every request.

pub mod error;
pub mod routes;
pub mod state;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use strata_engine::ContractCall;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

pub use error::{ErrorResponse, RequestError};
pub use state::AppState;

pub fn router(state: AppState, contracts: &[ContractCall]) -> Router {
    let v1 = Router::new()
        .route("/staking/apr", get(routes::staking::apr))
        .route("/staking/validators", get(routes::staking::validators))
        .route("/staking/validators/:address", get(routes::staking::validator))
        .route("/staking/delegations/:address", get(routes::staking::delegations))
        .route("/gov/proposals", get(routes::gov::proposals))
        .route("/gov/proposals/:id", get(routes::gov::proposal))
        .route("/csr", get(routes::csr::csrs))
        .route("/csr/:id", get(routes::csr::csr))
        .route("/block", get(routes::chain::block_number));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    routes::contracts::register(Router::new().nest("/v1", v1), contracts)
        .layer(cors)
        .with_state(state)
}

pub async fn serve(listener: TcpListener, router: Router) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "read API listening");
    }
    axum::serve(listener, router).await
}
