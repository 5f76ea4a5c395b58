//! On-demand delegation snapshot for one delegator.
//!
//! Not part of the poll cycle; the read API calls this per request.

use crate::transform::build_snapshot;
use strata_core::chain::PageRequest;
use strata_core::{DelegationSnapshot, StrataError, StrataResult};
use strata_provider::ChainQuerier;

/// Runs the three per-delegator queries concurrently and merges them.
/// Any one failing fails the whole snapshot.
pub async fn fetch_user_delegations(
    querier: &dyn ChainQuerier,
    delegator: &str,
) -> StrataResult<DelegationSnapshot> {
    if delegator.is_empty() || !delegator.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StrataError::InvalidInput(format!(
            "invalid delegator address: {delegator:?}"
        )));
    }

    let page = PageRequest::with_limit(PageRequest::USER_LIMIT);
    let (delegations, unbonding, rewards) = tokio::try_join!(
        async {
            querier
                .delegator_delegations(delegator, page)
                .await
                .map_err(|e| e.context("delegator_delegations"))
        },
        async {
            querier
                .delegator_unbonding_delegations(delegator, page)
                .await
                .map_err(|e| e.context("delegator_unbonding_delegations"))
        },
        async {
            querier
                .delegation_total_rewards(delegator)
                .await
                .map_err(|e| e.context("delegation_total_rewards"))
        },
    )?;

    tracing::debug!(
        delegator,
        delegations = delegations.len(),
        unbonding = unbonding.len(),
        "fetched delegation snapshot"
    );
    Ok(build_snapshot(delegations, unbonding, rewards))
}
