//! Remote query abstraction for Strata.
//!
//! [`ChainQuerier`] is the seam between the polling engine and the chain:
//! one method per remote operation, each independently failable. The
//! engine only ever talks to this trait, so tests swap in scripted fakes.

pub mod lcd;

use async_trait::async_trait;
use strata_core::chain::{
    PageRequest, RawCsr, RawDelegationResponse, RawProposal, RawTotalRewards,
    RawUnbondingDelegation, RawValidator, StakingPool, TallyResult,
};
use strata_core::{Dec, StrataResult};

pub use lcd::LcdClient;

/// Typed access to the chain modules the engine polls.
#[async_trait]
pub trait ChainQuerier: Send + Sync {
    /// Height of the most recent committed block.
    async fn latest_block_height(&self) -> StrataResult<u64>;

    // -- staking --
    async fn validators(&self, page: PageRequest) -> StrataResult<Vec<RawValidator>>;
    async fn staking_pool(&self) -> StrataResult<StakingPool>;

    // -- mint --
    async fn annual_provisions(&self) -> StrataResult<Dec>;

    // -- governance --
    async fn proposals(&self, page: PageRequest) -> StrataResult<Vec<RawProposal>>;
    async fn proposal_tally(&self, proposal_id: u64) -> StrataResult<TallyResult>;

    // -- csr --
    async fn csrs(&self, page: PageRequest) -> StrataResult<Vec<RawCsr>>;

    // -- per-delegator --
    async fn delegator_delegations(
        &self,
        delegator: &str,
        page: PageRequest,
    ) -> StrataResult<Vec<RawDelegationResponse>>;
    async fn delegator_unbonding_delegations(
        &self,
        delegator: &str,
        page: PageRequest,
    ) -> StrataResult<Vec<RawUnbondingDelegation>>;
    async fn delegation_total_rewards(&self, delegator: &str) -> StrataResult<RawTotalRewards>;
}
