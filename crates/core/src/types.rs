//! Normalized records published to the cache.

use crate::chain::{BondStatus, Coin, Delegation, ProposalStatus, TallyResult, ValidatorDescription};
use crate::decimal::Dec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Polled datasets
// ---------------------------------------------------------------------------

/// One validator, keyed by `operator_address`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorRecord {
    pub operator_address: String,
    pub jailed: bool,
    pub status: BondStatus,
    pub tokens: Dec,
    pub description: ValidatorDescription,
    /// Current commission rate only; the max/change bounds are dropped.
    pub commission: Dec,
}

/// One governance proposal, keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRecord {
    pub proposal_id: u64,
    pub type_url: String,
    pub title: String,
    pub description: String,
    pub status: ProposalStatus,
    /// Live tally while voting, final tally afterwards.
    pub final_vote: TallyResult,
    pub submit_time: DateTime<Utc>,
    pub deposit_end_time: DateTime<Utc>,
    pub total_deposit: Vec<Coin>,
    pub voting_start_time: DateTime<Utc>,
    pub voting_end_time: DateTime<Utc>,
}

/// One contract-secured-revenue NFT, keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrRecord {
    pub id: u64,
    pub contracts: Vec<String>,
    pub txs: u64,
    pub revenue: Dec,
}

// ---------------------------------------------------------------------------
// On-demand delegation snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationInfo {
    pub delegation: Delegation,
    pub balance: Coin,
}

/// One unbonding entry, flattened with its delegator/validator pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingRecord {
    pub delegator_address: String,
    pub validator_address: String,
    pub creation_height: i64,
    pub completion_time: DateTime<Utc>,
    pub initial_balance: Dec,
    pub balance: Dec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorReward {
    pub validator_address: String,
    pub reward: Vec<Coin>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsInfo {
    pub rewards: Vec<ValidatorReward>,
    /// Per-denom sums across all validators, in first-seen denom order.
    pub total: Vec<Coin>,
}

/// Everything the API returns for `/delegations/:address`.
///
/// Every list serializes as `[]` when empty, never `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationSnapshot {
    pub delegations: Vec<DelegationInfo>,
    #[serde(rename = "unbondingDelegations")]
    pub unbonding_delegations: Vec<UnbondingRecord>,
    pub rewards: RewardsInfo,
}

// ---------------------------------------------------------------------------
// Cache envelope
// ---------------------------------------------------------------------------

/// The `{tag, results}` envelope stored under every snapshot key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub tag: String,
    pub results: T,
}

impl<T> Snapshot<T> {
    pub fn new(tag: impl Into<String>, results: T) -> Self {
        Self {
            tag: tag.into(),
            results,
        }
    }
}
