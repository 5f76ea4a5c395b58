//! Remote response shapes.
//!
//! These mirror what the chain's staking, governance, CSR, mint and
//! distribution modules return, already decoded into typed fields.
//! Integers the chain encodes as JSON strings are parsed here.

use crate::decimal::Dec;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

/// Pagination for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u64,
}

impl PageRequest {
    /// Cap used by the poller for every list call.
    pub const POLL_LIMIT: u64 = 1000;
    /// Cap used by the on-demand delegation lookups.
    pub const USER_LIMIT: u64 = 100;

    pub fn with_limit(limit: u64) -> Self {
        Self { limit }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::with_limit(Self::POLL_LIMIT)
    }
}

// ---------------------------------------------------------------------------
// Shared value types
// ---------------------------------------------------------------------------

/// A denom + exact amount pair. Used for deposits, balances and rewards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Dec,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: Dec) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondStatus {
    #[default]
    #[serde(rename = "BOND_STATUS_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "BOND_STATUS_UNBONDED")]
    Unbonded,
    #[serde(rename = "BOND_STATUS_UNBONDING")]
    Unbonding,
    #[serde(rename = "BOND_STATUS_BONDED")]
    Bonded,
}

impl BondStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "BOND_STATUS_UNSPECIFIED",
            Self::Unbonded => "BOND_STATUS_UNBONDED",
            Self::Unbonding => "BOND_STATUS_UNBONDING",
            Self::Bonded => "BOND_STATUS_BONDED",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalStatus {
    #[default]
    #[serde(rename = "PROPOSAL_STATUS_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "PROPOSAL_STATUS_DEPOSIT_PERIOD")]
    DepositPeriod,
    #[serde(rename = "PROPOSAL_STATUS_VOTING_PERIOD")]
    VotingPeriod,
    #[serde(rename = "PROPOSAL_STATUS_PASSED")]
    Passed,
    #[serde(rename = "PROPOSAL_STATUS_REJECTED")]
    Rejected,
    #[serde(rename = "PROPOSAL_STATUS_FAILED")]
    Failed,
}

impl ProposalStatus {
    /// Votes are still being cast, so the embedded tally is stale.
    pub fn is_voting(&self) -> bool {
        matches!(self, Self::VotingPeriod)
    }
}

/// Vote counts for a governance proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResult {
    pub yes: Dec,
    pub abstain: Dec,
    pub no: Dec,
    pub no_with_veto: Dec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorDescription {
    #[serde(default)]
    pub moniker: String,
    #[serde(default)]
    pub identity: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub security_contact: String,
    #[serde(default)]
    pub details: String,
}

// ---------------------------------------------------------------------------
// Staking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommissionRates {
    pub rate: Dec,
    pub max_rate: Dec,
    pub max_change_rate: Dec,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Commission {
    pub commission_rates: CommissionRates,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawValidator {
    pub operator_address: String,
    #[serde(default)]
    pub jailed: bool,
    #[serde(default)]
    pub status: BondStatus,
    pub tokens: Dec,
    #[serde(default)]
    pub description: ValidatorDescription,
    pub commission: Commission,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StakingPool {
    pub not_bonded_tokens: Dec,
    pub bonded_tokens: Dec,
}

// ---------------------------------------------------------------------------
// Governance
// ---------------------------------------------------------------------------

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawProposal {
    #[serde_as(as = "DisplayFromStr")]
    pub proposal_id: u64,
    /// Opaque `Any` payload; carries `@type` plus type-specific fields.
    #[serde(default)]
    pub content: Option<serde_json::Value>,
    #[serde(default)]
    pub status: ProposalStatus,
    #[serde(default)]
    pub final_tally_result: TallyResult,
    pub submit_time: DateTime<Utc>,
    pub deposit_end_time: DateTime<Utc>,
    #[serde(default)]
    pub total_deposit: Vec<Coin>,
    pub voting_start_time: DateTime<Utc>,
    pub voting_end_time: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// CSR
// ---------------------------------------------------------------------------

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCsr {
    #[serde_as(as = "DisplayFromStr")]
    pub id: u64,
    #[serde(default)]
    pub contracts: Vec<String>,
    #[serde_as(as = "DisplayFromStr")]
    pub txs: u64,
    pub revenue: Dec,
}

// ---------------------------------------------------------------------------
// Delegations & rewards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator_address: String,
    pub validator_address: String,
    pub shares: Dec,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawDelegationResponse {
    pub delegation: Delegation,
    pub balance: Coin,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawUnbondingEntry {
    #[serde_as(as = "DisplayFromStr")]
    pub creation_height: i64,
    pub completion_time: DateTime<Utc>,
    pub initial_balance: Dec,
    pub balance: Dec,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawUnbondingDelegation {
    pub delegator_address: String,
    pub validator_address: String,
    #[serde(default)]
    pub entries: Vec<RawUnbondingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawValidatorReward {
    pub validator_address: String,
    #[serde(default)]
    pub reward: Vec<Coin>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawTotalRewards {
    #[serde(default)]
    pub rewards: Vec<RawValidatorReward>,
    /// Chain-side total; kept for reference, the engine recomputes its own.
    #[serde(default)]
    pub total: Vec<Coin>,
}
