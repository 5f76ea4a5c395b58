//! Merges the three per-delegator responses into one snapshot.

use strata_core::chain::{Coin, RawDelegationResponse, RawTotalRewards, RawUnbondingDelegation};
use strata_core::{DelegationInfo, DelegationSnapshot, RewardsInfo, UnbondingRecord, ValidatorReward};

/// Sums rewards per denom across validators with exact decimal addition.
/// Denoms appear in the order they are first seen.
pub fn total_rewards(rewards: &[ValidatorReward]) -> Vec<Coin> {
    let mut totals: Vec<Coin> = Vec::new();
    for coin in rewards.iter().flat_map(|r| r.reward.iter()) {
        match totals.iter_mut().find(|t| t.denom == coin.denom) {
            Some(t) => t.amount += &coin.amount,
            None => totals.push(coin.clone()),
        }
    }
    totals
}

pub fn build_snapshot(
    delegations: Vec<RawDelegationResponse>,
    unbonding: Vec<RawUnbondingDelegation>,
    rewards: RawTotalRewards,
) -> DelegationSnapshot {
    let delegations = delegations
        .into_iter()
        .map(|d| DelegationInfo {
            delegation: d.delegation,
            balance: d.balance,
        })
        .collect();

    // One record per entry; a pair with several pending unbondings fans out.
    let unbonding_delegations = unbonding
        .into_iter()
        .flat_map(|u| {
            let RawUnbondingDelegation {
                delegator_address,
                validator_address,
                entries,
            } = u;
            entries.into_iter().map(move |e| UnbondingRecord {
                delegator_address: delegator_address.clone(),
                validator_address: validator_address.clone(),
                creation_height: e.creation_height,
                completion_time: e.completion_time,
                initial_balance: e.initial_balance,
                balance: e.balance,
            })
        })
        .collect();

    let per_validator: Vec<ValidatorReward> = rewards
        .rewards
        .into_iter()
        .map(|r| ValidatorReward {
            validator_address: r.validator_address,
            reward: r.reward,
        })
        .collect();
    let total = total_rewards(&per_validator);

    DelegationSnapshot {
        delegations,
        unbonding_delegations,
        rewards: RewardsInfo {
            rewards: per_validator,
            total,
        },
    }
}
