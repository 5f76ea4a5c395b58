//! Scripted chain and flaky cache doubles shared by the engine integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use strata_core::chain::{
    PageRequest, RawCsr, RawDelegationResponse, RawProposal, RawTotalRewards,
    RawUnbondingDelegation, RawValidator, StakingPool, TallyResult,
};
use strata_core::{Dec, StrataError, StrataResult};
use strata_engine::{CacheStore, MemoryStore};
use strata_provider::ChainQuerier;
use tokio::sync::Notify;

type Scripted<T> = Mutex<Result<T, String>>;

fn replay<T: Clone>(slot: &Scripted<T>, op: &str) -> StrataResult<T> {
    slot.lock()
        .unwrap()
        .clone()
        .map_err(|m| StrataError::Provider(format!("{op}: {m}")))
}

/// A chain whose every response is set by the test and can change between cycles.
pub struct ScriptedChain {
    pub height: Scripted<u64>,
    pub pool: Scripted<StakingPool>,
    pub provisions: Scripted<Dec>,
    pub validators: Scripted<Vec<RawValidator>>,
    pub proposals: Scripted<Vec<RawProposal>>,
    pub tallies: Mutex<HashMap<u64, TallyResult>>,
    pub csrs: Scripted<Vec<RawCsr>>,
    pub delegations: Scripted<Vec<RawDelegationResponse>>,
    pub unbonding: Scripted<Vec<RawUnbondingDelegation>>,
    pub rewards: Scripted<RawTotalRewards>,
    pub tally_calls: AtomicUsize,
    pub last_page: Mutex<Option<PageRequest>>,
    /// When set, `latest_block_height` signals `entered` then waits on `release`.
    pub gate: Option<(Arc<Notify>, Arc<Notify>)>,
}

impl Default for ScriptedChain {
    fn default() -> Self {
        Self {
            height: Mutex::new(Ok(100)),
            pool: Mutex::new(Ok(pool("100000000000"))),
            provisions: Mutex::new(Ok("3650000".parse().unwrap())),
            validators: Mutex::new(Ok(vec![validator("cantovaloper1aaa", "1000")])),
            proposals: Mutex::new(Ok(vec![])),
            tallies: Mutex::new(HashMap::new()),
            csrs: Mutex::new(Ok(vec![])),
            delegations: Mutex::new(Ok(vec![])),
            unbonding: Mutex::new(Ok(vec![])),
            rewards: Mutex::new(Ok(RawTotalRewards::default())),
            tally_calls: AtomicUsize::new(0),
            last_page: Mutex::new(None),
            gate: None,
        }
    }
}

impl ScriptedChain {
    pub fn set<T>(slot: &Scripted<T>, value: Result<T, &str>) {
        *slot.lock().unwrap() = value.map_err(str::to_owned);
    }
}

#[async_trait]
impl ChainQuerier for ScriptedChain {
    async fn latest_block_height(&self) -> StrataResult<u64> {
        if let Some((entered, release)) = &self.gate {
            entered.notify_one();
            release.notified().await;
        }
        replay(&self.height, "latest_block_height")
    }

    async fn validators(&self, page: PageRequest) -> StrataResult<Vec<RawValidator>> {
        *self.last_page.lock().unwrap() = Some(page);
        replay(&self.validators, "validators")
    }

    async fn staking_pool(&self) -> StrataResult<StakingPool> {
        replay(&self.pool, "staking_pool")
    }

    async fn annual_provisions(&self) -> StrataResult<Dec> {
        replay(&self.provisions, "annual_provisions")
    }

    async fn proposals(&self, _page: PageRequest) -> StrataResult<Vec<RawProposal>> {
        replay(&self.proposals, "proposals")
    }

    async fn proposal_tally(&self, proposal_id: u64) -> StrataResult<TallyResult> {
        self.tally_calls.fetch_add(1, Ordering::SeqCst);
        self.tallies
            .lock()
            .unwrap()
            .get(&proposal_id)
            .cloned()
            .ok_or_else(|| StrataError::Provider(format!("tally {proposal_id}: not found")))
    }

    async fn csrs(&self, _page: PageRequest) -> StrataResult<Vec<RawCsr>> {
        replay(&self.csrs, "csrs")
    }

    async fn delegator_delegations(
        &self,
        _delegator: &str,
        page: PageRequest,
    ) -> StrataResult<Vec<RawDelegationResponse>> {
        *self.last_page.lock().unwrap() = Some(page);
        replay(&self.delegations, "delegator_delegations")
    }

    async fn delegator_unbonding_delegations(
        &self,
        _delegator: &str,
        _page: PageRequest,
    ) -> StrataResult<Vec<RawUnbondingDelegation>> {
        replay(&self.unbonding, "delegator_unbonding_delegations")
    }

    async fn delegation_total_rewards(&self, _delegator: &str) -> StrataResult<RawTotalRewards> {
        replay(&self.rewards, "delegation_total_rewards")
    }
}

/// Memory store that fails `set`/`hash_set` for chosen keys.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    pub failing: Mutex<HashSet<String>>,
}

impl FlakyStore {
    pub fn fail_on(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_owned());
    }

    fn check(&self, key: &str) -> StrataResult<()> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(StrataError::Cache("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStore for FlakyStore {
    async fn set(&self, key: &str, value: String) -> StrataResult<()> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn hash_set(&self, key: &str, fields: BTreeMap<String, String>) -> StrataResult<()> {
        self.check(key)?;
        self.inner.hash_set(key, fields).await
    }

    async fn get(&self, key: &str) -> StrataResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn get_hash(&self, key: &str) -> StrataResult<Option<BTreeMap<String, String>>> {
        self.inner.get_hash(key).await
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> StrataResult<Option<String>> {
        self.inner.get_hash_field(key, field).await
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn pool(bonded: &str) -> StakingPool {
    serde_json::from_value(json!({"not_bonded_tokens": "0", "bonded_tokens": bonded})).unwrap()
}

pub fn validator(operator: &str, tokens: &str) -> RawValidator {
    serde_json::from_value(json!({
        "operator_address": operator,
        "jailed": false,
        "status": "BOND_STATUS_BONDED",
        "tokens": tokens,
        "description": {"moniker": operator},
        "commission": {
            "commission_rates": {"rate": "0.050000000000000000", "max_rate": "0.2", "max_change_rate": "0.01"},
            "update_time": "2023-06-01T00:00:00Z"
        }
    }))
    .unwrap()
}

pub fn proposal(id: u64, status: &str, final_yes: &str) -> RawProposal {
    serde_json::from_value(json!({
        "proposal_id": id.to_string(),
        "content": {
            "@type": "/cosmos.gov.v1beta1.TextProposal",
            "title": format!("proposal {id}"),
            "description": "text"
        },
        "status": status,
        "final_tally_result": {"yes": final_yes, "abstain": "0", "no": "0", "no_with_veto": "0"},
        "submit_time": "2024-01-01T00:00:00Z",
        "deposit_end_time": "2024-01-03T00:00:00Z",
        "total_deposit": [{"denom": "acanto", "amount": "1000"}],
        "voting_start_time": "2024-01-03T00:00:00Z",
        "voting_end_time": "2024-01-10T00:00:00Z"
    }))
    .unwrap()
}

pub fn tally(yes: &str) -> TallyResult {
    serde_json::from_value(json!({"yes": yes, "abstain": "0", "no": "0", "no_with_veto": "0"})).unwrap()
}

pub fn csr(id: u64, txs: u64) -> RawCsr {
    serde_json::from_value(json!({
        "id": id.to_string(),
        "contracts": ["0x0000000000000000000000000000000000000001"],
        "txs": txs.to_string(),
        "revenue": "12.5"
    }))
    .unwrap()
}
