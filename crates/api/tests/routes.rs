//! Router tests over an in-memory store and a stub chain.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_api::{router, AppState};
use strata_core::chain::{
    PageRequest, RawCsr, RawDelegationResponse, RawProposal, RawTotalRewards,
    RawUnbondingDelegation, RawValidator, StakingPool, TallyResult,
};
use strata_core::{Dec, StrataError, StrataResult};
use strata_engine::cache::keys;
use strata_engine::contracts::parse_contracts;
use strata_engine::{CacheReader, CacheStore, CacheWriter, MemoryStore};
use strata_provider::ChainQuerier;
use tower::ServiceExt;

/// Only the per-delegator calls are reachable from the API.
struct StubChain;

fn unused<T>() -> StrataResult<T> {
    Err(StrataError::Internal("not used by the read API".into()))
}

#[async_trait]
impl ChainQuerier for StubChain {
    async fn latest_block_height(&self) -> StrataResult<u64> {
        unused()
    }
    async fn validators(&self, _: PageRequest) -> StrataResult<Vec<RawValidator>> {
        unused()
    }
    async fn staking_pool(&self) -> StrataResult<StakingPool> {
        unused()
    }
    async fn annual_provisions(&self) -> StrataResult<Dec> {
        unused()
    }
    async fn proposals(&self, _: PageRequest) -> StrataResult<Vec<RawProposal>> {
        unused()
    }
    async fn proposal_tally(&self, _: u64) -> StrataResult<TallyResult> {
        unused()
    }
    async fn csrs(&self, _: PageRequest) -> StrataResult<Vec<RawCsr>> {
        unused()
    }

    async fn delegator_delegations(
        &self,
        delegator: &str,
        _: PageRequest,
    ) -> StrataResult<Vec<RawDelegationResponse>> {
        if delegator == "canto1down" {
            return Err(StrataError::Provider("GET delegations: HTTP 503".into()));
        }
        Ok(vec![serde_json::from_value(json!({
            "delegation": {"delegator_address": delegator, "validator_address": "cantovaloper1aaa", "shares": "1.5"},
            "balance": {"denom": "acanto", "amount": "1.5"}
        }))
        .unwrap()])
    }

    async fn delegator_unbonding_delegations(
        &self,
        _: &str,
        _: PageRequest,
    ) -> StrataResult<Vec<RawUnbondingDelegation>> {
        Ok(vec![])
    }

    async fn delegation_total_rewards(&self, _: &str) -> StrataResult<RawTotalRewards> {
        Ok(serde_json::from_value(json!({
            "rewards": [{"validator_address": "cantovaloper1aaa", "reward": [{"denom": "acanto", "amount": "0.25"}]}],
            "total": [{"denom": "acanto", "amount": "0.25"}]
        }))
        .unwrap())
    }
}

const CONTRACTS: &str = r#"[
    {"name": "router", "address": "0x1", "methods": ["getUnderlyingPrice(address)"], "args": [["0xabc"]]},
    {"name": "comptroller", "address": "0x2", "methods": ["getAllMarkets()"], "args": [[]], "keys": ["ALL_MARKETS"]}
]"#;

async fn app() -> (Router, CacheWriter) {
    let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
    let writer = CacheWriter::new(store.clone());
    let state = AppState::new(CacheReader::new(store), Arc::new(StubChain));
    let contracts = parse_contracts(CONTRACTS).unwrap();
    (router(state, &contracts), writer)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn missing_key_is_404_naming_the_key() {
    let (app, _) = app().await;
    let (status, body) = get(&app, "/v1/staking/validators").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "ALL_VALIDATORS not found");
}

#[tokio::test]
async fn snapshot_routes_return_the_envelope() {
    let (app, writer) = app().await;
    writer
        .write_snapshot(keys::STAKING_APR, "100", &"0.000036500000000000".parse::<Dec>().unwrap())
        .await
        .unwrap();
    writer.write_value(keys::BLOCK_NUMBER, "100".into()).await.unwrap();

    let (status, body) = get(&app, "/v1/staking/apr").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"tag": "100", "results": "0.000036500000000000"}));

    let (_, block) = get(&app, "/v1/block").await;
    assert_eq!(block, json!(100));
}

#[tokio::test]
async fn validator_lookup_checks_prefix() {
    let (app, writer) = app().await;
    let index = BTreeMap::from([(
        "cantovaloper1aaa".to_string(),
        r#"{"operator_address":"cantovaloper1aaa"}"#.to_string(),
    )]);
    writer.write_index(keys::VALIDATOR_MAP, &index).await.unwrap();

    let (status, body) = get(&app, "/v1/staking/validators/cantovaloper1aaa").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["operator_address"], "cantovaloper1aaa");

    let (status, _) = get(&app, "/v1/staking/validators/canto1aaa").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&app, "/v1/staking/validators/cantovaloper1zzz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "cantovaloper1zzz not found");
}

#[tokio::test]
async fn proposal_id_must_be_numeric() {
    let (app, writer) = app().await;
    writer
        .write_index(keys::PROPOSAL_MAP, &BTreeMap::from([("7".into(), r#"{"proposal_id":7}"#.into())]))
        .await
        .unwrap();

    let (status, body) = get(&app, "/v1/gov/proposals/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["proposal_id"], 7);

    let (status, _) = get(&app, "/v1/gov/proposals/seven").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/v1/csr/-1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delegations_are_fetched_live() {
    let (app, _) = app().await;
    let (status, body) = get(&app, "/v1/staking/delegations/canto1abc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["delegations"][0]["delegation"]["delegator_address"], "canto1abc");
    assert_eq!(body["unbondingDelegations"], json!([]));
    assert_eq!(body["rewards"]["total"][0]["amount"], "0.25");

    let (status, _) = get(&app, "/v1/staking/delegations/canto1down").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn contract_routes_serve_their_keys() {
    let (app, writer) = app().await;
    let results = BTreeMap::from([(
        "router/getUnderlyingPrice/0xabc".to_string(),
        vec![json!("1000000000000000000")],
    )]);
    writer.write_general_batch("55", &results).await.unwrap();

    let (status, body) = get(&app, "/router/getUnderlyingPrice/0xabc").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"tag": "55", "results": ["1000000000000000000"]}));

    // Keyed calls get no route.
    let resp = app
        .clone()
        .oneshot(Request::builder().uri("/comptroller/getAllMarkets").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let (app, _) = app().await;
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/v1/csr")
                .header(header::ORIGIN, "https://app.example.org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
