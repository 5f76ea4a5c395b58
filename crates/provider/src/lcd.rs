//! REST (LCD) client for a Cosmos SDK node, backed by reqwest.

use crate::ChainQuerier;
use async_trait::async_trait;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use std::time::Duration;
use strata_core::chain::{
    PageRequest, RawCsr, RawDelegationResponse, RawProposal, RawTotalRewards,
    RawUnbondingDelegation, RawValidator, StakingPool, TallyResult,
};
use strata_core::{Dec, StrataError, StrataResult};
use url::Url;

/// Default per-request timeout. A hung node otherwise stalls a whole dataset.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches chain state from a node's LCD endpoint.
///
/// ```ignore
/// let client = LcdClient::connect("http://localhost:1317", DEFAULT_TIMEOUT)?;
/// let validators = client.validators(PageRequest::default()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct LcdClient {
    client: reqwest::Client,
    base: Url,
}

impl LcdClient {
    pub fn connect(lcd_url: &str, timeout: Duration) -> StrataResult<Self> {
        if lcd_url.is_empty() {
            return Err(StrataError::Config("LCD URL must not be empty".into()));
        }

        let mut base = Url::parse(lcd_url)
            .map_err(|e| StrataError::Config(format!("invalid LCD URL {lcd_url}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(StrataError::Config(format!(
                "LCD URL must be http(s): {lcd_url}"
            )));
        }
        // `Url::join` drops the last segment unless the base ends with '/'.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StrataError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::info!(lcd_url, "lcd client ready");
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> StrataResult<T> {
        let url = self
            .base
            .join(path)
            .map_err(|e| StrataError::InvalidInput(format!("bad path {path}: {e}")))?;

        tracing::debug!(%url, "lcd request");

        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| StrataError::Provider(format!("GET {path}: {e}")))?;

        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| StrataError::Provider(format!("GET {path}: reading body: {e}")))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            let snippet: String = text.chars().take(200).collect();
            return Err(StrataError::Provider(format!(
                "GET {path}: HTTP {status}: {snippet}"
            )));
        }

        serde_json::from_slice(&body)
            .map_err(|e| StrataError::Provider(format!("GET {path}: decode: {e}")))
    }
}

fn limit(page: PageRequest) -> [(&'static str, String); 1] {
    [("pagination.limit", page.limit.to_string())]
}

/// Rejects anything that is not a bare bech32 string before it reaches a URL path.
fn address_segment(address: &str) -> StrataResult<&str> {
    if address.is_empty() || !address.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StrataError::InvalidInput(format!(
            "invalid address: {address:?}"
        )));
    }
    Ok(address)
}

/// The mint module's gateway returns `annual_provisions` either as a decimal
/// string or as the base64 of one, depending on the SDK version.
pub fn decode_provisions(raw: &str) -> StrataResult<Dec> {
    if let Ok(d) = raw.parse::<Dec>() {
        return Ok(d);
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(raw.trim())
        .map_err(|e| StrataError::Provider(format!("annual provisions {raw:?}: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| StrataError::Provider(format!("annual provisions not utf-8: {e}")))?;
    text.parse::<Dec>()
        .map_err(|e| StrataError::Provider(format!("annual provisions: {e}")))
}

// ---------------------------------------------------------------------------
// Response wrappers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ValidatorsResponse {
    #[serde(default)]
    validators: Vec<RawValidator>,
}

#[derive(Deserialize)]
struct PoolResponse {
    pool: StakingPool,
}

#[derive(Deserialize)]
struct AnnualProvisionsResponse {
    annual_provisions: String,
}

#[derive(Deserialize)]
struct ProposalsResponse {
    #[serde(default)]
    proposals: Vec<RawProposal>,
}

#[derive(Deserialize)]
struct TallyResponse {
    tally: TallyResult,
}

#[derive(Deserialize)]
struct CsrsResponse {
    #[serde(default)]
    csrs: Vec<RawCsr>,
}

#[derive(Deserialize)]
struct DelegationsResponse {
    #[serde(default)]
    delegation_responses: Vec<RawDelegationResponse>,
}

#[derive(Deserialize)]
struct UnbondingResponse {
    #[serde(default)]
    unbonding_responses: Vec<RawUnbondingDelegation>,
}

#[serde_as]
#[derive(Deserialize)]
struct Header {
    #[serde_as(as = "DisplayFromStr")]
    height: u64,
}

#[derive(Deserialize)]
struct Block {
    header: Header,
}

#[derive(Deserialize)]
struct LatestBlockResponse {
    block: Option<Block>,
    /// Newer SDKs populate this instead of `block`.
    sdk_block: Option<Block>,
}

#[async_trait]
impl ChainQuerier for LcdClient {
    async fn latest_block_height(&self) -> StrataResult<u64> {
        let resp: LatestBlockResponse = self
            .get("cosmos/base/tendermint/v1beta1/blocks/latest", &[])
            .await?;
        resp.sdk_block
            .or(resp.block)
            .map(|b| b.header.height)
            .ok_or_else(|| StrataError::Provider("latest block response has no header".into()))
    }

    async fn validators(&self, page: PageRequest) -> StrataResult<Vec<RawValidator>> {
        let resp: ValidatorsResponse = self
            .get("cosmos/staking/v1beta1/validators", &limit(page))
            .await?;
        tracing::debug!(count = resp.validators.len(), "fetched validators");
        Ok(resp.validators)
    }

    async fn staking_pool(&self) -> StrataResult<StakingPool> {
        let resp: PoolResponse = self.get("cosmos/staking/v1beta1/pool", &[]).await?;
        Ok(resp.pool)
    }

    async fn annual_provisions(&self) -> StrataResult<Dec> {
        let resp: AnnualProvisionsResponse = self
            .get("cosmos/mint/v1beta1/annual_provisions", &[])
            .await?;
        decode_provisions(&resp.annual_provisions)
    }

    async fn proposals(&self, page: PageRequest) -> StrataResult<Vec<RawProposal>> {
        let resp: ProposalsResponse = self
            .get("cosmos/gov/v1beta1/proposals", &limit(page))
            .await?;
        tracing::debug!(count = resp.proposals.len(), "fetched proposals");
        Ok(resp.proposals)
    }

    async fn proposal_tally(&self, proposal_id: u64) -> StrataResult<TallyResult> {
        let path = format!("cosmos/gov/v1beta1/proposals/{proposal_id}/tally");
        let resp: TallyResponse = self.get(&path, &[]).await?;
        Ok(resp.tally)
    }

    async fn csrs(&self, page: PageRequest) -> StrataResult<Vec<RawCsr>> {
        let resp: CsrsResponse = self.get("canto/csr/v1/csrs", &limit(page)).await?;
        Ok(resp.csrs)
    }

    async fn delegator_delegations(
        &self,
        delegator: &str,
        page: PageRequest,
    ) -> StrataResult<Vec<RawDelegationResponse>> {
        let path = format!(
            "cosmos/staking/v1beta1/delegations/{}",
            address_segment(delegator)?
        );
        let resp: DelegationsResponse = self.get(&path, &limit(page)).await?;
        Ok(resp.delegation_responses)
    }

    async fn delegator_unbonding_delegations(
        &self,
        delegator: &str,
        page: PageRequest,
    ) -> StrataResult<Vec<RawUnbondingDelegation>> {
        let path = format!(
            "cosmos/staking/v1beta1/delegators/{}/unbonding_delegations",
            address_segment(delegator)?
        );
        let resp: UnbondingResponse = self.get(&path, &limit(page)).await?;
        Ok(resp.unbonding_responses)
    }

    async fn delegation_total_rewards(&self, delegator: &str) -> StrataResult<RawTotalRewards> {
        let path = format!(
            "cosmos/distribution/v1beta1/delegators/{}/rewards",
            address_segment(delegator)?
        );
        self.get(&path, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_rejects_bad_urls() {
        assert!(LcdClient::connect("", DEFAULT_TIMEOUT).is_err());
        assert!(LcdClient::connect("not a url", DEFAULT_TIMEOUT).is_err());
        assert!(LcdClient::connect("ftp://node:1317", DEFAULT_TIMEOUT).is_err());
    }

    #[test]
    fn connect_normalizes_trailing_slash() {
        let c = LcdClient::connect("http://node:1317/lcd", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(c.base_url().as_str(), "http://node:1317/lcd/");
        let joined = c.base_url().join("cosmos/staking/v1beta1/pool").unwrap();
        assert_eq!(joined.as_str(), "http://node:1317/lcd/cosmos/staking/v1beta1/pool");
    }

    #[test]
    fn provisions_plain_or_base64() {
        assert_eq!(decode_provisions("1234.5").unwrap().to_string(), "1234.5");
        // base64("1234.5")
        assert_eq!(decode_provisions("MTIzNC41").unwrap().to_string(), "1234.5");
        assert!(decode_provisions("!!!").is_err());
    }

    #[test]
    fn address_segment_rejects_path_tricks() {
        assert!(address_segment("canto1qqq").is_ok());
        assert!(address_segment("../pool").is_err());
        assert!(address_segment("").is_err());
    }
}
