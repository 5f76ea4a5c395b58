//! Process settings. Every flag can also come from the environment or a
//! `.env` file in the working directory.

use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use strata_core::{StrataError, StrataResult};
use strata_engine::{load_contracts, CacheFailurePolicy, CacheStore, EngineConfig, MemoryStore};
use strata_provider::LcdClient;

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Cosmos SDK REST (LCD) endpoint of the node to poll.
    #[arg(long, env = "STRATA_LCD_URL", default_value = "http://127.0.0.1:1317", global = true)]
    pub lcd_url: String,

    /// Per-request timeout for LCD calls, in seconds.
    #[arg(long, env = "STRATA_LCD_TIMEOUT", default_value_t = 30, global = true)]
    pub lcd_timeout: u64,

    /// Seconds between poll cycles.
    #[arg(long, env = "STRATA_QUERY_INTERVAL", default_value_t = 5, global = true)]
    pub query_interval: u64,

    /// `pagination.limit` for every polled list query.
    #[arg(long, env = "STRATA_PAGE_LIMIT", default_value_t = 1000, global = true)]
    pub page_limit: u64,

    /// Address the read API binds to.
    #[arg(long, env = "STRATA_LISTEN", default_value = "0.0.0.0:3000", global = true)]
    pub listen: SocketAddr,

    /// JSON file of general contract call descriptors.
    #[arg(long, env = "STRATA_CONTRACTS_FILE", global = true)]
    pub contracts_file: Option<PathBuf>,

    /// Also poll contract-secured-revenue NFTs.
    #[arg(long, env = "STRATA_CSR_ENABLED", global = true)]
    pub csr_enabled: bool,

    /// `transient` keeps polling after a cache write failure, `fatal` exits.
    #[arg(long, env = "STRATA_CACHE_FAILURE_POLICY", default_value = "transient", global = true)]
    pub cache_failure_policy: CacheFailurePolicy,

    /// Redis URL. Without it the cache lives in process memory.
    #[arg(long, env = "STRATA_REDIS_URL", global = true)]
    pub redis_url: Option<String>,

    /// Bech32 prefix accepted by `/v1/staking/validators/:address`.
    #[arg(long, env = "STRATA_VALIDATOR_PREFIX", default_value = "cantovaloper", global = true)]
    pub validator_prefix: String,
}

impl Settings {
    pub fn engine_config(&self) -> StrataResult<EngineConfig> {
        let contracts = match &self.contracts_file {
            Some(path) => load_contracts(path)?,
            None => Vec::new(),
        };
        let config = EngineConfig {
            interval: Duration::from_secs(self.query_interval),
            page_limit: self.page_limit,
            csr_enabled: self.csr_enabled,
            cache_failure_policy: self.cache_failure_policy,
            contracts,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn lcd_client(&self) -> StrataResult<LcdClient> {
        if self.lcd_timeout == 0 {
            return Err(StrataError::Config("LCD timeout must be > 0".into()));
        }
        LcdClient::connect(&self.lcd_url, Duration::from_secs(self.lcd_timeout))
    }

    pub async fn open_store(&self) -> StrataResult<Arc<dyn CacheStore>> {
        match &self.redis_url {
            #[cfg(feature = "redis")]
            Some(url) => {
                let store = strata_engine::cache::redis::RedisStore::connect(url).await?;
                Ok(Arc::new(store))
            }
            #[cfg(not(feature = "redis"))]
            Some(_) => Err(StrataError::Config(
                "STRATA_REDIS_URL is set but strata was built without the `redis` feature".into(),
            )),
            None => {
                tracing::info!("using in-memory cache store");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        settings: Settings,
    }

    fn parse(args: &[&str]) -> Settings {
        let argv = std::iter::once("strata").chain(args.iter().copied());
        Harness::try_parse_from(argv).unwrap().settings
    }

    #[test]
    fn flags_build_engine_config() {
        let s = parse(&[
            "--query-interval",
            "12",
            "--page-limit",
            "200",
            "--csr-enabled",
            "--cache-failure-policy",
            "fatal",
        ]);
        let config = s.engine_config().unwrap();
        assert_eq!(config.interval, Duration::from_secs(12));
        assert_eq!(config.page_limit, 200);
        assert!(config.csr_enabled);
        assert_eq!(config.cache_failure_policy, CacheFailurePolicy::Fatal);
        assert!(config.contracts.is_empty());
    }

    #[test]
    fn zero_interval_is_a_config_error() {
        let s = parse(&["--query-interval", "0"]);
        assert!(matches!(s.engine_config(), Err(StrataError::Config(_))));
    }

    #[test]
    fn unknown_policy_rejected_at_parse_time() {
        let argv = ["strata", "--cache-failure-policy", "sometimes"];
        assert!(Harness::try_parse_from(argv).is_err());
    }

    #[test]
    fn missing_contracts_file_is_fatal() {
        let s = parse(&["--contracts-file", "/nonexistent/strata-contracts.json"]);
        assert!(matches!(s.engine_config(), Err(StrataError::Config(_))));
    }

    #[test]
    fn bad_lcd_url_rejected() {
        let s = parse(&["--lcd-url", "not a url"]);
        assert!(s.lcd_client().is_err());
    }
}
