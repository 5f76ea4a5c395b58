//! Fixed-interval poll scheduler.
//!
//! One cycle refreshes every dataset in a fixed order: staking APR,
//! validators, proposals, then CSRs. Each dataset is fetched, transformed
//! and written on its own; a failure abandons that dataset for the cycle and
//! the scheduler moves on to the next one. Only cache failures under
//! [`CacheFailurePolicy::Fatal`] stop the loop.

use crate::cache::{keys, CacheWriter, DatasetKeys};
use crate::contracts::ContractCall;
use crate::transform::{self, governance};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use strata_core::chain::PageRequest;
use strata_core::{StrataError, StrataResult};
use strata_provider::ChainQuerier;
use tokio::time::MissedTickBehavior;

/// Polling interval used when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    StakingApr,
    Validators,
    Proposals,
    Csrs,
}

impl Dataset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StakingApr => "staking_apr",
            Self::Validators => "validators",
            Self::Proposals => "proposals",
            Self::Csrs => "csrs",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when a cache write fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheFailurePolicy {
    /// Log, abandon the dataset for this cycle, keep polling.
    #[default]
    Transient,
    /// Return the error from the scheduler and stop.
    Fatal,
}

impl FromStr for CacheFailurePolicy {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transient" => Ok(Self::Transient),
            "fatal" => Ok(Self::Fatal),
            other => Err(StrataError::Config(format!(
                "unknown cache failure policy {other:?}, expected \"transient\" or \"fatal\""
            ))),
        }
    }
}

impl fmt::Display for CacheFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Transient => "transient",
            Self::Fatal => "fatal",
        })
    }
}

/// Engine settings, built once at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub interval: Duration,
    pub page_limit: u64,
    pub csr_enabled: bool,
    pub cache_failure_policy: CacheFailurePolicy,
    pub contracts: Vec<ContractCall>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            page_limit: PageRequest::POLL_LIMIT,
            csr_enabled: false,
            cache_failure_policy: CacheFailurePolicy::default(),
            contracts: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> StrataResult<()> {
        if self.interval.is_zero() {
            return Err(StrataError::Config("query interval must be > 0".into()));
        }
        if self.page_limit == 0 {
            return Err(StrataError::Config("page limit must be > 0".into()));
        }
        for call in &self.contracts {
            call.validate()?;
        }
        Ok(())
    }

    /// Datasets refreshed each cycle, in order.
    pub fn datasets(&self) -> Vec<Dataset> {
        let mut out = vec![Dataset::StakingApr, Dataset::Validators, Dataset::Proposals];
        if self.csr_enabled {
            out.push(Dataset::Csrs);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetOutcome {
    Published { records: usize },
    Failed(String),
}

/// Per-dataset results of one completed cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle: u64,
    pub tag: String,
    pub outcomes: Vec<(Dataset, DatasetOutcome)>,
}

impl CycleReport {
    pub fn outcome(&self, dataset: Dataset) -> Option<&DatasetOutcome> {
        self.outcomes
            .iter()
            .find(|(d, _)| *d == dataset)
            .map(|(_, o)| o)
    }

    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, DatasetOutcome::Failed(_)))
            .count()
    }
}

/// Clears the in-flight flag when a cycle ends, including on early return.
struct FlightGuard<'a>(&'a AtomicBool);

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Poller {
    querier: Arc<dyn ChainQuerier>,
    writer: CacheWriter,
    config: EngineConfig,
    cycle: AtomicU64,
    in_flight: AtomicBool,
}

impl Poller {
    pub fn new(querier: Arc<dyn ChainQuerier>, writer: CacheWriter, config: EngineConfig) -> Self {
        Self {
            querier,
            writer,
            config,
            cycle: AtomicU64::new(0),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Polls forever. The first cycle starts immediately; ticks that come
    /// due while a cycle is still running are skipped, not queued.
    pub async fn run(&self) -> StrataResult<()> {
        tracing::info!(
            interval_ms = self.config.interval.as_millis() as u64,
            page_limit = self.config.page_limit,
            csr_enabled = self.config.csr_enabled,
            policy = %self.config.cache_failure_policy,
            "poller started"
        );

        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            self.run_cycle().await?;
        }
    }

    /// Runs one cycle. Returns `Ok(None)` without doing anything if another
    /// cycle is already in flight.
    pub async fn run_cycle(&self) -> StrataResult<Option<CycleReport>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("previous cycle still running, skipping");
            return Ok(None);
        }
        let _guard = FlightGuard(&self.in_flight);

        let cycle = self.cycle.fetch_add(1, Ordering::Relaxed) + 1;
        let tag = self.snapshot_tag(cycle).await?;

        let mut outcomes = Vec::new();
        for dataset in self.config.datasets() {
            match self.refresh(dataset, &tag).await {
                Ok(records) => {
                    tracing::info!(dataset = %dataset, tag = %tag, records, "dataset refreshed");
                    outcomes.push((dataset, DatasetOutcome::Published { records }));
                }
                Err(e) if self.is_fatal(&e) => {
                    tracing::error!(dataset = %dataset, error = %e, "cache write failed under fatal policy, stopping");
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!(dataset = %dataset, tag = %tag, error = %e, "dataset refresh failed");
                    outcomes.push((dataset, DatasetOutcome::Failed(e.to_string())));
                }
            }
        }

        let report = CycleReport {
            cycle,
            tag,
            outcomes,
        };
        tracing::debug!(cycle, failures = report.failures(), "cycle complete");
        Ok(Some(report))
    }

    fn is_fatal(&self, e: &StrataError) -> bool {
        e.is_cache() && self.config.cache_failure_policy == CacheFailurePolicy::Fatal
    }

    /// Block height when available, `cycle-<n>` otherwise.
    async fn snapshot_tag(&self, cycle: u64) -> StrataResult<String> {
        match self.querier.latest_block_height().await {
            Ok(height) => {
                let tag = height.to_string();
                if let Err(e) = self.writer.write_value(keys::BLOCK_NUMBER, tag.clone()).await {
                    if self.is_fatal(&e) {
                        tracing::error!(error = %e, "cache write failed under fatal policy, stopping");
                        return Err(e);
                    }
                    tracing::warn!(func = "write_block_number", error = %e, "block height not cached");
                }
                Ok(tag)
            }
            Err(e) => {
                tracing::warn!(func = "latest_block_height", error = %e, "falling back to cycle tag");
                Ok(format!("cycle-{cycle}"))
            }
        }
    }

    fn page(&self) -> PageRequest {
        PageRequest::with_limit(self.config.page_limit)
    }

    async fn refresh(&self, dataset: Dataset, tag: &str) -> StrataResult<usize> {
        match dataset {
            Dataset::StakingApr => self.refresh_apr(tag).await,
            Dataset::Validators => self.refresh_validators(tag).await,
            Dataset::Proposals => self.refresh_proposals(tag).await,
            Dataset::Csrs => self.refresh_csrs(tag).await,
        }
    }

    async fn refresh_apr(&self, tag: &str) -> StrataResult<usize> {
        let (pool, provisions) = tokio::try_join!(
            async {
                self.querier
                    .staking_pool()
                    .await
                    .map_err(|e| e.context("staking_pool"))
            },
            async {
                self.querier
                    .annual_provisions()
                    .await
                    .map_err(|e| e.context("annual_provisions"))
            },
        )?;

        let apr = transform::staking_apr(&pool, &provisions);
        self.writer.write_snapshot(keys::STAKING_APR, tag, &apr).await?;
        Ok(1)
    }

    async fn refresh_validators(&self, tag: &str) -> StrataResult<usize> {
        let raw = self
            .querier
            .validators(self.page())
            .await
            .map_err(|e| e.context("validators"))?;
        let data = transform::transform_validators(&raw)?;
        let keys = DatasetKeys {
            snapshot: keys::ALL_VALIDATORS,
            index: keys::VALIDATOR_MAP,
        };
        self.writer.publish(keys, tag, &data).await?;
        Ok(data.len())
    }

    async fn refresh_proposals(&self, tag: &str) -> StrataResult<usize> {
        let raw = self
            .querier
            .proposals(self.page())
            .await
            .map_err(|e| e.context("proposals"))?;

        let mut live = HashMap::new();
        for id in governance::voting_ids(&raw) {
            match self.querier.proposal_tally(id).await {
                Ok(tally) => {
                    live.insert(id, tally);
                }
                Err(e) => {
                    tracing::warn!(func = "proposal_tally", proposal_id = id, error = %e, "using zero tally");
                }
            }
        }

        let data = transform::transform_proposals(&raw, &live)?;
        let keys = DatasetKeys {
            snapshot: keys::ALL_PROPOSALS,
            index: keys::PROPOSAL_MAP,
        };
        self.writer.publish(keys, tag, &data).await?;
        Ok(data.len())
    }

    async fn refresh_csrs(&self, tag: &str) -> StrataResult<usize> {
        let raw = self
            .querier
            .csrs(self.page())
            .await
            .map_err(|e| e.context("csrs"))?;
        let data = transform::transform_csrs(&raw)?;
        let keys = DatasetKeys {
            snapshot: keys::ALL_CSRS,
            index: keys::CSR_MAP,
        };
        self.writer.publish(keys, tag, &data).await?;
        Ok(data.len())
    }
}
