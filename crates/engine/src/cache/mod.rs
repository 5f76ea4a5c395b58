//! Cache store abstraction and the write/read protocol over it.
//!
//! Each polled dataset owns two keys:
//! - a snapshot key holding `{"tag": ..., "results": [...]}`
//! - an index key holding a hash of `natural key -> serialized record`
//!
//! Two backends:
//! - **Memory**: process-local map, default
//! - **Redis**: shared store for multi-process deployments (feature-gated)

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

use crate::transform::Indexed;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use strata_core::{Snapshot, StrataError, StrataResult};

pub use memory::MemoryStore;

/// Well-known cache keys shared with the read API.
pub mod keys {
    pub const BLOCK_NUMBER: &str = "BLOCK_NUMBER";
    pub const STAKING_APR: &str = "STAKING_APR";
    pub const ALL_VALIDATORS: &str = "ALL_VALIDATORS";
    pub const VALIDATOR_MAP: &str = "VALIDATOR_MAP";
    pub const ALL_PROPOSALS: &str = "ALL_PROPOSALS";
    pub const PROPOSAL_MAP: &str = "PROPOSAL_MAP";
    pub const ALL_CSRS: &str = "ALL_CSRS";
    pub const CSR_MAP: &str = "CSR_MAP";
}

/// Minimal key/value + hash store. No transactions across calls.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn set(&self, key: &str, value: String) -> StrataResult<()>;

    /// Replaces the whole hash at `key` with `fields`.
    async fn hash_set(&self, key: &str, fields: BTreeMap<String, String>) -> StrataResult<()>;

    async fn get(&self, key: &str) -> StrataResult<Option<String>>;

    async fn get_hash(&self, key: &str) -> StrataResult<Option<BTreeMap<String, String>>>;

    async fn get_hash_field(&self, key: &str, field: &str) -> StrataResult<Option<String>>;
}

/// Snapshot + index key pair for one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetKeys {
    pub snapshot: &'static str,
    pub index: &'static str,
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Publishes poll results. Every failure is prefixed with the operation and
/// key and surfaces as [`StrataError::Cache`] unless serialization failed.
#[derive(Clone)]
pub struct CacheWriter {
    store: Arc<dyn CacheStore>,
}

impl CacheWriter {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Overwrites `key` with `{tag, results: payload}`.
    pub async fn write_snapshot<T>(&self, key: &str, tag: &str, payload: &T) -> StrataResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let body = serde_json::to_string(&Snapshot::new(tag, payload))
            .map_err(|e| StrataError::from(e).context(format!("write_snapshot {key}")))?;
        self.store
            .set(key, body)
            .await
            .map_err(|e| e.context(format!("write_snapshot {key}")))
    }

    /// Replaces the hash at `key` with this cycle's mapping.
    pub async fn write_index(&self, key: &str, mapping: &BTreeMap<String, String>) -> StrataResult<()> {
        self.store
            .hash_set(key, mapping.clone())
            .await
            .map_err(|e| e.context(format!("write_index {key}")))
    }

    /// Plain value write, used for `BLOCK_NUMBER`.
    pub async fn write_value(&self, key: &str, value: String) -> StrataResult<()> {
        self.store
            .set(key, value)
            .await
            .map_err(|e| e.context(format!("write_value {key}")))
    }

    /// Writes each independent result set under its own snapshot key.
    /// Stops at the first failure; earlier keys stay written.
    pub async fn write_general_batch(
        &self,
        tag: &str,
        results: &BTreeMap<String, Vec<serde_json::Value>>,
    ) -> StrataResult<usize> {
        for (key, values) in results {
            self.write_snapshot(key, tag, values)
                .await
                .map_err(|e| e.context("write_general_batch"))?;
        }
        Ok(results.len())
    }

    /// Publishes one dataset: snapshot first, then the index.
    pub async fn publish<T>(&self, keys: DatasetKeys, tag: &str, data: &Indexed<T>) -> StrataResult<()>
    where
        T: Serialize + Sync,
    {
        self.write_snapshot(keys.snapshot, tag, &data.records).await?;
        self.write_index(keys.index, &data.index).await
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Read side used by the API. Straight pass-through to the store.
#[derive(Clone)]
pub struct CacheReader {
    store: Arc<dyn CacheStore>,
}

impl CacheReader {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub async fn get_value(&self, key: &str) -> StrataResult<Option<String>> {
        self.store.get(key).await
    }

    pub async fn get_hash(&self, key: &str) -> StrataResult<Option<BTreeMap<String, String>>> {
        self.store.get_hash(key).await
    }

    pub async fn get_hash_field(&self, key: &str, field: &str) -> StrataResult<Option<String>> {
        self.store.get_hash_field(key, field).await
    }

    /// Reads and decodes a `{tag, results}` envelope.
    pub async fn get_snapshot<T: DeserializeOwned>(&self, key: &str) -> StrataResult<Option<Snapshot<T>>> {
        match self.store.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StrataError::from(e).context(format!("get_snapshot {key}"))),
            None => Ok(None),
        }
    }
}
