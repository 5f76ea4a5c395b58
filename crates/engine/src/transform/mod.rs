//! Dataset transformers: remote responses in, cache-ready pairs out.
//!
//! Every polled dataset is published twice: once as an ordered list and
//! once as a `natural key -> serialized record` map. [`Indexed`] builds
//! both in one pass so they can never disagree about which records exist.

pub mod apr;
pub mod csr;
pub mod delegations;
pub mod governance;
pub mod staking;

use serde::Serialize;
use std::collections::BTreeMap;
use strata_core::StrataResult;

pub use apr::staking_apr;
pub use csr::transform_csrs;
pub use delegations::{build_snapshot, total_rewards};
pub use governance::{extract_metadata, transform_proposals, ProposalMetadata};
pub use staking::transform_validators;

/// Ordered records plus their key-indexed serialized form.
///
/// Duplicate keys keep the first record seen; later ones are dropped from
/// both representations so the list and the map stay the same set.
#[derive(Debug, Clone, PartialEq)]
pub struct Indexed<T> {
    pub records: Vec<T>,
    pub index: BTreeMap<String, String>,
    pub duplicates: usize,
}

impl<T> Default for Indexed<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: BTreeMap::new(),
            duplicates: 0,
        }
    }
}

impl<T: Serialize> Indexed<T> {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            records: Vec::with_capacity(n),
            ..Self::default()
        }
    }

    /// Serializes and stores `record` under `key`. Returns `false` when the
    /// key was already taken and the record was dropped.
    pub fn insert(&mut self, key: String, record: T) -> StrataResult<bool> {
        if self.index.contains_key(&key) {
            tracing::warn!(key = %key, "duplicate natural key in remote response, keeping first");
            self.duplicates += 1;
            return Ok(false);
        }
        let serialized = serde_json::to_string(&record)?;
        self.index.insert(key, serialized);
        self.records.push(record);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
