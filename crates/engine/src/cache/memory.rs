//! In-process cache store.
//!
//! Good for a single binary running both the poller and the API, and as the
//! test double everywhere else.

use super::CacheStore;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use strata_core::{StrataError, StrataResult};
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
enum Entry {
    Value(String),
    Hash(BTreeMap<String, String>),
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

fn wrong_type(key: &str) -> StrataError {
    StrataError::Cache(format!(
        "WRONGTYPE operation against key {key} holding the wrong kind of value"
    ))
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn set(&self, key: &str, value: String) -> StrataResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_owned(), Entry::Value(value));
        Ok(())
    }

    async fn hash_set(&self, key: &str, fields: BTreeMap<String, String>) -> StrataResult<()> {
        let mut entries = self.entries.write().await;
        if let Some(Entry::Value(_)) = entries.get(key) {
            return Err(wrong_type(key));
        }
        entries.insert(key.to_owned(), Entry::Hash(fields));
        Ok(())
    }

    async fn get(&self, key: &str) -> StrataResult<Option<String>> {
        match self.entries.read().await.get(key) {
            Some(Entry::Value(v)) => Ok(Some(v.clone())),
            Some(Entry::Hash(_)) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn get_hash(&self, key: &str) -> StrataResult<Option<BTreeMap<String, String>>> {
        match self.entries.read().await.get(key) {
            Some(Entry::Hash(h)) => Ok(Some(h.clone())),
            Some(Entry::Value(_)) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> StrataResult<Option<String>> {
        match self.entries.read().await.get(key) {
            Some(Entry::Hash(h)) => Ok(h.get(field).cloned()),
            Some(Entry::Value(_)) => Err(wrong_type(key)),
            None => Ok(None),
        }
    }
}
