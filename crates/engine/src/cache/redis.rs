//! Redis-backed cache store. Requires the `redis` feature flag.
//!
//! Hash writes run `DEL` + `HSET` inside one `MULTI` block so readers never
//! see a half-replaced index.
//!
//! ```ignore
//! let store = RedisStore::connect("redis://:password@localhost:6379/0").await?;
//! let writer = CacheWriter::new(Arc::new(store));
//! ```

use super::CacheStore;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::collections::BTreeMap;
use strata_core::{StrataError, StrataResult};

pub struct RedisStore {
    conn: MultiplexedConnection,
}

fn cache_err(e: redis::RedisError) -> StrataError {
    StrataError::Cache(e.to_string())
}

impl RedisStore {
    pub async fn connect(url: &str) -> StrataResult<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| StrataError::Config(format!("invalid redis URL: {e}")))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| StrataError::Config(format!("failed to connect to redis: {e}")))?;

        tracing::info!("redis store connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn set(&self, key: &str, value: String) -> StrataResult<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value).await.map_err(cache_err)?;
        Ok(())
    }

    async fn hash_set(&self, key: &str, fields: BTreeMap<String, String>) -> StrataResult<()> {
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        pipe.atomic().del(key).ignore();
        // HSET with no fields is a protocol error; an empty index is just the DEL.
        if !fields.is_empty() {
            let items: Vec<(String, String)> = fields.into_iter().collect();
            pipe.hset_multiple(key, &items).ignore();
        }
        let _: () = pipe.query_async(&mut conn).await.map_err(cache_err)?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StrataResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(cache_err)
    }

    async fn get_hash(&self, key: &str) -> StrataResult<Option<BTreeMap<String, String>>> {
        let mut conn = self.conn.clone();
        let map: BTreeMap<String, String> = conn.hgetall(key).await.map_err(cache_err)?;
        // HGETALL on a missing key is an empty reply.
        Ok((!map.is_empty()).then_some(map))
    }

    async fn get_hash_field(&self, key: &str, field: &str) -> StrataResult<Option<String>> {
        let mut conn = self.conn.clone();
        conn.hget(key, field).await.map_err(cache_err)
    }
}
