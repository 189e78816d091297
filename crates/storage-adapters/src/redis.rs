//! # Redis idea list
//!
//! The idea list is a single Redis list of JSON strings:
//!
//! - load: `LRANGE key 0 -1`
//! - vote: `LSET key index json`
//! - submit: `RPUSH key json`
//!
//! Every call is bounded by `timeout`; a slow store surfaces as a storage
//! error instead of a hung webhook.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::{Config, Connection, Pool, Runtime};
use domains::{DomainError, Idea, IdeaRepository, Result};
use tracing::debug;

use crate::codec::{decode_all, encode};

pub struct RedisIdeaRepository {
    pool: Pool,
    key: String,
    timeout: Duration,
}

impl RedisIdeaRepository {
    pub fn new(redis_url: &str, key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let pool = Config::from_url(redis_url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| DomainError::Storage(format!("create redis pool: {e}")))?;

        Ok(Self {
            pool,
            key: key.into(),
            timeout,
        })
    }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| DomainError::Storage(format!("redis {op} timed out after {:?}", self.timeout)))?
    }

    async fn connection(&self) -> Result<Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| DomainError::Storage(format!("redis connection: {e}")))
    }
}

fn storage_err(op: &'static str) -> impl FnOnce(deadpool_redis::redis::RedisError) -> DomainError {
    move |e| DomainError::Storage(format!("redis {op}: {e}"))
}

#[async_trait]
impl IdeaRepository for RedisIdeaRepository {
    async fn load_all(&self) -> Result<Vec<Idea>> {
        let raw: Vec<String> = self
            .bounded("LRANGE", async {
                let mut conn = self.connection().await?;
                conn.lrange(&self.key, 0, -1).await.map_err(storage_err("LRANGE"))
            })
            .await?;
        debug!(key = %self.key, len = raw.len(), "loaded idea list");
        decode_all(&raw)
    }

    async fn replace_at(&self, index: usize, idea: &Idea) -> Result<()> {
        let encoded = encode(idea)?;
        let index = isize::try_from(index)
            .map_err(|_| DomainError::Storage(format!("index {index} out of range")))?;
        self.bounded("LSET", async {
            let mut conn = self.connection().await?;
            conn.lset::<_, _, ()>(&self.key, index, encoded)
                .await
                .map_err(storage_err("LSET"))
        })
        .await
    }

    async fn append(&self, idea: &Idea) -> Result<()> {
        let encoded = encode(idea)?;
        self.bounded("RPUSH", async {
            let mut conn = self.connection().await?;
            conn.rpush::<_, _, ()>(&self.key, encoded)
                .await
                .map_err(storage_err("RPUSH"))
        })
        .await
    }
}
