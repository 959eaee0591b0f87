//! Key-value store seam shared by the run tracker and the dedup store.
//!
//! Everything the pipeline persists goes through single-key read/set/TTL-set
//! operations; no multi-key transactions. The trait exists so tests can
//! substitute an in-memory fake for Redis.

use std::time::Duration;

use async_trait::async_trait;

use jobsignal_common::JobSignalError;

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, JobSignalError>;

    /// SET with expiry. Overwrites and resets the TTL.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), JobSignalError>;

    /// SET NX with expiry. Returns true when the key was newly written,
    /// false when it already existed (value and TTL untouched).
    async fn set_nx_ex(&self, key: &str, value: &str, ttl: Duration)
        -> Result<bool, JobSignalError>;

    async fn exists(&self, key: &str) -> Result<bool, JobSignalError>;
}

/// Redis-backed store over a multiplexed connection manager. Cloning shares
/// the underlying connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, JobSignalError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| JobSignalError::Config(format!("Invalid REDIS_URL: {e}")))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| JobSignalError::StateStore(e.to_string()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, JobSignalError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| JobSignalError::StateStore(e.to_string()))?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), JobSignalError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| JobSignalError::StateStore(e.to_string()))?;
        Ok(())
    }

    async fn set_nx_ex(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<bool, JobSignalError> {
        let mut conn = self.conn.clone();
        // SET NX replies OK when written, nil when the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| JobSignalError::StateStore(e.to_string()))?;
        Ok(reply.is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, JobSignalError> {
        let mut conn = self.conn.clone();
        let found: bool = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| JobSignalError::StateStore(e.to_string()))?;
        Ok(found)
    }
}
