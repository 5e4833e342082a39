//! Session cache client
//!
//! The legacy PHP application stores its sessions in a shared memcached node.
//! This module provides the `SessionStore` abstraction the session decoder
//! reads through, the failure policy every backend shares (a bounded timeout,
//! a small retry budget and a dead-node back-off), and a Redis backed store
//! for deployments that mirror the sessions into Redis. The memcached store
//! lives in [`crate::memcached`].

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisResult, aio::MultiplexedConnection};
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::memcached::MemcachedPool;

/// Read access to the legacy session cache
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the raw value stored under `key`, `None` on a cache miss
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Whether the backing node currently answers
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

/// Configuration for the cache connection
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Connection URL, `memcache://host:port` or `redis://host:port`
    pub url: String,
    /// Time after which a single operation is abandoned
    pub timeout_ms: u64,
    /// Extra attempts made after a failed operation
    pub retries: u32,
    /// How long a node stays marked dead before it is tried again
    pub reconnect_ms: u64,
    /// Consecutive failed operations before the node is marked dead
    pub failures: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: "memcache://legacy.session.memcached:11211".to_string(),
            timeout_ms: 5000,
            retries: 1,
            reconnect_ms: 10000,
            failures: 3,
        }
    }
}

/// Cache server flavour, chosen by the scheme of the connection URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memcached,
    Redis,
}

impl CacheConfig {
    /// Create a new CacheConfig from environment variables
    ///
    /// # Environment Variables
    /// - `CACHE_URL`: connection URL (default: "memcache://legacy.session.memcached:11211")
    /// - `CACHE_TIMEOUT_MS`: per-operation timeout (default: 5000)
    /// - `CACHE_RETRIES`: retry attempts (default: 1)
    /// - `CACHE_RECONNECT_MS`: dead-node back-off (default: 10000)
    /// - `CACHE_FAILURES`: failures before a node is marked dead (default: 3)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let url = std::env::var("CACHE_URL").unwrap_or(defaults.url);
        let timeout_ms = env_or("CACHE_TIMEOUT_MS", defaults.timeout_ms);
        let retries = env_or("CACHE_RETRIES", defaults.retries);
        let reconnect_ms = env_or("CACHE_RECONNECT_MS", defaults.reconnect_ms);
        let failures = env_or("CACHE_FAILURES", defaults.failures);

        Ok(CacheConfig {
            url,
            timeout_ms,
            retries,
            reconnect_ms,
            failures,
        })
    }

    pub fn backend(&self) -> Result<CacheBackend> {
        match self.url.split_once("://").map(|(scheme, _)| scheme) {
            Some("memcache") => Ok(CacheBackend::Memcached),
            Some("redis") | Some("rediss") => Ok(CacheBackend::Redis),
            _ => bail!(
                "Unsupported cache URL {:?}, expected memcache:// or redis://",
                self.url
            ),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

/// Open the session store matching the scheme of `config.url`
pub async fn connect(config: &CacheConfig) -> Result<Arc<dyn SessionStore>> {
    let store: Arc<dyn SessionStore> = match config.backend()? {
        CacheBackend::Memcached => Arc::new(MemcachedPool::new(config)?),
        CacheBackend::Redis => Arc::new(RedisPool::new(config).await?),
    };
    Ok(store)
}

#[derive(Debug, Default)]
struct NodeHealth {
    consecutive_failures: u32,
    dead_until: Option<Instant>,
}

/// Timeout, retry and dead-node policy around the operations of one cache node
#[derive(Debug)]
pub(crate) struct NodeGuard {
    config: CacheConfig,
    health: Mutex<NodeHealth>,
}

impl NodeGuard {
    pub(crate) fn new(config: &CacheConfig) -> Self {
        Self {
            config: config.clone(),
            health: Mutex::new(NodeHealth::default()),
        }
    }

    pub(crate) fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Run one cache operation, calling `attempt` once per try
    pub(crate) async fn run<T, E, F, Fut>(&self, operation: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: Into<anyhow::Error>,
    {
        self.ensure_alive()?;

        let limit = Duration::from_millis(self.config.timeout_ms);
        let mut last_error = anyhow!("Cache {} was not attempted", operation);

        for round in 0..=self.config.retries {
            match timeout(limit, attempt()).await {
                Ok(Ok(value)) => {
                    self.record_success();
                    return Ok(value);
                }
                Ok(Err(e)) => {
                    let e = e.into();
                    warn!("Cache {} failed on attempt {}: {}", operation, round + 1, e);
                    last_error = e;
                }
                Err(_) => {
                    warn!(
                        "Cache {} timed out after {}ms on attempt {}",
                        operation,
                        self.config.timeout_ms,
                        round + 1
                    );
                    last_error = anyhow!(
                        "Cache {} timed out after {}ms",
                        operation,
                        self.config.timeout_ms
                    );
                }
            }
        }

        self.record_failure();
        Err(last_error)
    }

    fn ensure_alive(&self) -> Result<()> {
        let mut health = self.health.lock().unwrap_or_else(|e| e.into_inner());
        match health.dead_until {
            Some(until) if Instant::now() < until => {
                bail!("Cache node {} is marked dead", self.config.url)
            }
            Some(_) => {
                health.dead_until = None;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn record_success(&self) {
        let mut health = self.health.lock().unwrap_or_else(|e| e.into_inner());
        health.consecutive_failures = 0;
    }

    fn record_failure(&self) {
        let mut health = self.health.lock().unwrap_or_else(|e| e.into_inner());
        health.consecutive_failures += 1;
        if health.consecutive_failures >= self.config.failures.max(1) {
            warn!(
                "Marking cache node {} dead for {}ms after {} failures",
                self.config.url, self.config.reconnect_ms, health.consecutive_failures
            );
            health.consecutive_failures = 0;
            health.dead_until =
                Some(Instant::now() + Duration::from_millis(self.config.reconnect_ms));
        }
    }
}

/// Redis connection pool
#[derive(Clone)]
pub struct RedisPool {
    client: Client,
    guard: Arc<NodeGuard>,
}

impl RedisPool {
    /// Initialize a new Redis connection pool
    pub async fn new(config: &CacheConfig) -> Result<Self> {
        let client = Client::open(config.url.clone())?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisPool {
            client,
            guard: Arc::new(NodeGuard::new(config)),
        })
    }

    /// Set a key-value pair in Redis with optional TTL
    pub async fn set(&self, key: &str, value: &[u8], ttl_seconds: Option<u64>) -> Result<()> {
        self.execute("SET", |mut conn| async move {
            match ttl_seconds {
                Some(ttl) => conn.set_ex(key, value, ttl).await,
                None => conn.set(key, value).await,
            }
        })
        .await
    }

    /// Get a value from Redis by key
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.execute("GET", |mut conn| async move { conn.get(key).await })
            .await
    }

    /// Delete a key from Redis
    pub async fn delete(&self, key: &str) -> Result<()> {
        let _: u64 = self
            .execute("DEL", |mut conn| async move { conn.del(key).await })
            .await?;
        Ok(())
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let pong: String = self
            .execute("PING", |mut conn| async move {
                redis::cmd("PING").query_async(&mut conn).await
            })
            .await?;
        Ok(pong == "PONG")
    }

    async fn execute<T, F, Fut>(&self, operation: &str, command: F) -> Result<T>
    where
        F: Fn(MultiplexedConnection) -> Fut,
        Fut: Future<Output = RedisResult<T>>,
    {
        let client = &self.client;
        let command = &command;
        self.guard
            .run(operation, move || async move {
                let conn = client.get_multiplexed_async_connection().await?;
                command(conn).await
            })
            .await
    }
}

#[async_trait]
impl SessionStore for RedisPool {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        RedisPool::get(self, key).await
    }

    async fn health_check(&self) -> Result<bool> {
        RedisPool::health_check(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    fn unreachable_config() -> CacheConfig {
        CacheConfig {
            url: "redis://127.0.0.1:1".to_string(),
            timeout_ms: 500,
            retries: 0,
            reconnect_ms: 60_000,
            failures: 1,
        }
    }

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert_eq!(config.url, "memcache://legacy.session.memcached:11211");
        assert_eq!(config.timeout_ms, 5000);
        assert_eq!(config.retries, 1);
        assert_eq!(config.reconnect_ms, 10000);
        assert_eq!(config.failures, 3);
        assert_eq!(config.backend().unwrap(), CacheBackend::Memcached);
    }

    #[test]
    fn test_backend_follows_url_scheme() {
        let with_url = |url: &str| CacheConfig {
            url: url.to_string(),
            ..CacheConfig::default()
        };

        assert_eq!(
            with_url("redis://cache:6379").backend().unwrap(),
            CacheBackend::Redis
        );
        assert_eq!(
            with_url("memcache://cache:11211").backend().unwrap(),
            CacheBackend::Memcached
        );
        assert_err!(with_url("cache:11211").backend());
        assert_err!(with_url("http://cache:11211").backend());
    }

    #[tokio::test]
    async fn test_guard_retries_then_marks_node_dead() {
        let guard = NodeGuard::new(&CacheConfig {
            retries: 1,
            failures: 2,
            ..unreachable_config()
        });
        let attempts = AtomicUsize::new(0);
        let counter = &attempts;
        let refuse = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(anyhow!("connection refused"))
        };

        let err = guard.run("GET", refuse).await.unwrap_err();
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);

        assert_err!(guard.run("GET", refuse).await);
        assert_eq!(attempts.load(Ordering::SeqCst), 4);

        let err = guard.run("GET", refuse).await.unwrap_err();
        assert!(err.to_string().contains("marked dead"), "got: {}", err);
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_guard_success_resets_failures() {
        let guard = NodeGuard::new(&CacheConfig {
            failures: 2,
            ..unreachable_config()
        });
        let refuse = || async { Err::<u8, _>(anyhow!("connection refused")) };
        let answer = || async { Ok::<u8, anyhow::Error>(7) };

        assert_err!(guard.run("GET", refuse).await);
        assert_eq!(assert_ok!(guard.run("GET", answer).await), 7);
        assert_err!(guard.run("GET", refuse).await);

        let err = guard.run("GET", refuse).await.unwrap_err();
        assert!(!err.to_string().contains("marked dead"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_guard_times_out_slow_operations() {
        let guard = NodeGuard::new(&CacheConfig {
            timeout_ms: 20,
            failures: 5,
            ..unreachable_config()
        });
        let stall = || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<(), anyhow::Error>(())
        };

        let err = guard.run("GET", stall).await.unwrap_err();
        assert!(err.to_string().contains("timed out"), "got: {}", err);
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_marked_dead() -> Result<()> {
        let pool = RedisPool::new(&unreachable_config()).await?;

        assert_err!(pool.get("some-key").await);

        let err = pool.get("some-key").await.unwrap_err();
        assert!(err.to_string().contains("marked dead"), "got: {}", err);
        Ok(())
    }

    #[tokio::test]
    async fn test_connect_picks_backend() -> Result<()> {
        let store = connect(&unreachable_config()).await?;
        assert_err!(store.get("some-key").await);

        let invalid = CacheConfig {
            url: "ftp://cache".to_string(),
            ..CacheConfig::default()
        };
        assert!(connect(&invalid).await.is_err());
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_redis_connection() -> Result<()> {
        let pool = RedisPool::new(&CacheConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            ..CacheConfig::from_env()?
        })
        .await?;
        assert!(pool.health_check().await?);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_set_get_delete() -> Result<()> {
        let pool = RedisPool::new(&CacheConfig {
            url: "redis://127.0.0.1:6379".to_string(),
            ..CacheConfig::from_env()?
        })
        .await?;

        let key = "test_key";
        let value = b"test_value";
        pool.set(key, value, Some(5)).await?;

        let retrieved = pool.get(key).await?;
        assert_eq!(retrieved, Some(value.to_vec()));

        pool.delete(key).await?;
        let retrieved = pool.get(key).await?;
        assert_eq!(retrieved, None);

        Ok(())
    }
}
