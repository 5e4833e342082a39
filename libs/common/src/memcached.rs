//! Memcached backed session store
//!
//! The legacy application writes its sessions to memcached, so this is the
//! store the gateway reads through by default. The `memcache` client is
//! blocking; every operation runs on tokio's blocking pool under the shared
//! [`NodeGuard`] policy. The connection is opened on first use and dropped
//! after a failed operation so that the next attempt reconnects.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use memcache::MemcacheError;
use tracing::{debug, info};

use crate::cache::{CacheBackend, CacheConfig, NodeGuard, SessionStore};

type Connection = Arc<memcache::Client>;

/// Memcached connection pool
#[derive(Clone)]
pub struct MemcachedPool {
    url: String,
    connection: Arc<Mutex<Option<Connection>>>,
    guard: Arc<NodeGuard>,
}

impl MemcachedPool {
    /// Prepare a pool for `config.url`; no connection is made until the first operation
    pub fn new(config: &CacheConfig) -> Result<Self> {
        if config.backend()? != CacheBackend::Memcached {
            return Err(anyhow!("{:?} is not a memcache:// URL", config.url));
        }

        info!("Memcached client initialized with URL: {}", config.url);
        Ok(MemcachedPool {
            url: config.url.clone(),
            connection: Arc::new(Mutex::new(None)),
            guard: Arc::new(NodeGuard::new(config)),
        })
    }

    /// Store `value` under `key`, expiring after `ttl_seconds` when given
    pub async fn set(&self, key: &str, value: &[u8], ttl_seconds: Option<u64>) -> Result<()> {
        let key = key.to_string();
        let value = value.to_vec();
        let expiration = ttl_seconds.map_or(0, |ttl| u32::try_from(ttl).unwrap_or(u32::MAX));

        self.execute("SET", move |client| {
            client.set(&key, value.as_slice(), expiration)
        })
        .await
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let key = key.to_string();
        self.execute("GET", move |client| client.get::<Vec<u8>>(&key))
            .await
    }

    pub async fn delete(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        let _: bool = self
            .execute("DELETE", move |client| client.delete(&key))
            .await?;
        Ok(())
    }

    /// Check if memcached answers a `version` request
    pub async fn health_check(&self) -> Result<bool> {
        let versions = self
            .execute("VERSION", |client| client.version())
            .await?;
        Ok(!versions.is_empty())
    }

    async fn execute<T, F>(&self, operation: &str, command: F) -> Result<T>
    where
        T: Send + 'static,
        F: Fn(&memcache::Client) -> std::result::Result<T, MemcacheError>
            + Clone
            + Send
            + 'static,
    {
        self.guard
            .run(operation, || {
                let pool = self.clone();
                let command = command.clone();
                async move {
                    tokio::task::spawn_blocking(move || {
                        let client = pool.connection()?;
                        command(&client).map_err(|e| {
                            pool.disconnect();
                            anyhow!("{}", e)
                        })
                    })
                    .await
                    .map_err(|e| anyhow!("Memcached worker failed: {}", e))?
                }
            })
            .await
    }

    /// The open connection, connecting first when there is none
    fn connection(&self) -> Result<Connection> {
        let mut slot = self.connection.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }

        debug!("Connecting to memcached at {}", self.url);
        let client = memcache::Client::connect(self.url.as_str())
            .map_err(|e| anyhow!("Failed to connect to memcached at {}: {}", self.url, e))?;

        let limit = Some(Duration::from_millis(self.guard.config().timeout_ms));
        client
            .set_read_timeout(limit)
            .and_then(|_| client.set_write_timeout(limit))
            .map_err(|e| anyhow!("Failed to configure memcached timeouts: {}", e))?;

        let client = Arc::new(client);
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    fn disconnect(&self) {
        let mut slot = self.connection.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

#[async_trait]
impl SessionStore for MemcachedPool {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        MemcachedPool::get(self, key).await
    }

    async fn health_check(&self) -> Result<bool> {
        MemcachedPool::health_check(self).await
    }
}
