//! Cache storage behind the worker.
//!
//! Storage is a set of named containers, each mapping a URL to a stored
//! response snapshot. The worker keeps one container per cache version and
//! drops the rest on activation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::sync::RwLock;

/// A response snapshot as kept in a cache container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl StoredResponse {
    /// 2xx check; only responses passing it are worth caching.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// A 200 HTML response, used for synthesized fallback pages.
    pub fn html(body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "text/html".to_string());
        Self {
            status: 200,
            headers,
            body: Bytes::copy_from_slice(body.as_bytes()),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// A named collection of cache containers.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Opens the container with the given name, creating it if needed.
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheContainer>, StoreError>;

    /// Names of all existing containers.
    async fn names(&self) -> Result<Vec<String>, StoreError>;

    /// Deletes a container; returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, StoreError>;
}

/// One container of URL-keyed response snapshots.
#[async_trait]
pub trait CacheContainer: Send + Sync {
    async fn lookup(&self, url: &str) -> Result<Option<StoredResponse>, StoreError>;
    async fn put(&self, url: &str, response: StoredResponse) -> Result<(), StoreError>;
}

/// In-memory storage backend.
#[derive(Default)]
pub struct MemoryCacheStorage {
    containers: RwLock<HashMap<String, Arc<MemoryContainer>>>,
}

#[derive(Default)]
struct MemoryContainer {
    entries: RwLock<HashMap<String, StoredResponse>>,
}

#[async_trait]
impl CacheStorage for MemoryCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheContainer>, StoreError> {
        let mut containers = self.containers.write().await;
        let container: Arc<dyn CacheContainer> =
            containers.entry(name.to_string()).or_default().clone();
        Ok(container)
    }

    async fn names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.containers.read().await.keys().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.containers.write().await.remove(name).is_some())
    }
}

#[async_trait]
impl CacheContainer for MemoryContainer {
    async fn lookup(&self, url: &str) -> Result<Option<StoredResponse>, StoreError> {
        Ok(self.entries.read().await.get(url).cloned())
    }

    async fn put(&self, url: &str, response: StoredResponse) -> Result<(), StoreError> {
        self.entries.write().await.insert(url.to_string(), response);
        Ok(())
    }
}
