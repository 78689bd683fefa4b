//! Cache worker lifecycle and request interception.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::allowlist::Allowlist;
use crate::fetch::{AssetRequest, FetchError, Fetcher};
use crate::store::{CacheStorage, StoreError, StoredResponse};

/// Lifecycle states of a cache worker. Interception only happens in
/// [`Lifecycle::Active`]; before that every request passes straight through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninstalled,
    Installing,
    Installed,
    Active,
}

/// Static setup of a worker: the cache version it owns, the origin relative
/// assets resolve against, and the pre-cache list.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub version: String,
    pub origin: Url,
    pub assets: Vec<String>,
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fallback page served when an intercepted fetch fails on the network with
/// no cached copy.
pub fn offline_fallback() -> StoredResponse {
    StoredResponse::html(
        "<h1>You are offline!</h1><p>It looks like you're not connected to the internet.</p>",
    )
}

pub struct CacheWorker {
    config: WorkerConfig,
    allowlist: Allowlist,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    state: Lifecycle,
}

impl CacheWorker {
    pub fn new(
        config: WorkerConfig,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        let allowlist = Allowlist::new(&config.assets);
        Self {
            config,
            allowlist,
            storage,
            fetcher,
            state: Lifecycle::Uninstalled,
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Resolves an allowlist entry to the URL it is cached under.
    fn resolve_entry(&self, entry: &str) -> Option<Url> {
        if entry.starts_with("http") {
            Url::parse(entry).ok()
        } else {
            self.config.origin.join(entry).ok()
        }
    }

    /// Pre-caches the allowlist into this version's container.
    ///
    /// Best-effort per entry: an asset that fails to resolve, fetch or store
    /// is logged and skipped, and installation still completes.
    pub async fn install(&mut self) -> Result<(), WorkerError> {
        self.state = Lifecycle::Installing;
        let container = self.storage.open(&self.config.version).await?;

        for entry in &self.config.assets {
            let Some(url) = self.resolve_entry(entry) else {
                warn!(entry = %entry, "skipping unresolvable pre-cache entry");
                continue;
            };
            match self.fetcher.fetch(&AssetRequest::get(url.clone())).await {
                Ok(response) if response.is_ok() => {
                    if let Err(err) = container.put(url.as_str(), response).await {
                        warn!(entry = %entry, error = %err, "failed to store pre-cache entry");
                    }
                }
                Ok(response) => {
                    warn!(
                        entry = %entry,
                        status = response.status,
                        "pre-cache fetch returned an error status"
                    );
                }
                Err(err) => {
                    warn!(entry = %entry, error = %err, "pre-cache fetch failed");
                }
            }
        }

        self.state = Lifecycle::Installed;
        Ok(())
    }

    /// Deletes every cache container except this worker's version, then
    /// starts intercepting.
    pub async fn activate(&mut self) -> Result<(), WorkerError> {
        for name in self.storage.names().await? {
            if name != self.config.version {
                debug!(container = %name, "purging stale cache version");
                self.storage.delete(&name).await?;
            }
        }
        self.state = Lifecycle::Active;
        Ok(())
    }

    /// Answers one request, cache-first.
    ///
    /// Requests bypass the cache entirely unless the worker is active and the
    /// request is an allowlisted GET. On a miss the network response is
    /// returned and, when 2xx, stored for next time; a network failure with
    /// nothing cached yields the offline fallback page.
    pub async fn handle_fetch(&self, request: &AssetRequest) -> Result<StoredResponse, FetchError> {
        if self.state != Lifecycle::Active
            || !self.allowlist.is_cacheable(&request.method, &request.url)
        {
            return self.fetcher.fetch(request).await;
        }

        let container = match self.storage.open(&self.config.version).await {
            Ok(container) => container,
            Err(err) => {
                warn!(error = %err, "cache unavailable, passing request through");
                return self.fetcher.fetch(request).await;
            }
        };

        match container.lookup(request.url.as_str()).await {
            Ok(Some(cached)) => {
                debug!(url = %request.url, "serving from cache");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "cache lookup failed, passing request through");
                return self.fetcher.fetch(request).await;
            }
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_ok() {
                    if let Err(err) = container.put(request.url.as_str(), response.clone()).await {
                        warn!(url = %request.url, error = %err, "failed to cache network response");
                    }
                }
                Ok(response)
            }
            Err(err) => {
                warn!(
                    url = %request.url,
                    error = %err,
                    "network failed with no cached copy, serving offline page"
                );
                Ok(offline_fallback())
            }
        }
    }
}
