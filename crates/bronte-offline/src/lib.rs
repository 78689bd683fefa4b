//! Bronte Offline - versioned asset cache with lifecycle-gated interception.
//!
//! A [`CacheWorker`] owns one named cache container per release. Installation
//! pre-caches an allowlist of shell assets, activation drops containers left
//! behind by previous releases, and once active the worker answers
//! allowlisted GETs cache-first, falling back to the network and finally to
//! a synthesized offline page.

pub mod allowlist;
pub mod fetch;
pub mod store;
pub mod worker;

pub use allowlist::{Allowlist, AssetPattern};
pub use fetch::{AssetRequest, FetchError, Fetcher, HttpFetcher};
pub use store::{CacheContainer, CacheStorage, MemoryCacheStorage, StoreError, StoredResponse};
pub use worker::{offline_fallback, CacheWorker, Lifecycle, WorkerConfig, WorkerError};
