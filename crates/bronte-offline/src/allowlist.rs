//! Pre-cache allowlist and request matching.

use http::Method;
use url::Url;

/// Path of the app shell document.
pub const SHELL_DOCUMENT: &str = "index.html";

/// One allowlist entry, parsed from its textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetPattern {
    /// The app shell; matches both `/` and `/index.html`.
    Shell,
    /// A same-origin asset, matched by exact path.
    LocalPath(String),
    /// An absolute URL prefix, e.g. a pinned CDN bundle.
    External(String),
}

impl AssetPattern {
    pub fn parse(entry: &str) -> Self {
        if entry == "/" || entry == SHELL_DOCUMENT {
            AssetPattern::Shell
        } else if entry.starts_with("http") {
            AssetPattern::External(entry.to_string())
        } else {
            AssetPattern::LocalPath(format!("/{}", entry.trim_start_matches('/')))
        }
    }

    pub fn matches(&self, url: &Url) -> bool {
        match self {
            AssetPattern::Shell => {
                let path = url.path();
                path == "/" || path == "/index.html"
            }
            AssetPattern::LocalPath(path) => url.path() == path,
            AssetPattern::External(prefix) => url.as_str().starts_with(prefix.as_str()),
        }
    }
}

/// The set of URLs the worker pre-caches and intercepts.
#[derive(Debug, Clone, Default)]
pub struct Allowlist {
    patterns: Vec<AssetPattern>,
}

impl Allowlist {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: entries
                .into_iter()
                .map(|entry| AssetPattern::parse(entry.as_ref()))
                .collect(),
        }
    }

    pub fn matches(&self, url: &Url) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(url))
    }

    /// Only allowlisted GETs go through the cache; everything else bypasses.
    pub fn is_cacheable(&self, method: &Method, url: &Url) -> bool {
        *method == Method::GET && self.matches(url)
    }
}
