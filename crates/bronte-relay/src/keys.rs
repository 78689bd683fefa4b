//! Per-request API key selection.
//!
//! A request may carry its own inline key, name a pooled `API_KEY_*` entry,
//! or say nothing and fall through to the default `GEMINI_API_KEY`. The
//! chosen source is logged per request; key material never is.

use std::collections::HashMap;
use std::env;
use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::warn;

/// Placeholder value shipped in env templates; never usable as a real key.
const PLACEHOLDER_KEY: &str = "YOUR_GEMINI_API_KEY";

/// Selector value that means "use the key embedded in the request".
const INLINE_SELECTOR: &str = "Custom";

/// Inline keys at or below this length are treated as garbage input and
/// ignored in favor of the default.
const MIN_INLINE_KEY_LEN: usize = 10;

/// Prefix shared by every pooled key's environment variable.
const NAMED_KEY_PREFIX: &str = "API_KEY_";

/// Which source supplied the key for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Inline,
    Named(String),
    Default,
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Inline => f.write_str("CUSTOM_USER_KEY"),
            KeySource::Named(name) => f.write_str(name),
            KeySource::Default => f.write_str("DEFAULT_FALLBACK"),
        }
    }
}

/// Server-side key material, loaded once at startup.
#[derive(Default)]
pub struct KeyPool {
    pub default: Option<SecretString>,
    named: HashMap<String, SecretString>,
}

impl KeyPool {
    /// Reads `GEMINI_API_KEY` plus every `API_KEY_*` variable. Empty values
    /// count as absent.
    pub fn from_env() -> Self {
        let default = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|value| !value.is_empty())
            .map(SecretString::from);

        let named = env::vars()
            .filter(|(name, value)| name.starts_with(NAMED_KEY_PREFIX) && !value.is_empty())
            .map(|(name, value)| (name, SecretString::from(value)))
            .collect();

        Self { default, named }
    }

    pub fn with_default(mut self, key: &str) -> Self {
        self.default = Some(SecretString::from(key));
        self
    }

    pub fn with_named(mut self, name: &str, key: &str) -> Self {
        self.named.insert(name.to_string(), SecretString::from(key));
        self
    }

    fn named_key(&self, name: &str) -> Option<&SecretString> {
        self.named
            .get(name)
            .filter(|key| !key.expose_secret().is_empty())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The default key is not configured. Selection refuses to run without
    /// it, whichever source the request asked for.
    #[error("server configuration error: API key not found")]
    MissingDefault,

    /// Selection finished but produced an empty or placeholder key.
    #[error("no valid API key after checking all sources")]
    Unusable,
}

/// A key picked for one request, tagged with where it came from.
/// `SecretString` keeps the derived `Debug` output redacted.
#[derive(Debug)]
pub struct ResolvedKey {
    pub key: SecretString,
    pub source: KeySource,
}

/// Picks the key for one request.
///
/// An inline key wins when the selector says `Custom` and the key looks
/// plausible; a short inline key silently falls back to the default. A
/// selector naming a pooled `API_KEY_*` entry uses that entry, or warns and
/// falls back when the entry is missing. Anything else uses the default.
pub fn resolve_key(
    selector: Option<&str>,
    inline: Option<&str>,
    pool: &KeyPool,
) -> Result<ResolvedKey, KeyError> {
    let default = pool
        .default
        .as_ref()
        .filter(|key| !key.expose_secret().is_empty())
        .ok_or(KeyError::MissingDefault)?;

    let (key, source) = match selector {
        Some(INLINE_SELECTOR) => match inline.filter(|key| key.len() > MIN_INLINE_KEY_LEN) {
            Some(key) => (SecretString::from(key), KeySource::Inline),
            None => (default.clone(), KeySource::Default),
        },
        Some(name) if name.starts_with(NAMED_KEY_PREFIX) => match pool.named_key(name) {
            Some(key) => (key.clone(), KeySource::Named(name.to_string())),
            None => {
                warn!(requested = name, "selected key is not configured, using default");
                (default.clone(), KeySource::Default)
            }
        },
        _ => (default.clone(), KeySource::Default),
    };

    if key.expose_secret().is_empty() || key.expose_secret() == PLACEHOLDER_KEY {
        return Err(KeyError::Unusable);
    }

    Ok(ResolvedKey { key, source })
}
