//! Persisted bearer token with an absolute expiry.
//!
//! The expiry written by the stores is the provider's `expires_in` counted from
//! the time of the write, minus [`cache_margin`]. A cached token is only handed
//! out while that expiry is strictly in the future.

use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use oauth2::AccessToken;
use thiserror::Error;

mod file;
mod memory;
pub mod properties;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

const CACHE_MARGIN_HOURS: i64 = 10;

/// Default margin subtracted from every computed expiry.
// TODO: confirm with the API owners whether 10h is a real renewal margin or a
// leftover timezone correction; tokens living 10h or less are never reused.
pub fn cache_margin() -> Duration {
    Duration::hours(CACHE_MARGIN_HOURS)
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("could not read token cache {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write token cache {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid properties: {0}")]
    Syntax(String),

    #[error("token cache has no `{0}` entry")]
    MissingKey(&'static str),

    #[error("invalid expiry timestamp {value:?}")]
    InvalidExpiry {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("token lifetime of {0}s is out of range")]
    LifetimeOutOfRange(i64),
}

/// Result of looking a token up in a [`TokenStore`].
#[derive(Debug)]
pub enum CacheLookup {
    /// A non-empty token whose expiry is still in the future.
    Found(AccessToken),
    /// A token is stored but its expiry is not after the check time.
    Expired,
    NotFound,
    /// The cache exists but could not be read or parsed.
    Malformed(CacheError),
}

impl CacheLookup {
    /// The usable token, if any. Every other outcome is a cache miss.
    pub fn token(self) -> Option<AccessToken> {
        match self {
            CacheLookup::Found(token) => Some(token),
            _ => None,
        }
    }
}

/// A token together with the instant after which it must not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn lookup_at(&self, now: DateTime<Utc>) -> CacheLookup {
        if self.token.is_empty() {
            CacheLookup::NotFound
        } else if self.expires_at > now {
            CacheLookup::Found(AccessToken::new(self.token.clone()))
        } else {
            CacheLookup::Expired
        }
    }
}

pub trait TokenStore {
    fn read(&self) -> CacheLookup;

    /// Stores `token`, valid for `expires_in` seconds from now minus the
    /// store's margin. Overwrites whatever was stored before.
    fn write(&mut self, token: &str, expires_in: i64) -> Result<(), CacheError>;
}

/// `now + expires_in - margin`, or an error if it leaves the representable range.
pub fn compute_expiry(
    now: DateTime<Utc>,
    expires_in: i64,
    margin: Duration,
) -> Result<DateTime<Utc>, CacheError> {
    Duration::try_seconds(expires_in)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .and_then(|expiry| expiry.checked_sub_signed(margin))
        .ok_or(CacheError::LifetimeOutOfRange(expires_in))
}
