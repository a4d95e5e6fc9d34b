use chrono::{DateTime, Duration, Utc};

use super::{cache_margin, compute_expiry, CacheError, CacheLookup, CachedToken, TokenStore};

/// Token store that lives only as long as the value does.
#[derive(Debug, Clone)]
pub struct MemoryTokenStore {
    cached: Option<CachedToken>,
    margin: Duration,
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        MemoryTokenStore {
            cached: None,
            margin: cache_margin(),
        }
    }
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        MemoryTokenStore::default()
    }

    /// A store that already holds `token` until `expires_at`.
    pub fn with_token(token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        MemoryTokenStore {
            cached: Some(CachedToken {
                token: token.into(),
                expires_at,
            }),
            ..MemoryTokenStore::default()
        }
    }

    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    pub fn cached(&self) -> Option<&CachedToken> {
        self.cached.as_ref()
    }

    pub fn read_at(&self, now: DateTime<Utc>) -> CacheLookup {
        match &self.cached {
            Some(cached) => cached.lookup_at(now),
            None => CacheLookup::NotFound,
        }
    }

    pub fn write_at(
        &mut self,
        now: DateTime<Utc>,
        token: &str,
        expires_in: i64,
    ) -> Result<(), CacheError> {
        self.cached = Some(CachedToken {
            token: token.to_string(),
            expires_at: compute_expiry(now, expires_in, self.margin)?,
        });
        Ok(())
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> CacheLookup {
        self.read_at(Utc::now())
    }

    fn write(&mut self, token: &str, expires_in: i64) -> Result<(), CacheError> {
        self.write_at(Utc::now(), token, expires_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store() {
        assert!(matches!(MemoryTokenStore::new().read(), CacheLookup::NotFound));
    }

    #[test]
    fn write_then_read() {
        let mut store = MemoryTokenStore::new();
        store.write("abc", 86400).unwrap();

        assert_eq!(store.read().token().unwrap().secret(), "abc");
    }

    #[test]
    fn boundary_lifetime_is_expired() {
        let mut store = MemoryTokenStore::new();
        let now = Utc::now();
        store.write_at(now, "abc", 36000).unwrap();

        assert_eq!(store.cached().unwrap().expires_at, now);
        assert!(matches!(store.read_at(now), CacheLookup::Expired));
    }

    #[test]
    fn failed_write_keeps_previous_token() {
        let expires_at = Utc::now() + Duration::hours(1);
        let mut store = MemoryTokenStore::with_token("old", expires_at);

        assert!(store.write("new", i64::MAX).is_err());
        assert_eq!(store.cached().unwrap().token, "old");
    }
}
