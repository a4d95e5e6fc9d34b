use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, Utc};
use tracing::debug;

use super::properties::Properties;
use super::{cache_margin, compute_expiry, CacheError, CacheLookup, CachedToken, TokenStore};

const TOKEN_KEY: &str = "token";
const EXPIRE_KEY: &str = "expire";
const HEADER_COMMENT: &str = "Aiva auth0 token";

/// `yyyy-MM-dd'T'HH:mm:ss.SSSZ`, e.g. `2026-10-16T08:15:30.123+0200`.
const EXPIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Token cache kept in a properties file with `token` and `expire` entries.
///
/// No locking: concurrent runs sharing the file may overwrite each other.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    margin: Duration,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore {
            path: path.into(),
            margin: cache_margin(),
        }
    }

    pub fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_at(&self, now: DateTime<Utc>) -> CacheLookup {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return CacheLookup::NotFound,
            Err(source) => {
                return CacheLookup::Malformed(CacheError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match parse_cached(&text) {
            Ok(Some(cached)) => cached.lookup_at(now),
            Ok(None) => CacheLookup::NotFound,
            Err(err) => CacheLookup::Malformed(err),
        }
    }

    pub fn write_at(
        &self,
        now: DateTime<Utc>,
        token: &str,
        expires_in: i64,
    ) -> Result<(), CacheError> {
        let expires_at = compute_expiry(now, expires_in, self.margin)?;

        let mut props = Properties::new();
        props.set(TOKEN_KEY, token);
        props.set(EXPIRE_KEY, format_expiry(expires_at));

        let written_at = now
            .with_timezone(&Local)
            .format("%a %b %d %H:%M:%S %z %Y")
            .to_string();
        let text = props.store(&[HEADER_COMMENT, written_at.as_str()]);

        fs::write(&self.path, text).map_err(|source| CacheError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), %expires_at, "token cache written");

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> CacheLookup {
        self.read_at(Utc::now())
    }

    fn write(&mut self, token: &str, expires_in: i64) -> Result<(), CacheError> {
        self.write_at(Utc::now(), token, expires_in)
    }
}

/// `Ok(None)` when no token is stored at all.
fn parse_cached(text: &str) -> Result<Option<CachedToken>, CacheError> {
    let props = Properties::parse(text)?;

    let Some(token) = props.get(TOKEN_KEY) else {
        return Ok(None);
    };
    let expire = props
        .get(EXPIRE_KEY)
        .ok_or(CacheError::MissingKey(EXPIRE_KEY))?;

    Ok(Some(CachedToken {
        token: token.to_string(),
        expires_at: parse_expiry(expire)?,
    }))
}

fn format_expiry(expires_at: DateTime<Utc>) -> String {
    expires_at
        .with_timezone(&Local)
        .format(EXPIRE_FORMAT)
        .to_string()
}

fn parse_expiry(value: &str) -> Result<DateTime<Utc>, CacheError> {
    DateTime::parse_from_str(value, EXPIRE_FORMAT)
        .map(|expiry| expiry.with_timezone(&Utc))
        .map_err(|source| CacheError::InvalidExpiry {
            value: value.to_string(),
            source,
        })
}
