// Database configuration (environment-first, typed defaults)

use feedcycle_core::port::InitializationError;
use std::time::Duration;

pub const ENV_DB_URL: &str = "FEEDCYCLE_DB_URL";
pub const ENV_DB_MAX_CONNECTIONS: &str = "FEEDCYCLE_DB_MAX_CONNECTIONS";

pub const DEFAULT_DB_PATH: &str = "~/.feedcycle/documents.db";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for the document database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: expand_url(DEFAULT_DB_PATH),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

impl DatabaseConfig {
    /// In-memory database (tests, dry runs)
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            ..Default::default()
        }
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: expand_url(&url.into()),
            ..Default::default()
        }
    }

    /// Resolve from `FEEDCYCLE_DB_URL` / `FEEDCYCLE_DB_MAX_CONNECTIONS`
    pub fn from_env() -> Result<Self, InitializationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), with `url` taking the place of
    /// `FEEDCYCLE_DB_URL` when given; the remaining variables still apply
    pub fn from_env_with_url(url: Option<&str>) -> Result<Self, InitializationError> {
        Self::resolve(url, |key| std::env::var(key).ok())
    }

    pub(crate) fn resolve(
        url: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, InitializationError> {
        match url {
            Some(url) => Self::from_lookup(|key| {
                if key == ENV_DB_URL {
                    Some(url.to_string())
                } else {
                    lookup(key)
                }
            }),
            None => Self::from_lookup(lookup),
        }
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, InitializationError> {
        let mut config = match lookup(ENV_DB_URL) {
            Some(url) if url.trim().is_empty() => {
                return Err(InitializationError::Config(format!(
                    "{} is set but empty",
                    ENV_DB_URL
                )));
            }
            Some(url) => Self::with_url(url),
            None => Self::default(),
        };

        if let Some(raw) = lookup(ENV_DB_MAX_CONNECTIONS) {
            config.max_connections = match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(InitializationError::Config(format!(
                        "{} must be a positive integer, got {:?}",
                        ENV_DB_MAX_CONNECTIONS, raw
                    )));
                }
            };
        }

        Ok(config)
    }

    /// Every connection to `:memory:` opens a separate database
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }

    /// Pool size actually used (in-memory databases share one connection)
    pub fn effective_max_connections(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections
        }
    }
}

/// Expand a leading `~` in the path part; bare paths get the `sqlite://` scheme
fn expand_url(url: &str) -> String {
    if url.starts_with("sqlite::memory:") {
        return url.to_string();
    }
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    format!("sqlite://{}", shellexpand::tilde(path))
}
