//! Configuration types for user-digest

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use url::Url;

/// Default API host
pub const DEFAULT_BASE_URL: &str = "http://jsonplaceholder.typicode.com";

/// Default special user whose posts get comment enrichment
pub const DEFAULT_SPECIAL_USER: &str = "Ervin Howell";

/// Fetch limits for one aggregation pass
///
/// Every limit uses 0 to mean "no limit".
/// Used as a flattened sub-config within [`Config`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Number of users to fetch, by id range `1..=users_limit` (default: 10)
    #[serde(default = "default_users_limit")]
    pub users_limit: usize,

    /// Posts kept per user (default: 0 = all)
    #[serde(default)]
    pub posts_limit: usize,

    /// Comments kept per post of the special user (default: 0 = all)
    #[serde(default)]
    pub comments_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            users_limit: default_users_limit(),
            posts_limit: 0,
            comments_limit: 0,
        }
    }
}

/// HTTP transport settings
///
/// Used as a flattened sub-config within [`Config`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// API base URL (default: "http://jsonplaceholder.typicode.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Main configuration for one aggregation pass
///
/// Sub-configs are flattened, so the JSON form is a single flat object:
///
/// ```json
/// {
///   "special_user_name": "Ervin Howell",
///   "users_limit": 10,
///   "posts_limit": 0,
///   "comments_limit": 0,
///   "base_url": "http://jsonplaceholder.typicode.com",
///   "request_timeout": 30,
///   "concurrency": 1
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the user whose posts receive comments. Blank disables enrichment.
    #[serde(default = "default_special_user_name")]
    pub special_user_name: String,

    /// Users (and special-user posts) in progress at once (default: 1)
    ///
    /// 1 keeps every request strictly sequential. Larger values fetch through an
    /// ordered buffered stream, so the report is identical either way.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Fetch limits
    #[serde(flatten)]
    pub limits: LimitsConfig,

    /// HTTP transport settings
    #[serde(flatten)]
    pub http: HttpConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            special_user_name: default_special_user_name(),
            concurrency: default_concurrency(),
            limits: LimitsConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it is not valid JSON for this structure.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("invalid config file {}: {}", path.display(), e),
            key: None,
        })
    }

    /// Check the settings that would otherwise fail deep inside a pass
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.concurrency == 0 {
            return Err(Error::Config {
                message: "concurrency must be at least 1".to_string(),
                key: Some("concurrency".to_string()),
            });
        }
        if self.http.request_timeout.is_zero() {
            return Err(Error::Config {
                message: "request_timeout must be greater than zero".to_string(),
                key: Some("request_timeout".to_string()),
            });
        }
        Ok(())
    }

    /// Parsed API base URL
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.http.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {}", self.http.base_url, e),
            key: Some("base_url".to_string()),
        })
    }

    /// The special user name, or `None` when it is blank after trimming.
    ///
    /// The returned value is untrimmed: the name match itself is exact.
    pub fn special_user(&self) -> Option<&str> {
        if self.special_user_name.trim().is_empty() {
            None
        } else {
            Some(&self.special_user_name)
        }
    }
}

fn default_special_user_name() -> String {
    DEFAULT_SPECIAL_USER.to_string()
}

fn default_users_limit() -> usize {
    10
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    concat!("user-digest/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_concurrency() -> usize {
    1
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
