//! Resource client: one HTTP GET per call, JSON in, typed errors out.
//!
//! [`ResourceSource`] is the seam between the fetchers and the transport.
//! [`HttpClient`] is the reqwest-backed implementation used by the binary.

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::debug;
use url::Url;

/// A GET request against one collection endpoint, optionally filtered by one
/// integer query parameter (e.g., `/posts?userId=3`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceRequest {
    /// Collection path relative to the base URL, without a leading slash
    pub path: &'static str,
    /// Optional `(name, value)` query filter
    pub filter: Option<(&'static str, u64)>,
}

impl ResourceRequest {
    /// Request every record of a collection
    pub const fn all(path: &'static str) -> Self {
        Self { path, filter: None }
    }

    /// Request the records of a collection whose `name` field equals `value`
    pub const fn filtered(path: &'static str, name: &'static str, value: u64) -> Self {
        Self {
            path,
            filter: Some((name, value)),
        }
    }
}

impl fmt::Display for ResourceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.filter {
            Some((name, value)) => write!(f, "/{}?{}={}", self.path, name, value),
            None => write!(f, "/{}", self.path),
        }
    }
}

/// Source of JSON resources
///
/// Implementations perform exactly one fetch per call and never retry.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Fetch the JSON document for `request`
    async fn fetch(&self, request: ResourceRequest) -> Result<serde_json::Value>;

    /// Location of `request` as reported in errors.
    ///
    /// Defaults to the relative form (`/posts?userId=3`).
    fn locate(&self, request: ResourceRequest) -> String {
        request.to_string()
    }
}

/// Fetch `request` and decode the body into `T`.
///
/// A body that is valid JSON but has the wrong shape is reported as
/// [`Error::Decode`], same as a body that is not JSON at all.
pub async fn fetch_as<S, T>(source: &S, request: ResourceRequest) -> Result<T>
where
    S: ResourceSource + ?Sized,
    T: DeserializeOwned,
{
    let value = source.fetch(request).await?;
    serde_json::from_value(value).map_err(|e| Error::decode(&source.locate(request), e))
}

/// Reqwest-backed [`ResourceSource`]
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a client for the configured base URL with the configured timeout
    /// and user agent.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL '{}': {}", config.base_url, e),
            key: Some("base_url".to_string()),
        })?;

        // Url::join replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;

        Ok(Self { client, base_url })
    }

    /// The normalized base URL (always ends with `/`)
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a request
    pub fn url_for(&self, request: ResourceRequest) -> Result<Url> {
        let mut url = self.base_url.join(request.path).map_err(|e| Error::Config {
            message: format!("cannot join '{}' onto base URL: {}", request.path, e),
            key: Some("base_url".to_string()),
        })?;
        if let Some((name, value)) = request.filter {
            url.query_pairs_mut().append_pair(name, &value.to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl ResourceSource for HttpClient {
    async fn fetch(&self, request: ResourceRequest) -> Result<serde_json::Value> {
        let url = self.url_for(request)?;
        debug!(url = %url, "Fetching resource");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::transport(url.as_str(), &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(url.as_str(), &e))?;

        serde_json::from_slice(&body).map_err(|e| Error::decode(url.as_str(), e))
    }

    fn locate(&self, request: ResourceRequest) -> String {
        match self.url_for(request) {
            Ok(url) => url.to_string(),
            Err(_) => request.to_string(),
        }
    }
}
