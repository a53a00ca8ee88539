//! Aggregator client construction and shared request plumbing
//!
//! One [`AggregatorClient`] wraps a single connection-pooled [`reqwest::Client`]
//! bound to a base URL. Every accessor method forms its own request against that
//! base; there is no shared mutable state, so a client can be cloned cheaply and
//! calls may be issued concurrently without coordination.

use crate::consortia::{Consortium, REQ_PARAM_CONSORTIA};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default request timeout when none is configured (5000 ms)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Transport configuration for [`AggregatorClient::new`]
///
/// Only `base_url` is required. The remaining fields are passthrough transport
/// options applied to the underlying HTTP client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the aggregator REST API (e.g., "https://contentsearch.clarin.eu/rest/")
    pub base_url: String,

    /// Per-request timeout (default: 5000 ms)
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Connection establishment timeout (None = transport default)
    #[serde(default)]
    pub connect_timeout: Option<Duration>,

    /// User-Agent header value (None = transport default)
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: None,
            user_agent: None,
        }
    }
}

/// Typed client for the FCS aggregator REST API
///
/// Built once via [`AggregatorClient::new`] and passed by reference into every
/// accessor. Responses are decoded strictly: a body that is not valid JSON
/// surfaces as [`Error::Decode`], never as silently degraded text.
#[derive(Clone, Debug)]
pub struct AggregatorClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl AggregatorClient {
    /// Create a new client from a full configuration
    ///
    /// The base URL is normalized to end with a slash so that relative endpoint
    /// paths join underneath it rather than replacing its last segment.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the base URL is empty or not a valid
    /// absolute URL, and [`Error::Network`] if the transport cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::Config {
                message: "base URL must not be empty".to_string(),
                key: Some("base_url".to_string()),
            });
        }

        let mut base = config.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| Error::Config {
            message: format!("invalid base URL: {e}"),
            key: Some("base_url".to_string()),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("base URL cannot be used as a base: {base_url}"),
                key: Some("base_url".to_string()),
            });
        }

        let mut builder = reqwest::Client::builder().timeout(config.timeout);
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            timeout: config.timeout,
        })
    }

    /// Create a client for a base URL with default transport options
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    /// The effective (normalized) base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The underlying HTTP client, for requests needing raw status inspection
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolve a relative endpoint path against the base URL
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| Error::Config {
            message: format!("invalid endpoint path {path:?}: {e}"),
            key: None,
        })
    }

    /// Resolve an endpoint path, appending the consortium scoping parameter
    ///
    /// When `consortium` is `None` the returned URL carries no query string at
    /// all, not an empty one.
    pub(crate) fn scoped_endpoint(
        &self,
        path: &str,
        consortium: Option<&Consortium>,
    ) -> Result<Url> {
        let mut url = self.endpoint(path)?;
        if let Some(consortium) = consortium {
            url.query_pairs_mut()
                .append_pair(REQ_PARAM_CONSORTIA, consortium.as_str());
        }
        Ok(url)
    }

    /// Issue a GET request and strictly decode the JSON response body
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(%url, "GET");
        let response = self.http.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Issue a form-encoded POST request and strictly decode the JSON response body
    pub(crate) async fn post_form_json<T, B>(&self, url: Url, form: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!(%url, "POST");
        let response = self
            .http
            .post(url)
            .form(form)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_applies_defaults() {
        let client = AggregatorClient::with_base_url("https://fcs.example.org/rest").unwrap();
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(client.base_url().as_str(), "https://fcs.example.org/rest/");
    }

    #[test]
    fn factory_keeps_custom_timeout() {
        let client = AggregatorClient::new(ClientConfig {
            base_url: "https://fcs.example.org/rest/".to_string(),
            timeout: Duration::from_secs(30),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn factory_rejects_empty_base_url() {
        let err = AggregatorClient::with_base_url("").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = AggregatorClient::new(ClientConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn factory_rejects_unparsable_base_url() {
        let err = AggregatorClient::with_base_url("not a url").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn unscoped_endpoint_has_no_query_string() {
        let client = AggregatorClient::with_base_url("https://fcs.example.org/rest/").unwrap();
        let url = client.scoped_endpoint("resources", None).unwrap();
        assert_eq!(url.as_str(), "https://fcs.example.org/rest/resources");
        assert!(url.query().is_none());
    }

    #[test]
    fn scoped_endpoint_carries_one_consortia_param() {
        let client = AggregatorClient::with_base_url("https://fcs.example.org/rest/").unwrap();
        let scope = Consortium::from("CLARIN-D".to_string());
        let url = client.scoped_endpoint("resources", Some(&scope)).unwrap();
        let pairs: Vec<_> = url.query_pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "x-consortia");
        assert_eq!(pairs[0].1, "CLARIN-D");
    }
}
