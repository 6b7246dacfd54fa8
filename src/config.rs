//! client configuration
//!
//! build a [`ClientConfig`] with an endpoint and optional overrides.
//! pass it to [`crate::Client::new`] to create a client.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// graphql endpoint of the dappio services api
pub const DEFAULT_ENDPOINT: &str = "https://services.dappio.xyz/graphql";

/// environment variable overriding the endpoint in [`ClientConfig::from_env`]
pub const ENDPOINT_ENV: &str = "DAPPIO_GRAPHQL_URL";

/// configuration for the query client
#[derive(Clone)]
pub struct ClientConfig {
    /// original endpoint input
    pub(crate) raw_endpoint: String,

    /// graphql endpoint (e.g., "<https://services.dappio.xyz/graphql>")
    pub(crate) endpoint: Url,

    /// whether the provided endpoint parsed successfully
    pub(crate) endpoint_valid: bool,

    /// request timeout; the transport default applies when unset
    pub(crate) timeout: Option<Duration>,

    /// user agent string
    pub(crate) user_agent: String,

    /// whether to verify ssl certificates
    pub(crate) verify_ssl: bool,

    /// additional headers to send with every request
    pub(crate) extra_headers: HeaderMap,

    /// prebuilt http client (takes precedence over http_client_builder)
    pub(crate) http_client: Option<reqwest::Client>,

    /// callback to customize the http client builder before building
    pub(crate) http_client_builder:
        Option<Arc<dyn Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync>>,
}

impl ClientConfig {
    /// create a new client configuration
    ///
    /// # arguments
    ///
    /// * `endpoint` - full url of the graphql endpoint (with or without trailing slash)
    ///
    /// # example
    ///
    /// ```
    /// use dappio::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://services.dappio.xyz/graphql");
    /// ```
    pub fn new(endpoint: impl AsRef<str>) -> Self {
        let endpoint_str = endpoint.as_ref();

        let normalized = endpoint_str.trim().trim_end_matches('/');

        let parsed = if normalized.contains("://") {
            Url::parse(normalized)
        } else {
            Url::parse(&format!("https://{}", normalized))
        };

        let (endpoint, endpoint_valid) = match parsed {
            Ok(url) if !normalized.is_empty() => (url, true),
            _ => (
                Url::parse(DEFAULT_ENDPOINT).expect("default endpoint parses"),
                false,
            ),
        };

        Self {
            raw_endpoint: endpoint_str.to_string(),
            endpoint,
            endpoint_valid,
            timeout: None,
            user_agent: format!("dappio-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            verify_ssl: true,
            extra_headers: HeaderMap::new(),
            http_client: None,
            http_client_builder: None,
        }
    }

    /// configuration for the public dappio endpoint
    pub fn dappio() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }

    /// configuration with the endpoint taken from `DAPPIO_GRAPHQL_URL`
    ///
    /// falls back to [`DEFAULT_ENDPOINT`] when the variable is unset or empty.
    pub fn from_env() -> Self {
        Self::new_or_default(std::env::var(ENDPOINT_ENV).ok().as_deref())
    }

    /// configuration for an optional endpoint override
    ///
    /// a missing or blank override means [`DEFAULT_ENDPOINT`].
    pub fn new_or_default(endpoint: Option<&str>) -> Self {
        match endpoint {
            Some(url) if !url.trim().is_empty() => Self::new(url),
            _ => Self::dappio(),
        }
    }

    /// the configured endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// set the request timeout
    ///
    /// default: none (whatever the transport does)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// set a custom user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// disable ssl certificate verification (not recommended for production)
    ///
    /// default: enabled
    pub fn with_ssl_verification(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    /// add a header to every request
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// add a set of headers to every request
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.extra_headers.extend(headers);
        self
    }

    /// access extra headers configured on this client
    pub fn extra_headers(&self) -> &HeaderMap {
        &self.extra_headers
    }

    /// inject a prebuilt http client.
    ///
    /// when set, this client is used as-is and takes precedence over
    /// `with_http_client_builder`. headers, tls, timeouts and the user agent
    /// all come from the prebuilt client; the matching `ClientConfig` fields
    /// are ignored.
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// customize the http client builder before the client is created.
    ///
    /// the callback receives a builder that already has the extra headers,
    /// user agent, timeout, and ssl settings applied.
    ///
    /// ignored if `with_http_client` is also set.
    pub fn with_http_client_builder<F>(mut self, f: F) -> Self
    where
        F: Fn(reqwest::ClientBuilder) -> reqwest::ClientBuilder + Send + Sync + 'static,
    {
        self.http_client_builder = Some(Arc::new(f));
        self
    }

    /// validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if !self.endpoint_valid {
            return Err(Error::Config(format!(
                "invalid endpoint: {}",
                self.raw_endpoint
            )));
        }

        if self.endpoint.scheme() != "http" && self.endpoint.scheme() != "https" {
            return Err(Error::Config(format!(
                "invalid url scheme: {}. must be http or https",
                self.endpoint.scheme()
            )));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::dappio()
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("verify_ssl", &self.verify_ssl)
            .field("extra_headers", &self.extra_headers.len())
            .field("http_client", &self.http_client.is_some())
            .field("http_client_builder", &self.http_client_builder.is_some())
            .finish()
    }
}
