//! EFA HTTP client.
//!
//! Builds monitor URLs, hands them to a [`Transport`] and converts the
//! returned document. Errors are passed through untouched: retrying is up
//! to the caller.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{ArrivalMonitor, DepartureMonitor, WatchedStop};

use super::convert::{arrival_monitor_from_response, departure_monitor_from_response};
use super::error::EfaError;
use super::tree::Document;
use super::url::{DEFAULT_BASE_URL, Mode, stop_dm_url};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the EFA client.
#[derive(Debug, Clone)]
pub struct EfaConfig {
    /// User agent sent with every request
    pub user_agent: String,
    /// Monitor endpoint (defaults to the NVBW EFA instance)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl EfaConfig {
    /// Create a new config with the given user agent.
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing or another EFA instance).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Fetches a URL and returns the parsed document.
pub trait Transport {
    fn open(&self, url: &str) -> impl Future<Output = Result<Document, EfaError>> + Send;
}

/// Transport over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &EfaConfig) -> Result<Self, EfaError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn open(&self, url: &str) -> Result<Document, EfaError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "EFA request failed");
            return Err(EfaError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;
        Ok(Document::parse(&body)?)
    }
}

/// EFA departure monitor client.
#[derive(Debug, Clone)]
pub struct EfaClient<T = HttpTransport> {
    transport: T,
    base_url: String,
}

impl EfaClient<HttpTransport> {
    /// Create a new client talking HTTP with the given configuration.
    pub fn new(config: EfaConfig) -> Result<Self, EfaError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(transport, config.base_url))
    }
}

impl<T: Transport> EfaClient<T> {
    /// Create a client on top of any transport.
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Get the current departure monitor for a stop.
    pub async fn departure_monitor(
        &self,
        stop: &WatchedStop,
    ) -> Result<DepartureMonitor, EfaError> {
        let url = stop_dm_url(&self.base_url, stop, Mode::Departures);
        debug!(%url, stop = %stop.name, "requesting departure monitor");

        let document = self.transport.open(&url).await?;
        let monitor = departure_monitor_from_response(document.root())?;

        debug!(
            stop = %stop.name,
            departures = monitor.len(),
            cancelled = monitor.cancelled().count(),
            "departure monitor built"
        );
        Ok(monitor)
    }

    /// Get the current arrival monitor for a stop.
    pub async fn arrival_monitor(&self, stop: &WatchedStop) -> Result<ArrivalMonitor, EfaError> {
        let url = stop_dm_url(&self.base_url, stop, Mode::Arrivals);
        debug!(%url, stop = %stop.name, "requesting arrival monitor");

        let document = self.transport.open(&url).await?;
        let monitor = arrival_monitor_from_response(document.root())?;

        debug!(
            stop = %stop.name,
            arrivals = monitor.len(),
            cancelled = monitor.cancelled().count(),
            "arrival monitor built"
        );
        Ok(monitor)
    }
}
