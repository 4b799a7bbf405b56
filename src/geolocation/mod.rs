//! Best-effort IP geolocation for the dispatching host
//!
//! Resolution queries a public IP-geolocation endpoint over HTTP. A failed
//! or empty lookup is a legitimate outcome rather than a failure of the
//! caller: an alert without a coordinate is still sent, just without a
//! location line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default lookup endpoint. Responds with JSON carrying `lat`/`lon` for
/// the caller's public IP.
const DEFAULT_ENDPOINT: &str = "http://ip-api.com/json";

/// Errors that can occur during a host geolocation lookup
#[derive(Error, Debug)]
pub enum GeoError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Lookup returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Lookup response carried no coordinate")]
    MissingCoordinate,
}

/// A geographic coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// HTTP client for resolving the dispatching host's approximate location
///
/// # Example
///
/// ```ignore
/// use medinnovate::geolocation::GeoLookupService;
///
/// let service = GeoLookupService::new();
/// if let Some(location) = service.resolve_current_host().await {
///     println!("Dispatching from {}", location);
/// }
/// ```
pub struct GeoLookupService {
    client: reqwest::Client,
    endpoint: String,
}

impl GeoLookupService {
    /// Create a service against the default public endpoint.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Create a service against a specific endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        GeoLookupService {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
        }
    }

    /// Look up the approximate coordinate of this host's public IP.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success upstream
    /// status, or a response without both coordinate fields.
    pub async fn lookup(&self) -> Result<GeoLocation, GeoError> {
        let response = self.client.get(&self.endpoint).send().await?;
        if !response.status().is_success() {
            return Err(GeoError::UpstreamStatus(response.status()));
        }

        let body: LookupResponse = response.json().await?;
        if let Some(status) = body.status.as_deref() {
            if status != "success" {
                return Err(GeoError::MissingCoordinate);
            }
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(GeoLocation { latitude, longitude }),
            _ => Err(GeoError::MissingCoordinate),
        }
    }

    /// Look up the host coordinate, returning None instead of an error.
    ///
    /// This is the variant dispatch uses: absence of a location degrades
    /// the alert message, it never aborts the dispatch.
    pub async fn resolve_current_host(&self) -> Option<GeoLocation> {
        match self.lookup().await {
            Ok(location) => Some(location),
            Err(e) => {
                log::warn!("Host geolocation failed: {}", e);
                None
            }
        }
    }
}

impl Default for GeoLookupService {
    fn default() -> Self {
        Self::new()
    }
}
