//! Device location capability.
//!
//! A provider answers one-shot fix requests and enforces the request's
//! timeout itself, so callers never wait longer than they asked for.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LocationConfig;

/// A single geolocation sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    pub lat: f64,
    pub lng: f64,
}

/// Options for a one-shot fix request.
#[derive(Debug, Clone, Copy)]
pub struct FixRequest {
    /// Ask the provider for its most precise answer, where it has a choice.
    pub high_accuracy: bool,
    /// Upper bound on the whole request, enforced by the provider.
    pub timeout: Duration,
}

impl Default for FixRequest {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
        }
    }
}

/// Why a fix request produced no coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    /// The capability is disabled or absent on this system.
    Unsupported,
    /// The provider refused the request.
    Denied(String),
    /// The provider failed to produce a fix.
    Unavailable(String),
    /// No fix arrived within the requested timeout.
    Timeout,
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported => write!(f, "location lookup is not supported"),
            Self::Denied(reason) => write!(f, "location request denied: {reason}"),
            Self::Unavailable(reason) => write!(f, "location unavailable: {reason}"),
            Self::Timeout => write!(f, "location request timed out"),
        }
    }
}

impl std::error::Error for LocationError {}

/// Source of one-shot location fixes.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Whether the capability is present at all.
    fn supported(&self) -> bool;

    /// Request a single fix. Resolves within `request.timeout`.
    async fn request_fix(&self, request: FixRequest) -> Result<LocationFix, LocationError>;
}

const IP_API_ENDPOINT: &str = "http://ip-api.com/json?fields=status,message,lat,lon";

/// Coarse location from the machine's public IP address.
///
/// ip-api.com answers without an API key. IP lookup has a single precision,
/// so the high-accuracy hint changes nothing here.
pub struct IpLocationProvider {
    client: reqwest::Client,
    endpoint: String,
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpLocationProvider {
    pub fn new(config: &LocationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: IP_API_ENDPOINT.to_string(),
            enabled: config.enabled,
        }
    }

    async fn lookup(&self) -> Result<LocationFix, LocationError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|error| LocationError::Unavailable(error.to_string()))?;
        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|error| LocationError::Unavailable(error.to_string()))?;

        if body.status != "success" {
            let reason = body
                .message
                .unwrap_or_else(|| "lookup refused".to_string());
            return Err(LocationError::Denied(reason));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lng)) => Ok(LocationFix { lat, lng }),
            _ => Err(LocationError::Unavailable(
                "response carried no coordinates".to_string(),
            )),
        }
    }
}

#[async_trait]
impl LocationProvider for IpLocationProvider {
    fn supported(&self) -> bool {
        self.enabled
    }

    async fn request_fix(&self, request: FixRequest) -> Result<LocationFix, LocationError> {
        match tokio::time::timeout(request.timeout, self.lookup()).await {
            Ok(result) => result,
            Err(_) => Err(LocationError::Timeout),
        }
    }
}

/// Scripted provider for tests.
#[cfg(test)]
pub struct StubProvider {
    supported: bool,
    response: Option<Result<LocationFix, LocationError>>,
}

#[cfg(test)]
impl StubProvider {
    pub fn fix(lat: f64, lng: f64) -> Self {
        Self {
            supported: true,
            response: Some(Ok(LocationFix { lat, lng })),
        }
    }

    pub fn failing(error: LocationError) -> Self {
        Self {
            supported: true,
            response: Some(Err(error)),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            response: None,
        }
    }

    /// Never resolves; pairs with cancellation tests.
    pub fn hanging() -> Self {
        Self {
            supported: true,
            response: None,
        }
    }
}

#[cfg(test)]
#[async_trait]
impl LocationProvider for StubProvider {
    fn supported(&self) -> bool {
        self.supported
    }

    async fn request_fix(&self, _request: FixRequest) -> Result<LocationFix, LocationError> {
        match &self.response {
            Some(response) => response.clone(),
            None => std::future::pending().await,
        }
    }
}
