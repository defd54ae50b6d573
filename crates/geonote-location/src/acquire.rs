//! Coordinate acquisition.
//!
//! A `LocationAcquirer` holds an ordered list of position sources and returns
//! the first fix any of them produces. The usual order is a precise device
//! fix followed by an IP lookup.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::http::get_json;
use crate::types::{AcquireError, Coordinate, LookupError, PositionError};

pub const IP_API_URL: &str = "http://ip-api.com/json";

/// Default bound on waiting for a device fix
pub const DEFAULT_POSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// One way of obtaining a coordinate fix.
#[async_trait]
pub trait PositionSource: Send + Sync {
    fn name(&self) -> &str;

    async fn locate(&self) -> Result<Coordinate, PositionError>;
}

/// Options passed to the device positioning service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRequest {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached reading the caller will accept
    pub maximum_age: Duration,
}

/// A reading from the device positioning service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceFix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
    pub timestamp: DateTime<Utc>,
}

/// Host positioning capability (GPS, OS location service, ...).
#[async_trait]
pub trait DevicePositioner: Send + Sync {
    async fn current_position(&self, request: &PositionRequest) -> Result<DeviceFix, PositionError>;
}

/// Positioner for hosts without a positioning service.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPositioner;

#[async_trait]
impl DevicePositioner for UnsupportedPositioner {
    async fn current_position(&self, _request: &PositionRequest) -> Result<DeviceFix, PositionError> {
        Err(PositionError::Unsupported)
    }
}

/// Positioner that reports a fix supplied by the host, stamped at request time.
#[derive(Debug, Clone, Copy)]
pub struct StaticPositioner {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
}

#[async_trait]
impl DevicePositioner for StaticPositioner {
    async fn current_position(&self, _request: &PositionRequest) -> Result<DeviceFix, PositionError> {
        Ok(DeviceFix {
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy_meters: self.accuracy_meters,
            timestamp: Utc::now(),
        })
    }
}

/// High-accuracy device fix, fresh readings only.
pub struct PreciseSource {
    positioner: Arc<dyn DevicePositioner>,
    request: PositionRequest,
}

impl PreciseSource {
    pub fn new(positioner: Arc<dyn DevicePositioner>, timeout: Duration) -> Self {
        Self {
            positioner,
            request: PositionRequest {
                high_accuracy: true,
                timeout,
                maximum_age: Duration::ZERO,
            },
        }
    }
}

#[async_trait]
impl PositionSource for PreciseSource {
    fn name(&self) -> &str {
        "device"
    }

    async fn locate(&self) -> Result<Coordinate, PositionError> {
        let requested_at = Utc::now();

        let fix = tokio::time::timeout(
            self.request.timeout,
            self.positioner.current_position(&self.request),
        )
        .await
        .map_err(|_| PositionError::Timeout)??;

        let max_age = chrono::Duration::from_std(self.request.maximum_age)
            .unwrap_or_else(|_| chrono::Duration::zero());
        if fix.timestamp < requested_at - max_age {
            return Err(PositionError::Stale);
        }

        Ok(Coordinate::precise(
            fix.latitude,
            fix.longitude,
            fix.accuracy_meters,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Coarse position from the caller's public IP address.
#[derive(Debug, Clone)]
pub struct IpLookupSource {
    client: Client,
    url: String,
}

impl IpLookupSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn lookup(&self) -> Result<Coordinate, LookupError> {
        let body: IpApiResponse = get_json(self.client.get(&self.url)).await?;

        if body.status == "fail" {
            return Err(LookupError::Provider(
                body.message
                    .unwrap_or_else(|| "IP lookup failed".to_string()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => Ok(Coordinate::approximate(lat, lon)),
            _ => Err(LookupError::InvalidResponse(
                "missing lat/lon in IP lookup".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PositionSource for IpLookupSource {
    fn name(&self) -> &str {
        "ip"
    }

    async fn locate(&self) -> Result<Coordinate, PositionError> {
        Ok(self.lookup().await?)
    }
}

/// Tries each source in order; the first fix wins.
#[derive(Clone)]
pub struct LocationAcquirer {
    sources: Vec<Arc<dyn PositionSource>>,
}

impl LocationAcquirer {
    pub fn new(sources: Vec<Arc<dyn PositionSource>>) -> Self {
        Self { sources }
    }

    /// Device positioning first, then IP lookup.
    pub fn with_fallback(precise: PreciseSource, fallback: IpLookupSource) -> Self {
        Self::new(vec![Arc::new(precise), Arc::new(fallback)])
    }

    /// Acquire one fix. Individual failures are logged and collapsed into
    /// `AcquireError::Unavailable`.
    pub async fn acquire(&self) -> Result<Coordinate, AcquireError> {
        for source in &self.sources {
            match source.locate().await {
                Ok(coordinate) => {
                    tracing::info!(
                        source = source.name(),
                        approximate = coordinate.approximate,
                        accuracy = coordinate.accuracy_meters,
                        "Got location fix"
                    );
                    return Ok(coordinate);
                }
                Err(e) => {
                    tracing::debug!(source = source.name(), "Position source failed: {}", e);
                }
            }
        }

        tracing::warn!("All position sources failed");
        Err(AcquireError::Unavailable)
    }
}
