//! Location probe
//!
//! Performs one outbound lookup against a geo-IP service per reporting
//! cycle and tags the result with the device serial. A failed or malformed
//! lookup means "skip this cycle" for the caller, never a fatal condition.

use async_trait::async_trait;
use geobeacon_common::{DeviceSerial, Error, LocationReport, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// A source of location observations
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Perform one lookup and produce a report
    async fn probe(&self) -> Result<LocationReport>;
}

/// Response shape of the geo-IP lookup service
///
/// Only the two coordinate fields are consumed; everything else in the
/// response body is ignored. Both are optional so a missing or null field
/// surfaces as a probe error rather than a deserialization error.
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

impl LookupResponse {
    fn coordinates(&self) -> Result<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Ok((lat, lon)),
            _ => Err(Error::Probe(
                "lookup response missing latitude/longitude".to_string(),
            )),
        }
    }
}

/// Queries a geo-IP endpoint over HTTP and attaches the device serial
pub struct GeoIpProbe {
    client: Client,
    lookup_url: String,
    serial: DeviceSerial,
}

impl GeoIpProbe {
    pub fn new(lookup_url: String, serial: DeviceSerial, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            lookup_url,
            serial,
        })
    }
}

#[async_trait]
impl LocationSource for GeoIpProbe {
    async fn probe(&self) -> Result<LocationReport> {
        let response = self
            .client
            .get(&self.lookup_url)
            .send()
            .await
            .map_err(|e| Error::Probe(format!("lookup request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Probe(format!("lookup returned status {}", status)));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| Error::Probe(format!("malformed lookup response: {}", e)))?;

        let (latitude, longitude) = body.coordinates()?;
        debug!(latitude, longitude, "location lookup succeeded");

        Ok(LocationReport::new(latitude, longitude, self.serial.clone()))
    }
}
