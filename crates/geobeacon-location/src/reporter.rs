//! Reporting loop
//!
//! Runs the fixed-interval probe-and-submit cycle: probe the location
//! source, POST the report to the collection endpoint, wait, repeat.
//! Probe and submission failures skip to the next wait; they never stop
//! the loop or reach the push listener.
//!
//! A failed submission is dropped, not buffered. Whether dropped reports
//! should eventually be retried is a product decision left open upstream;
//! the current policy matches the deployed behavior.

use crate::LocationSource;
use async_trait::async_trait;
use geobeacon_common::{Error, LocationReport, Result};
use reqwest::Client;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Destination for completed location reports
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Submit one report
    async fn submit(&self, report: &LocationReport) -> Result<()>;
}

/// POSTs reports as JSON to the collection endpoint
///
/// Success is any 2xx status; everything else (including transport faults)
/// is a submission error for the caller to log.
pub struct HttpReportSink {
    client: Client,
    report_url: String,
}

impl HttpReportSink {
    pub fn new(report_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, report_url })
    }
}

#[async_trait]
impl ReportSink for HttpReportSink {
    async fn submit(&self, report: &LocationReport) -> Result<()> {
        let response = self
            .client
            .post(&self.report_url)
            .json(report)
            .send()
            .await
            .map_err(|e| Error::Submit(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::SubmitStatus(status.as_u16()))
        }
    }
}

/// Drives the periodic probe-and-report cycle
pub struct Reporter<S, K> {
    source: S,
    sink: K,
    interval: Duration,
}

impl<S: LocationSource, K: ReportSink> Reporter<S, K> {
    pub fn new(source: S, sink: K, interval: Duration) -> Self {
        Self {
            source,
            sink,
            interval,
        }
    }

    /// Run until `cancel` is set
    ///
    /// One cycle runs immediately, then once per interval. The wait is
    /// interruptible, so cancellation is observed within one interval.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "reporter started"
        );

        while !cancel.is_cancelled() {
            self.run_cycle().await;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("reporter stopped");
    }

    /// One probe-and-submit cycle
    async fn run_cycle(&self) {
        let report = match self.source.probe().await {
            Ok(report) => report,
            Err(e) => {
                warn!("location probe failed, skipping cycle: {}", e);
                return;
            }
        };

        match self.sink.submit(&report).await {
            Ok(()) => info!(
                latitude = report.latitude,
                longitude = report.longitude,
                "location report submitted"
            ),
            Err(e) => warn!("failed to submit location report: {}", e),
        }
    }
}
