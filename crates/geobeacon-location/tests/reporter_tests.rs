//! Reporting loop behavior tests
//!
//! These run under a paused tokio clock, so interval timing is exact and
//! the tests complete instantly.

use async_trait::async_trait;
use geobeacon_common::{DeviceSerial, Error, LocationReport, Result};
use geobeacon_location::{LocationSource, ReportSink, Reporter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const INTERVAL: Duration = Duration::from_secs(300);

/// Source that always produces a fix, counting probe calls
struct FixedSource {
    probes: Arc<AtomicUsize>,
}

#[async_trait]
impl LocationSource for FixedSource {
    async fn probe(&self) -> Result<LocationReport> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Ok(LocationReport::new(
            52.37,
            4.89,
            DeviceSerial::from("TD1-0000000-00000"),
        ))
    }
}

/// Source that always fails, counting probe calls
struct BrokenSource {
    probes: Arc<AtomicUsize>,
}

#[async_trait]
impl LocationSource for BrokenSource {
    async fn probe(&self) -> Result<LocationReport> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        Err(Error::Probe("lookup response missing latitude/longitude".to_string()))
    }
}

/// Sink that records submitted reports, optionally rejecting them all
struct RecordingSink {
    reports: Arc<Mutex<Vec<LocationReport>>>,
    reject_status: Option<u16>,
}

#[async_trait]
impl ReportSink for RecordingSink {
    async fn submit(&self, report: &LocationReport) -> Result<()> {
        self.reports.lock().unwrap().push(report.clone());
        match self.reject_status {
            Some(status) => Err(Error::SubmitStatus(status)),
            None => Ok(()),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn submits_once_per_interval() {
    let probes = Arc::new(AtomicUsize::new(0));
    let reports = Arc::new(Mutex::new(Vec::new()));
    let reporter = Reporter::new(
        FixedSource {
            probes: probes.clone(),
        },
        RecordingSink {
            reports: reports.clone(),
            reject_status: None,
        },
        INTERVAL,
    );

    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let handle = tokio::spawn(async move { reporter.run(loop_cancel).await });

    // Cycles run at t=0, 300, 600, 900
    tokio::time::sleep(INTERVAL * 3 + Duration::from_secs(50)).await;
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(probes.load(Ordering::SeqCst), 4);
    let reports = reports.lock().unwrap();
    assert_eq!(reports.len(), 4);
    assert_eq!(
        reports[0].device_serial_number,
        DeviceSerial::from("TD1-0000000-00000")
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_wait_stops_loop() {
    let probes = Arc::new(AtomicUsize::new(0));
    let reports = Arc::new(Mutex::new(Vec::new()));
    let reporter = Reporter::new(
        FixedSource {
            probes: probes.clone(),
        },
        RecordingSink {
            reports: reports.clone(),
            reject_status: None,
        },
        INTERVAL,
    );

    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let handle = tokio::spawn(async move { reporter.run(loop_cancel).await });

    // First cycle has run; the loop is now in its interval wait
    tokio::time::sleep(Duration::from_secs(10)).await;
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(reports.lock().unwrap().len(), 1);

    // Well past the next interval boundary: no further submissions
    tokio::time::sleep(INTERVAL * 2).await;
    assert_eq!(reports.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn failed_probe_skips_submission_but_not_the_loop() {
    let probes = Arc::new(AtomicUsize::new(0));
    let reports = Arc::new(Mutex::new(Vec::new()));
    let reporter = Reporter::new(
        BrokenSource {
            probes: probes.clone(),
        },
        RecordingSink {
            reports: reports.clone(),
            reject_status: None,
        },
        INTERVAL,
    );

    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let handle = tokio::spawn(async move { reporter.run(loop_cancel).await });

    tokio::time::sleep(INTERVAL * 2 + Duration::from_secs(50)).await;
    cancel.cancel();
    handle.await.unwrap();

    // The loop kept cycling (t=0, 300, 600) but nothing was submitted
    assert_eq!(probes.load(Ordering::SeqCst), 3);
    assert!(reports.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn rejected_submission_does_not_stop_the_loop() {
    let probes = Arc::new(AtomicUsize::new(0));
    let reports = Arc::new(Mutex::new(Vec::new()));
    let reporter = Reporter::new(
        FixedSource {
            probes: probes.clone(),
        },
        RecordingSink {
            reports: reports.clone(),
            reject_status: Some(503),
        },
        INTERVAL,
    );

    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let handle = tokio::spawn(async move { reporter.run(loop_cancel).await });

    tokio::time::sleep(INTERVAL * 2 + Duration::from_secs(50)).await;
    cancel.cancel();
    handle.await.unwrap();

    // Every cycle attempted a submission despite the 503s
    assert_eq!(reports.lock().unwrap().len(), 3);
}
