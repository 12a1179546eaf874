//! Location probing and reporting
//!
//! This crate provides one half of the beacon's dual-channel loop:
//! - A location probe that queries a geo-IP lookup service
//! - The fixed-interval reporting loop that submits observations to the
//!   collection endpoint
//!
//! Both sides of the loop are trait seams so the cycle logic can be
//! exercised without a live network.

pub mod probe;
pub mod reporter;

pub use probe::{GeoIpProbe, LocationSource};
pub use reporter::{HttpReportSink, ReportSink, Reporter};
