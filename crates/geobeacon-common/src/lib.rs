//! Common types and utilities for Geobeacon
//!
//! This crate provides shared functionality across all Geobeacon components:
//! - Core types (DeviceSerial, LocationReport, ping message format)
//! - Configuration management
//! - Path resolution (XDG/systemd)
//! - Logging infrastructure
//! - Error types

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod types;

pub use config::*;
pub use error::*;
pub use paths::{config_dir, config_file};
pub use types::*;

/// Version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
