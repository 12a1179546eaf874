//! Configuration management
//!
//! The whole configuration surface is fixed at startup; there is no runtime
//! reconfiguration.

use crate::DeviceSerial;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub device: DeviceSettings,

    #[serde(default)]
    pub endpoints: EndpointSettings,

    #[serde(default)]
    pub timing: TimingSettings,

    #[serde(default)]
    pub alert: AlertSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// Serial number reported to the backend and matched against inbound
    /// ping messages
    #[serde(default = "default_serial_number")]
    pub serial_number: DeviceSerial,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            serial_number: default_serial_number(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSettings {
    /// Collection endpoint the location reports are POSTed to
    #[serde(default = "default_report_url")]
    pub report_url: String,

    /// WebSocket endpoint for the push channel
    #[serde(default = "default_push_url")]
    pub push_url: String,

    /// Geo-IP lookup service queried for the current location
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            report_url: default_report_url(),
            push_url: default_push_url(),
            lookup_url: default_lookup_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingSettings {
    /// Seconds between location report cycles
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,

    /// Minimum seconds between push channel connection attempts
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,

    /// Seconds an alert plays before being stopped
    #[serde(default = "default_alert_secs")]
    pub alert_secs: u64,

    /// Seconds to wait before the first probe/connect cycle
    #[serde(default = "default_startup_delay_secs")]
    pub startup_delay_secs: u64,

    /// Timeout for outbound HTTP requests (lookup and report)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            report_interval_secs: default_report_interval_secs(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
            alert_secs: default_alert_secs(),
            startup_delay_secs: default_startup_delay_secs(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl TimingSettings {
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.report_interval_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }

    pub fn alert_duration(&self) -> Duration {
        Duration::from_secs(self.alert_secs)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Audio clip played when a ping addressed to this device arrives
    #[serde(default = "default_clip_path")]
    pub clip_path: PathBuf,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            clip_path: default_clip_path(),
        }
    }
}

// Default value functions
fn default_serial_number() -> DeviceSerial {
    DeviceSerial("TD1-0000000-00000".to_string())
}
fn default_report_url() -> String {
    "http://127.0.0.1:8080/api/iot".to_string()
}
fn default_push_url() -> String {
    "ws://127.0.0.1:8080/websocketPath".to_string()
}
fn default_lookup_url() -> String {
    "https://ipapi.co/json/".to_string()
}
fn default_report_interval_secs() -> u64 {
    300
}
fn default_reconnect_delay_secs() -> u64 {
    20
}
fn default_alert_secs() -> u64 {
    10
}
fn default_startup_delay_secs() -> u64 {
    60
}
fn default_http_timeout_secs() -> u64 {
    15
}
fn default_clip_path() -> PathBuf {
    PathBuf::from("sound.mp3")
}

impl AgentConfig {
    /// Load configuration from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::Config(format!("Failed to read config: {}", e)))?;

        let config: AgentConfig = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file(&self, path: &std::path::Path) -> Result<(), crate::Error> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| crate::Error::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AgentConfig::default();
        assert_eq!(config.device.serial_number.as_str(), "TD1-0000000-00000");
        assert_eq!(config.timing.report_interval_secs, 300);
        assert_eq!(config.timing.reconnect_delay_secs, 20);
        assert_eq!(config.timing.alert_secs, 10);
        assert_eq!(config.timing.startup_delay_secs, 60);
    }

    #[test]
    fn test_config_serde() {
        let config = AgentConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: AgentConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.device.serial_number, config.device.serial_number);
        assert_eq!(parsed.timing.reconnect_delay_secs, 20);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: AgentConfig = toml::from_str(
            r#"
            [device]
            serial_number = "TD1-1234567-89012"

            [timing]
            report_interval_secs = 120
            "#,
        )
        .unwrap();
        assert_eq!(parsed.device.serial_number.as_str(), "TD1-1234567-89012");
        assert_eq!(parsed.timing.report_interval_secs, 120);
        // Untouched sections and fields keep their defaults
        assert_eq!(parsed.timing.reconnect_delay_secs, 20);
        assert_eq!(parsed.endpoints.lookup_url, "https://ipapi.co/json/");
        assert_eq!(parsed.alert.clip_path, PathBuf::from("sound.mp3"));
    }
}
