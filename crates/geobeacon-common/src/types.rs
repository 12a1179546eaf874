//! Core types for Geobeacon

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque serial number identifying this device to the backend.
///
/// Exactly one serial exists per running process; it is assigned from
/// configuration at startup and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceSerial(pub String);

impl DeviceSerial {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceSerial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceSerial {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Prefix of the one recognized inbound push message.
pub const PING_PREFIX: &str = "ping: ";

/// The exact inbound message that triggers an alert for `serial`.
///
/// Any inbound message that is not byte-for-byte equal to this string is
/// inert.
pub fn ping_message(serial: &DeviceSerial) -> String {
    format!("{PING_PREFIX}{serial}")
}

/// A single location observation tagged with the device serial.
///
/// Produced by the location probe on each successful cycle, posted to the
/// collection endpoint as JSON, then dropped. Reports are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationReport {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "deviceSerialNumber")]
    pub device_serial_number: DeviceSerial,
}

impl LocationReport {
    pub fn new(latitude: f64, longitude: f64, serial: DeviceSerial) -> Self {
        Self {
            latitude,
            longitude,
            device_serial_number: serial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_serde_transparent() {
        let serial = DeviceSerial::from("TD1-0000000-00000");
        let json = serde_json::to_string(&serial).unwrap();
        assert_eq!(json, "\"TD1-0000000-00000\"");
        let parsed: DeviceSerial = serde_json::from_str(&json).unwrap();
        assert_eq!(serial, parsed);
    }

    #[test]
    fn test_ping_message_format() {
        let serial = DeviceSerial::from("TD1-0000000-00000");
        assert_eq!(ping_message(&serial), "ping: TD1-0000000-00000");
    }

    #[test]
    fn test_report_wire_field_names() {
        let report = LocationReport::new(52.37, 4.89, DeviceSerial::from("TD1-0000000-00000"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["latitude"], 52.37);
        assert_eq!(json["longitude"], 4.89);
        assert_eq!(json["deviceSerialNumber"], "TD1-0000000-00000");
    }

    #[test]
    fn test_report_roundtrip() {
        let report = LocationReport::new(-33.86, 151.2, DeviceSerial::from("TD1-1234567-89012"));
        let json = serde_json::to_string(&report).unwrap();
        let parsed: LocationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, parsed);
    }
}
