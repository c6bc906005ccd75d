//! Smart-home device model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error when an unknown device type is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid device type: \"{input}\". Valid types are: thermostat, vacuum, camera, coffee, ac, light, tv")]
pub struct InvalidDeviceTypeError {
    pub input: String,
}

/// Device categories known to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Thermostat,
    Vacuum,
    Camera,
    Coffee,
    Ac,
    Light,
    Tv,
    /// A type this client does not know yet
    #[serde(other)]
    Other,
}

impl DeviceType {
    /// All types a device can be created with
    pub const CREATABLE: [DeviceType; 7] = [
        Self::Thermostat,
        Self::Vacuum,
        Self::Camera,
        Self::Coffee,
        Self::Ac,
        Self::Light,
        Self::Tv,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Thermostat => "thermostat",
            Self::Vacuum => "vacuum",
            Self::Camera => "camera",
            Self::Coffee => "coffee",
            Self::Ac => "ac",
            Self::Light => "light",
            Self::Tv => "tv",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = InvalidDeviceTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::CREATABLE
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| InvalidDeviceTypeError {
                input: s.to_string(),
            })
    }
}

/// A device as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    #[serde(default)]
    pub is_on: bool,
    #[serde(default)]
    pub value: Option<f64>,
}

impl Device {
    /// One-line status: power, optional value, type
    pub fn status_line(&self) -> String {
        let mut parts = vec![if self.is_on { "on" } else { "off" }.to_string()];
        if let Some(value) = self.value {
            parts.push(format!("value: {}", value));
        }
        parts.push(format!("type: {}", self.device_type));
        parts.join(" • ")
    }
}

/// Request body for creating a device
#[derive(Debug, Clone, Serialize)]
pub struct NewDevice {
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub name: String,
    pub is_on: bool,
}

impl NewDevice {
    /// Fallback name when none is given
    pub const DEFAULT_NAME: &'static str = "New device";

    pub fn new(device_type: DeviceType, name: Option<&str>) -> Self {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(Self::DEFAULT_NAME);
        Self {
            device_type,
            name: name.to_string(),
            is_on: false,
        }
    }
}
