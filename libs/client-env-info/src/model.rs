use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::classify::{BrowserFamily, DeviceType, OsFamily};
use crate::error::ProbeError;
use crate::host::{GpuRenderer, ScreenOrientation};

/// Sentinel for a capability the host does not offer.
pub const NOT_SUPPORTED: &str = "Not supported";
/// Sentinel for a capability whose probe failed or yielded nothing.
pub const NOT_AVAILABLE: &str = "Not available";
/// Classifier fallback label.
pub const UNKNOWN: &str = "Unknown";

/// A probed value or the fallback sentinel that replaces it.
///
/// Serializes untagged: either the value itself or the sentinel string.
#[derive(Debug, Clone, PartialEq)]
pub enum Probed<T> {
    Value(T),
    NotSupported,
    NotAvailable,
}

impl<T> Probed<T> {
    /// Fold a probe result into a value or sentinel, logging the cause.
    #[must_use]
    pub fn from_probe(result: Result<T, ProbeError>) -> Self {
        match result {
            Ok(value) => Self::Value(value),
            Err(e @ ProbeError::Unsupported { .. }) => {
                tracing::debug!(capability = e.capability(), "Capability not supported");
                Self::NotSupported
            }
            Err(e) => {
                tracing::debug!(capability = e.capability(), error = %e, "Probe failed");
                Self::NotAvailable
            }
        }
    }

    /// `Value` when present, `NotAvailable` otherwise.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(Self::NotAvailable, Self::Value)
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Probed<U> {
        match self {
            Self::Value(v) => Probed::Value(f(v)),
            Self::NotSupported => Probed::NotSupported,
            Self::NotAvailable => Probed::NotAvailable,
        }
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::NotSupported | Self::NotAvailable => None,
        }
    }

    /// The sentinel string, if this is not a value.
    #[must_use]
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            Self::Value(_) => None,
            Self::NotSupported => Some(NOT_SUPPORTED),
            Self::NotAvailable => Some(NOT_AVAILABLE),
        }
    }
}

impl<T: Serialize> Serialize for Probed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::NotSupported => serializer.serialize_str(NOT_SUPPORTED),
            Self::NotAvailable => serializer.serialize_str(NOT_AVAILABLE),
        }
    }
}

/// Base environment record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub user_agent: String,
    pub platform: String,
    pub vendor: String,
    pub language: String,
    pub languages: Vec<String>,
    pub cookie_enabled: bool,
    pub online: bool,
    pub do_not_track: String,
    pub timezone: Probed<String>,
    pub device_type: DeviceType,
    pub os: OsFamily,
    pub browser: BrowserFamily,
    pub screen: ScreenInfo,
    pub viewport: ViewportInfo,
    pub touch_support: TouchSupport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    pub width: u32,
    pub height: u32,
    pub avail_width: u32,
    pub avail_height: u32,
    pub color_depth: u32,
    pub pixel_depth: u32,
    pub orientation: Probed<ScreenOrientation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportInfo {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchSupport {
    pub has_touch: bool,
    pub max_touch_points: u32,
}

/// Hardware record layered on top of [`DeviceInfo`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareInfo {
    pub hardware_concurrency: Probed<u32>,
    pub device_memory: Probed<String>,
    pub gpu: Probed<GpuRenderer>,
    pub battery: Probed<BatteryInfo>,
    pub storage: Probed<StorageInfo>,
    pub media_capabilities: Probed<BTreeMap<String, Probed<MediaCapabilityInfo>>>,
}

/// Seconds until a battery transition, or never.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeTime {
    Seconds(u64),
    Infinite,
}

impl ChargeTime {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_host(seconds: Option<f64>) -> Self {
        match seconds {
            Some(s) if s.is_finite() && s >= 0.0 => Self::Seconds(s.round() as u64),
            _ => Self::Infinite,
        }
    }
}

impl Serialize for ChargeTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Seconds(s) => serializer.serialize_u64(*s),
            Self::Infinite => serializer.serialize_str("Infinity"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryInfo {
    /// Charge level, e.g. `"85%"`.
    pub level: String,
    pub charging: bool,
    pub charging_time: ChargeTime,
    pub discharging_time: ChargeTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub quota: String,
    pub usage: String,
    pub available: String,
    pub usage_percent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaCapabilityInfo {
    pub content_type: String,
    pub supported: bool,
    pub smooth: bool,
    pub power_efficient: bool,
}

/// Merged record: device fields, then hardware fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvReport {
    #[serde(flatten)]
    pub device: DeviceInfo,
    #[serde(flatten)]
    pub hardware: HardwareInfo,
    pub collected_at: chrono::DateTime<chrono::Utc>,
}
