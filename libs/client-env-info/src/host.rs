//! Host capability provider.
//!
//! A [`HostEnvironment`] is the only source of raw values. Collectors never
//! reach for global state: whatever runtime they run in (a browser bridge, a
//! recorded snapshot, the local machine) is handed to them explicitly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

/// Capability names used in probe errors and log fields.
pub mod capability {
    pub const GPU: &str = "gpu";
    pub const BATTERY: &str = "battery";
    pub const STORAGE: &str = "storage";
    pub const MEDIA_CAPABILITIES: &str = "mediaCapabilities";
}

/// Navigation/environment descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigatorInfo {
    pub user_agent: String,
    pub vendor: String,
    pub platform: String,
    pub language: String,
    pub languages: Vec<String>,
    pub cookie_enabled: bool,
    pub on_line: bool,
    pub do_not_track: Option<String>,
    pub max_touch_points: u32,
    pub hardware_concurrency: Option<u32>,
    /// Approximate device memory in GiB, as browsers expose it.
    pub device_memory: Option<f64>,
}

impl Default for NavigatorInfo {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            vendor: String::new(),
            platform: String::new(),
            language: "en-US".to_owned(),
            languages: vec!["en-US".to_owned()],
            cookie_enabled: false,
            on_line: false,
            do_not_track: None,
            max_touch_points: 0,
            hardware_concurrency: None,
            device_memory: None,
        }
    }
}

/// Screen orientation as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenOrientation {
    #[serde(rename = "type")]
    pub kind: String,
    pub angle: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScreenMetrics {
    pub width: u32,
    pub height: u32,
    pub avail_width: u32,
    pub avail_height: u32,
    pub color_depth: u32,
    pub pixel_depth: u32,
    pub orientation: Option<ScreenOrientation>,
}

/// Window/viewport dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    pub inner_width: u32,
    pub inner_height: u32,
    pub device_pixel_ratio: f64,
    /// Whether the host dispatches touch events at all.
    pub touch_events: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            inner_width: 0,
            inner_height: 0,
            device_pixel_ratio: 1.0,
            touch_events: false,
        }
    }
}

/// Unmasked graphics vendor and renderer strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuRenderer {
    pub vendor: String,
    pub renderer: String,
}

/// Power status. `level` is a fraction in `0.0..=1.0`; a `None` time means
/// the host reports it as infinite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryStatus {
    pub level: f64,
    pub charging: bool,
    #[serde(default)]
    pub charging_time: Option<f64>,
    #[serde(default)]
    pub discharging_time: Option<f64>,
}

/// Storage quota estimate in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageEstimate {
    pub quota: Option<u64>,
    pub usage: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaDecodingType {
    #[default]
    File,
    MediaSource,
}

/// A video decoding configuration to ask the host about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaDecodingConfig {
    #[serde(default, rename = "type")]
    pub kind: MediaDecodingType,
    pub content_type: String,
    pub width: u32,
    pub height: u32,
    pub bitrate: u64,
    pub framerate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodingInfo {
    pub supported: bool,
    pub smooth: bool,
    pub power_efficient: bool,
}

/// Read access to the host's introspection capabilities.
///
/// Synchronous accessors describe values every host has. The optional
/// capabilities return a [`ProbeError`] when absent or failing.
#[async_trait]
pub trait HostEnvironment: Send + Sync {
    fn navigator(&self) -> NavigatorInfo;

    fn screen(&self) -> ScreenMetrics;

    fn viewport(&self) -> Viewport;

    /// IANA zone name or a UTC offset label, when the host knows one.
    fn timezone(&self) -> Option<String>;

    /// Graphics-context debug parameters.
    ///
    /// # Errors
    /// `Unsupported` without a graphics context, `Unavailable` when the
    /// context hides its debug renderer info.
    fn gpu(&self) -> Result<GpuRenderer, ProbeError>;

    /// # Errors
    /// When the host has no power-status source or reading it fails.
    async fn battery(&self) -> Result<BatteryStatus, ProbeError>;

    /// # Errors
    /// When the host has no storage-quota estimator or it rejects the call.
    async fn storage_estimate(&self) -> Result<StorageEstimate, ProbeError>;

    /// # Errors
    /// When the host has no media-capability query or it rejects `config`.
    async fn decoding_info(
        &self,
        config: &MediaDecodingConfig,
    ) -> Result<DecodingInfo, ProbeError>;
}
