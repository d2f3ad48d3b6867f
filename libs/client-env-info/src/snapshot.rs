//! Declarative host described by data.
//!
//! A [`HostSnapshot`] answers every probe from recorded values. It is what
//! the CLI replays from a YAML/JSON file and what tests use as a fake host.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::CollectorConfig;
use crate::error::ProbeError;
use crate::host::{
    BatteryStatus, DecodingInfo, GpuRenderer, HostEnvironment, MediaDecodingConfig,
    NavigatorInfo, ScreenMetrics, StorageEstimate, Viewport, capability,
};

/// Recorded outcome of one optional probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotProbe<T> {
    Unsupported,
    Unavailable(String),
    Fails(String),
    Value(T),
}

impl<T> Default for SnapshotProbe<T> {
    fn default() -> Self {
        Self::Unsupported
    }
}

impl<T: Clone> SnapshotProbe<T> {
    fn resolve(&self, capability: &'static str) -> Result<T, ProbeError> {
        match self {
            Self::Unsupported => Err(ProbeError::unsupported(capability)),
            Self::Unavailable(reason) => Err(ProbeError::unavailable(capability, reason.clone())),
            Self::Fails(message) => Err(ProbeError::failed(capability, message)),
            Self::Value(v) => Ok(v.clone()),
        }
    }

    fn record(result: Result<T, ProbeError>) -> Self {
        match result {
            Ok(v) => Self::Value(v),
            Err(ProbeError::Unsupported { .. }) => Self::Unsupported,
            Err(ProbeError::Unavailable { reason, .. }) => Self::Unavailable(reason),
            Err(ProbeError::Failed { message, .. }) => Self::Fails(message),
        }
    }
}

/// Host capabilities captured as plain data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostSnapshot {
    pub navigator: NavigatorInfo,
    pub screen: ScreenMetrics,
    pub viewport: Viewport,
    pub timezone: Option<String>,
    pub gpu: SnapshotProbe<GpuRenderer>,
    pub battery: SnapshotProbe<BatteryStatus>,
    pub storage: SnapshotProbe<StorageEstimate>,
    /// Decoder answers keyed by content type.
    pub media: SnapshotProbe<BTreeMap<String, DecodingInfo>>,
}

impl HostSnapshot {
    /// Record every probe of `host`, asking the media query about the
    /// configurations in `config`.
    pub async fn capture(host: &dyn HostEnvironment, config: &CollectorConfig) -> Self {
        let mut decoders = BTreeMap::new();
        let mut media_error = None;
        for probe in &config.media_probes {
            match host.decoding_info(&probe.config).await {
                Ok(info) => {
                    decoders.insert(probe.config.content_type.clone(), info);
                }
                Err(e) => {
                    tracing::debug!(
                        capability = capability::MEDIA_CAPABILITIES,
                        content_type = %probe.config.content_type,
                        error = %e,
                        "Media probe not recorded"
                    );
                    media_error.get_or_insert(e);
                }
            }
        }
        let media = match media_error {
            Some(e) if decoders.is_empty() => SnapshotProbe::record(Err(e)),
            _ => SnapshotProbe::Value(decoders),
        };

        Self {
            navigator: host.navigator(),
            screen: host.screen(),
            viewport: host.viewport(),
            timezone: host.timezone(),
            gpu: SnapshotProbe::record(host.gpu()),
            battery: SnapshotProbe::record(host.battery().await),
            storage: SnapshotProbe::record(host.storage_estimate().await),
            media,
        }
    }
}

#[async_trait]
impl HostEnvironment for HostSnapshot {
    fn navigator(&self) -> NavigatorInfo {
        self.navigator.clone()
    }

    fn screen(&self) -> ScreenMetrics {
        self.screen.clone()
    }

    fn viewport(&self) -> Viewport {
        self.viewport.clone()
    }

    fn timezone(&self) -> Option<String> {
        self.timezone.clone()
    }

    fn gpu(&self) -> Result<GpuRenderer, ProbeError> {
        self.gpu.resolve(capability::GPU)
    }

    async fn battery(&self) -> Result<BatteryStatus, ProbeError> {
        self.battery.resolve(capability::BATTERY)
    }

    async fn storage_estimate(&self) -> Result<StorageEstimate, ProbeError> {
        self.storage.resolve(capability::STORAGE)
    }

    async fn decoding_info(
        &self,
        config: &MediaDecodingConfig,
    ) -> Result<DecodingInfo, ProbeError> {
        // An unknown content type is a decoder that says no, not a failure
        self.media
            .resolve(capability::MEDIA_CAPABILITIES)
            .map(|decoders| {
                decoders
                    .get(&config.content_type)
                    .copied()
                    .unwrap_or_default()
            })
    }
}
