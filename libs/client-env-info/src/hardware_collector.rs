use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;

use crate::config::{CollectorConfig, MediaProbe};
use crate::error::ProbeError;
use crate::format::{format_bytes, format_percent};
use crate::host::{BatteryStatus, DecodingInfo, HostEnvironment, StorageEstimate, capability};
use crate::model::{
    BatteryInfo, ChargeTime, HardwareInfo, MediaCapabilityInfo, Probed, StorageInfo,
};

type MediaCapabilities = BTreeMap<String, Probed<MediaCapabilityInfo>>;

/// Collects the hardware record: concurrency, memory, GPU and the
/// asynchronous battery, storage and media probes.
pub struct HardwareInfoCollector {
    host: Arc<dyn HostEnvironment>,
    config: CollectorConfig,
}

impl HardwareInfoCollector {
    #[must_use]
    pub fn new(host: Arc<dyn HostEnvironment>, config: CollectorConfig) -> Self {
        Self { host, config }
    }

    /// Collect the hardware record. The three asynchronous probes run
    /// concurrently and each resolves to a value or a sentinel.
    pub async fn collect(&self) -> HardwareInfo {
        let navigator = self.host.navigator();

        let (battery, storage, media_capabilities) = tokio::join!(
            self.collect_battery(),
            self.collect_storage(),
            self.collect_media_capabilities(),
        );

        HardwareInfo {
            hardware_concurrency: Probed::from_option(navigator.hardware_concurrency),
            device_memory: Probed::from_option(
                navigator.device_memory.and_then(device_memory_label),
            ),
            gpu: Probed::from_probe(self.host.gpu()),
            battery,
            storage,
            media_capabilities,
        }
    }

    async fn collect_battery(&self) -> Probed<BatteryInfo> {
        Probed::from_probe(self.host.battery().await).map(battery_info)
    }

    async fn collect_storage(&self) -> Probed<StorageInfo> {
        Probed::from_probe(self.host.storage_estimate().await).map(storage_info)
    }

    async fn collect_media_capabilities(&self) -> Probed<MediaCapabilities> {
        let results = join_all(
            self.config
                .media_probes
                .iter()
                .map(|probe| self.decode_one(probe)),
        )
        .await;

        // The query itself is missing: one sentinel for the whole field
        let unsupported = !results.is_empty()
            && results
                .iter()
                .all(|(_, r)| matches!(r, Err(ProbeError::Unsupported { .. })));
        if unsupported {
            tracing::debug!(
                capability = capability::MEDIA_CAPABILITIES,
                "Capability not supported"
            );
            return Probed::NotSupported;
        }

        Probed::Value(
            results
                .into_iter()
                .map(|(probe, result)| {
                    let info = Probed::from_probe(result).map(|info| MediaCapabilityInfo {
                        content_type: probe.config.content_type.clone(),
                        supported: info.supported,
                        smooth: info.smooth,
                        power_efficient: info.power_efficient,
                    });
                    (probe.label.clone(), info)
                })
                .collect(),
        )
    }

    async fn decode_one<'a>(
        &self,
        probe: &'a MediaProbe,
    ) -> (&'a MediaProbe, Result<DecodingInfo, ProbeError>) {
        let result = self.host.decoding_info(&probe.config).await;
        (probe, result)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn battery_info(status: BatteryStatus) -> BatteryInfo {
    let percent = (status.level.clamp(0.0, 1.0) * 100.0).round() as u32;
    BatteryInfo {
        level: format!("{percent}%"),
        charging: status.charging,
        charging_time: ChargeTime::from_host(status.charging_time),
        discharging_time: ChargeTime::from_host(status.discharging_time),
    }
}

/// `"4 GB"`; nothing for a NaN, infinite or non-positive reading.
fn device_memory_label(gib: f64) -> Option<String> {
    (gib.is_finite() && gib > 0.0).then(|| format!("{gib} GB"))
}

fn storage_info(estimate: StorageEstimate) -> StorageInfo {
    let quota = estimate.quota.unwrap_or(0);
    let usage = estimate.usage.unwrap_or(0);
    StorageInfo {
        quota: format_bytes(estimate.quota),
        usage: format_bytes(estimate.usage),
        available: format_bytes(Some(quota.saturating_sub(usage))),
        usage_percent: format_percent(usage, quota),
    }
}
