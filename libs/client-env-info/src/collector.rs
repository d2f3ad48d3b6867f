use crate::config::CollectorConfig;
use crate::device_collector::DeviceInfoCollector;
use crate::hardware_collector::HardwareInfoCollector;
use crate::host::HostEnvironment;
use crate::model::{DeviceInfo, EnvReport, HardwareInfo};
use std::sync::Arc;

/// Main collector for client environment information
pub struct EnvInfoCollector {
    device_collector: Arc<DeviceInfoCollector>,
    hardware_collector: Arc<HardwareInfoCollector>,
}

impl EnvInfoCollector {
    /// Create a collector over `host` with the default configuration
    #[must_use]
    pub fn new(host: Arc<dyn HostEnvironment>) -> Self {
        Self::with_config(host, CollectorConfig::default())
    }

    #[must_use]
    pub fn with_config(host: Arc<dyn HostEnvironment>, config: CollectorConfig) -> Self {
        Self {
            device_collector: Arc::new(DeviceInfoCollector::new(Arc::clone(&host))),
            hardware_collector: Arc::new(HardwareInfoCollector::new(host, config)),
        }
    }

    /// Collect the base record (device class, OS, browser, screen)
    #[must_use]
    pub fn collect_device_info(&self) -> DeviceInfo {
        self.device_collector.collect()
    }

    /// Collect the hardware record (concurrency, GPU, battery, storage, media)
    pub async fn collect_hardware_info(&self) -> HardwareInfo {
        self.hardware_collector.collect().await
    }

    /// Collect both records and merge them, base fields first
    pub async fn collect_all(&self) -> EnvReport {
        let device = self.collect_device_info();
        let hardware = self.collect_hardware_info().await;
        tracing::debug!(
            device_type = %device.device_type,
            gpu_available = hardware.gpu.value().is_some(),
            battery_available = hardware.battery.value().is_some(),
            "Collected client environment report"
        );
        EnvReport {
            device,
            hardware,
            collected_at: chrono::Utc::now(),
        }
    }
}
