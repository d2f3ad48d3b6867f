#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for environment collection over scripted hosts
//!
//! These tests verify the merged record shape, sentinel fallbacks, and that
//! the asynchronous probes are issued concurrently.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use client_env_info::classify::{BrowserFamily, DeviceType, OsFamily};
use client_env_info::host::{
    BatteryStatus, DecodingInfo, GpuRenderer, MediaDecodingConfig, NavigatorInfo,
    ScreenMetrics, ScreenOrientation, StorageEstimate, Viewport,
};
use client_env_info::{
    ChargeTime, CollectorConfig, EnvInfoCollector, HostEnvironment, HostSnapshot,
    NOT_AVAILABLE, NOT_SUPPORTED, ProbeError, Probed, SnapshotProbe,
};
use tokio::sync::Barrier;

const IPAD_UA: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
const WINDOWS_CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn ipad_snapshot() -> HostSnapshot {
    let mut decoders = BTreeMap::new();
    decoders.insert(
        r#"video/mp4; codecs="avc1.42E01E""#.to_owned(),
        DecodingInfo {
            supported: true,
            smooth: true,
            power_efficient: true,
        },
    );

    HostSnapshot {
        navigator: NavigatorInfo {
            user_agent: IPAD_UA.to_owned(),
            vendor: "Apple Computer, Inc.".to_owned(),
            platform: "iPad".to_owned(),
            language: "en-GB".to_owned(),
            languages: vec!["en-GB".to_owned(), "en".to_owned()],
            cookie_enabled: true,
            on_line: true,
            do_not_track: Some("1".to_owned()),
            max_touch_points: 5,
            hardware_concurrency: Some(8),
            device_memory: Some(4.0),
        },
        screen: ScreenMetrics {
            width: 820,
            height: 1180,
            avail_width: 820,
            avail_height: 1180,
            color_depth: 24,
            pixel_depth: 24,
            orientation: Some(ScreenOrientation {
                kind: "portrait-primary".to_owned(),
                angle: 0,
            }),
        },
        viewport: Viewport {
            inner_width: 820,
            inner_height: 1106,
            device_pixel_ratio: 2.0,
            touch_events: true,
        },
        timezone: Some("Europe/London".to_owned()),
        gpu: SnapshotProbe::Value(GpuRenderer {
            vendor: "Apple Inc.".to_owned(),
            renderer: "Apple GPU".to_owned(),
        }),
        battery: SnapshotProbe::Value(BatteryStatus {
            level: 0.42,
            charging: false,
            charging_time: None,
            discharging_time: Some(7200.0),
        }),
        storage: SnapshotProbe::Value(StorageEstimate {
            quota: Some(2_147_483_648),
            usage: Some(1536),
        }),
        media: SnapshotProbe::Value(decoders),
    }
}

fn bare_snapshot() -> HostSnapshot {
    HostSnapshot {
        navigator: NavigatorInfo {
            user_agent: WINDOWS_CHROME_UA.to_owned(),
            vendor: "Google Inc.".to_owned(),
            ..NavigatorInfo::default()
        },
        ..HostSnapshot::default()
    }
}

fn top_level_keys(report: &serde_json::Value) -> Vec<String> {
    let mut keys: Vec<_> = report.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    keys
}

#[tokio::test]
async fn test_full_host_produces_complete_report() {
    let collector = EnvInfoCollector::new(Arc::new(ipad_snapshot()));
    let report = collector.collect_all().await;

    assert_eq!(report.device.device_type, DeviceType::Tablet);
    assert_eq!(report.device.os, OsFamily::Ios);
    assert_eq!(report.device.browser, BrowserFamily::Safari);
    assert_eq!(report.device.do_not_track, "1");
    assert!(report.device.touch_support.has_touch);

    assert_eq!(report.hardware.hardware_concurrency, Probed::Value(8));
    assert_eq!(report.hardware.device_memory, Probed::Value("4 GB".to_owned()));

    let battery = report.hardware.battery.value().unwrap();
    assert_eq!(battery.level, "42%");
    assert_eq!(battery.charging_time, ChargeTime::Infinite);
    assert_eq!(battery.discharging_time, ChargeTime::Seconds(7200));

    let storage = report.hardware.storage.value().unwrap();
    assert_eq!(storage.quota, "2 GB");
    assert_eq!(storage.usage, "1.5 KB");

    let media = report.hardware.media_capabilities.value().unwrap();
    assert_eq!(media.len(), 3);
    let h264 = media["h264"].value().unwrap();
    assert!(h264.supported && h264.smooth && h264.power_efficient);
    // Unknown to the decoder, but the query itself works
    assert!(!media["av1"].value().unwrap().supported);
}

#[tokio::test]
async fn test_missing_capabilities_resolve_to_not_supported() {
    let collector = EnvInfoCollector::new(Arc::new(bare_snapshot()));
    let report = collector.collect_all().await;

    assert_eq!(report.device.device_type, DeviceType::Desktop);
    assert_eq!(report.device.os, OsFamily::Windows);
    assert_eq!(report.device.browser, BrowserFamily::Chrome);
    assert_eq!(report.device.do_not_track, "unspecified");
    assert_eq!(report.device.timezone, Probed::NotAvailable);
    assert_eq!(report.device.screen.orientation, Probed::NotSupported);

    assert_eq!(report.hardware.hardware_concurrency, Probed::NotAvailable);
    assert_eq!(report.hardware.gpu, Probed::NotSupported);
    assert_eq!(report.hardware.battery, Probed::NotSupported);
    assert_eq!(report.hardware.storage, Probed::NotSupported);
    assert_eq!(report.hardware.media_capabilities, Probed::NotSupported);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["battery"], NOT_SUPPORTED);
    assert_eq!(json["storage"], NOT_SUPPORTED);
    assert_eq!(json["hardwareConcurrency"], NOT_AVAILABLE);
}

#[tokio::test]
async fn test_failing_probes_resolve_to_not_available() {
    let snapshot = HostSnapshot {
        gpu: SnapshotProbe::Unavailable("debug renderer info hidden".to_owned()),
        battery: SnapshotProbe::Fails("permission denied".to_owned()),
        storage: SnapshotProbe::Fails("quota manager crashed".to_owned()),
        media: SnapshotProbe::Fails("invalid configuration".to_owned()),
        ..bare_snapshot()
    };
    let collector = EnvInfoCollector::new(Arc::new(snapshot));
    let hardware = collector.collect_hardware_info().await;

    assert_eq!(hardware.gpu, Probed::NotAvailable);
    assert_eq!(hardware.battery, Probed::NotAvailable);
    assert_eq!(hardware.storage, Probed::NotAvailable);

    // Each configuration failed on its own, the query exists
    let media = hardware.media_capabilities.value().unwrap();
    assert!(media.values().all(|entry| *entry == Probed::NotAvailable));
}

#[tokio::test]
async fn test_negative_device_memory_is_not_available() {
    let mut snapshot = bare_snapshot();
    snapshot.navigator.device_memory = Some(-1.0);
    let hardware = EnvInfoCollector::new(Arc::new(snapshot))
        .collect_hardware_info()
        .await;

    assert_eq!(hardware.device_memory, Probed::NotAvailable);
    let json = serde_json::to_value(&hardware).unwrap();
    assert_eq!(json["deviceMemory"], NOT_AVAILABLE);
}

#[tokio::test]
async fn test_report_key_set_is_fixed() {
    let full = EnvInfoCollector::new(Arc::new(ipad_snapshot())).collect_all().await;
    let bare = EnvInfoCollector::new(Arc::new(bare_snapshot())).collect_all().await;

    let full_keys = top_level_keys(&serde_json::to_value(&full).unwrap());
    let bare_keys = top_level_keys(&serde_json::to_value(&bare).unwrap());

    assert_eq!(full_keys, bare_keys);
    for key in [
        "userAgent",
        "platform",
        "vendor",
        "language",
        "languages",
        "cookieEnabled",
        "online",
        "doNotTrack",
        "timezone",
        "deviceType",
        "os",
        "browser",
        "screen",
        "viewport",
        "touchSupport",
        "hardwareConcurrency",
        "deviceMemory",
        "gpu",
        "battery",
        "storage",
        "mediaCapabilities",
        "collectedAt",
    ] {
        assert!(full_keys.iter().any(|k| k == key), "missing key {key}");
    }
    assert_eq!(full_keys.len(), 22);
}

#[tokio::test]
async fn test_device_info_is_idempotent() {
    let collector = EnvInfoCollector::new(Arc::new(ipad_snapshot()));
    let first = collector.collect_device_info();
    let second = collector.collect_device_info();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_custom_media_probes_are_keyed_by_label() {
    let yaml = r#"
media_probes:
  - label: h264-720p
    contentType: 'video/mp4; codecs="avc1.42E01E"'
    width: 1280
    height: 720
    bitrate: 2000000
    framerate: 30
"#;
    let config: CollectorConfig = serde_saphyr::from_str(yaml).unwrap();
    let collector = EnvInfoCollector::with_config(Arc::new(ipad_snapshot()), config);

    let hardware = collector.collect_hardware_info().await;
    let media = hardware.media_capabilities.value().unwrap();
    assert_eq!(media.keys().collect::<Vec<_>>(), ["h264-720p"]);
    assert_eq!(
        media["h264-720p"].value().unwrap().content_type,
        r#"video/mp4; codecs="avc1.42E01E""#
    );
}

#[tokio::test]
async fn test_no_media_probes_yields_empty_map() {
    let config = CollectorConfig {
        media_probes: Vec::new(),
    };
    let collector = EnvInfoCollector::with_config(Arc::new(bare_snapshot()), config);
    let hardware = collector.collect_hardware_info().await;
    assert_eq!(hardware.media_capabilities, Probed::Value(BTreeMap::new()));
}

/// Host whose asynchronous probes only complete once all of them are in
/// flight at the same time.
struct RendezvousHost {
    barrier: Barrier,
}

#[async_trait]
impl HostEnvironment for RendezvousHost {
    fn navigator(&self) -> NavigatorInfo {
        NavigatorInfo::default()
    }

    fn screen(&self) -> ScreenMetrics {
        ScreenMetrics::default()
    }

    fn viewport(&self) -> Viewport {
        Viewport::default()
    }

    fn timezone(&self) -> Option<String> {
        None
    }

    fn gpu(&self) -> Result<GpuRenderer, ProbeError> {
        Err(ProbeError::unsupported("gpu"))
    }

    async fn battery(&self) -> Result<BatteryStatus, ProbeError> {
        self.barrier.wait().await;
        Ok(BatteryStatus {
            level: 1.0,
            charging: true,
            charging_time: Some(0.0),
            discharging_time: None,
        })
    }

    async fn storage_estimate(&self) -> Result<StorageEstimate, ProbeError> {
        self.barrier.wait().await;
        Ok(StorageEstimate::default())
    }

    async fn decoding_info(
        &self,
        _config: &MediaDecodingConfig,
    ) -> Result<DecodingInfo, ProbeError> {
        self.barrier.wait().await;
        Ok(DecodingInfo::default())
    }
}

#[tokio::test]
async fn test_async_probes_are_issued_concurrently() {
    let config = CollectorConfig {
        media_probes: CollectorConfig::default()
            .media_probes
            .into_iter()
            .take(1)
            .collect(),
    };
    // battery + storage + one media probe
    let host = Arc::new(RendezvousHost {
        barrier: Barrier::new(3),
    });
    let collector = EnvInfoCollector::with_config(host, config);

    let hardware = tokio::time::timeout(Duration::from_secs(5), collector.collect_hardware_info())
        .await
        .expect("probes should run concurrently, not one after another");

    assert_eq!(hardware.battery.value().unwrap().level, "100%");
    assert!(hardware.storage.value().is_some());
}
