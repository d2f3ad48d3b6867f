//! Host answered by the local machine.
//!
//! There is no browser here, so navigator fields are synthesized from the
//! platform (the user agent carries the same OS tokens a browser would) and
//! the optional capabilities come from system libraries and tools.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use regex::Regex;
use sysinfo::{Disk, Disks, System};

use crate::error::ProbeError;
use crate::format::approximate_device_memory;
use crate::host::{
    BatteryStatus, DecodingInfo, GpuRenderer, HostEnvironment, MediaDecodingConfig,
    NavigatorInfo, ScreenMetrics, StorageEstimate, Viewport, capability,
};

#[cfg(any(target_os = "linux", target_os = "windows"))]
mod nvml;

// Platform-specific GPU collectors
#[cfg(target_os = "linux")]
mod gpu_linux;
#[cfg(target_os = "macos")]
mod gpu_macos;
#[cfg(target_os = "windows")]
mod gpu_windows;

const PRODUCT: &str = "client-env-info";
const DEFAULT_LANGUAGE: &str = "en-US";

/// A graphics adapter found on the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuAdapter {
    pub vendor: Option<String>,
    pub model: String,
}

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static GPU_VENDORS: std::sync::LazyLock<Vec<(Regex, &'static str)>> =
    std::sync::LazyLock::new(|| {
        [
            (r"(?i)nvidia", "NVIDIA Corporation"),
            (r"(?i)\bamd\b|advanced micro devices|\bati\b|radeon", "AMD"),
            (r"(?i)intel", "Intel Inc."),
            (r"(?i)apple", "Apple Inc."),
            (r"(?i)qualcomm|adreno", "Qualcomm"),
            (r"(?i)vmware|virtualbox|virtio|red hat|microsoft", "Virtual"),
        ]
        .into_iter()
        .map(|(pattern, vendor)| {
            (
                Regex::new(pattern).expect("static regex should not panic"),
                vendor,
            )
        })
        .collect()
    });

/// Guess the vendor of a GPU from its model string.
#[must_use]
pub fn vendor_from_model(model: &str) -> Option<&'static str> {
    GPU_VENDORS
        .iter()
        .find(|(regex, _)| regex.is_match(model))
        .map(|(_, vendor)| *vendor)
}

/// Host backed by the local machine
pub struct NativeHost {
    system: Mutex<System>,
}

impl NativeHost {
    #[must_use]
    pub fn new() -> Self {
        let system = System::new_all();
        Self {
            system: Mutex::new(system),
        }
    }

    fn collect_gpu_adapters() -> Vec<GpuAdapter> {
        // Use platform-specific GPU detection
        #[cfg(target_os = "macos")]
        {
            gpu_macos::collect_gpu_adapters()
        }
        #[cfg(target_os = "linux")]
        {
            gpu_linux::collect_gpu_adapters()
        }
        #[cfg(target_os = "windows")]
        {
            gpu_windows::collect_gpu_adapters()
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            Vec::new()
        }
    }
}

impl Default for NativeHost {
    fn default() -> Self {
        Self::new()
    }
}

/// OS token as it appears inside a browser user agent.
fn platform_token() -> &'static str {
    match std::env::consts::OS {
        "windows" => "Windows NT",
        "macos" => "Macintosh; Mac OS X",
        "linux" => "X11; Linux",
        "android" => "Linux; Android",
        "ios" => "iPhone; CPU iPhone OS",
        "freebsd" => "X11; FreeBSD",
        _ => "Unknown",
    }
}

/// `navigator.platform` equivalent.
fn platform_name() -> String {
    match std::env::consts::OS {
        "windows" => "Win32".to_owned(),
        "macos" => "MacIntel".to_owned(),
        os => {
            let mut name = os.to_owned();
            if let Some(first) = name.get_mut(..1) {
                first.make_ascii_uppercase();
            }
            format!("{name} {}", std::env::consts::ARCH)
        }
    }
}

fn user_agent() -> String {
    format!(
        "{PRODUCT}/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        platform_token(),
        std::env::consts::ARCH
    )
}

/// Turn a POSIX locale (`en_US.UTF-8`) into a language tag (`en-US`).
fn language_tag(locale: &str) -> Option<String> {
    let base = locale.split(['.', '@']).next()?.trim();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

fn detect_languages() -> Vec<String> {
    let tag = ["LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|locale| language_tag(&locale))
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned());

    let mut languages = vec![tag.clone()];
    if let Some((primary, _)) = tag.split_once('-') {
        languages.push(primary.to_owned());
    }
    languages
}

/// The mount point holding `anchor`: the longest mount path it starts with.
fn pick_mount<'a>(anchor: &Path, mounts: impl Iterator<Item = &'a Path>) -> Option<&'a Path> {
    mounts
        .filter(|mount| anchor.starts_with(mount))
        .max_by_key(|mount| mount.components().count())
}

#[async_trait]
impl HostEnvironment for NativeHost {
    fn navigator(&self) -> NavigatorInfo {
        let mut sys = self
            .system
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        sys.refresh_memory();

        let hardware_concurrency = u32::try_from(sys.cpus().len())
            .ok()
            .filter(|n| *n > 0);
        let total_memory = sys.total_memory();
        let device_memory = (total_memory > 0).then(|| approximate_device_memory(total_memory));

        let languages = detect_languages();
        let on_line = match local_ip_address::local_ip() {
            Ok(ip) => {
                tracing::debug!(ip = %ip, "Detected local IP address");
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "No local IP address, reporting offline");
                false
            }
        };

        NavigatorInfo {
            user_agent: user_agent(),
            vendor: String::new(),
            platform: platform_name(),
            language: languages
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_owned()),
            languages,
            cookie_enabled: false,
            on_line,
            do_not_track: None,
            max_touch_points: 0,
            hardware_concurrency,
            device_memory,
        }
    }

    fn screen(&self) -> ScreenMetrics {
        ScreenMetrics::default()
    }

    fn viewport(&self) -> Viewport {
        Viewport::default()
    }

    fn timezone(&self) -> Option<String> {
        if let Ok(tz) = std::env::var("TZ")
            && !tz.is_empty()
        {
            return Some(tz.trim_start_matches(':').to_owned());
        }
        let offset = chrono::Local::now().offset().to_string();
        Some(format!("UTC{offset}"))
    }

    fn gpu(&self) -> Result<GpuRenderer, ProbeError> {
        let adapter = Self::collect_gpu_adapters()
            .into_iter()
            .next()
            .ok_or_else(|| ProbeError::unsupported(capability::GPU))?;

        let vendor = adapter
            .vendor
            .or_else(|| vendor_from_model(&adapter.model).map(str::to_owned))
            .unwrap_or_else(|| crate::model::UNKNOWN.to_owned());

        Ok(GpuRenderer {
            vendor,
            renderer: adapter.model,
        })
    }

    async fn battery(&self) -> Result<BatteryStatus, ProbeError> {
        // Use starship-battery for cross-platform battery detection
        use starship_battery::{Manager, State};

        let manager =
            Manager::new().map_err(|e| ProbeError::failed(capability::BATTERY, e))?;
        let mut batteries = manager
            .batteries()
            .map_err(|e| ProbeError::failed(capability::BATTERY, e))?;

        // No battery detected (desktop system)
        let battery = batteries
            .next()
            .ok_or_else(|| ProbeError::unsupported(capability::BATTERY))?
            .map_err(|e| ProbeError::failed(capability::BATTERY, e))?;

        Ok(BatteryStatus {
            level: f64::from(battery.state_of_charge().value),
            charging: matches!(battery.state(), State::Charging | State::Full),
            charging_time: battery.time_to_full().map(|t| f64::from(t.value)),
            discharging_time: battery.time_to_empty().map(|t| f64::from(t.value)),
        })
    }

    async fn storage_estimate(&self) -> Result<StorageEstimate, ProbeError> {
        let anchor = dirs::home_dir()
            .or_else(|| std::env::current_dir().ok())
            .ok_or_else(|| ProbeError::unavailable(capability::STORAGE, "no home directory"))?;

        let disks = Disks::new_with_refreshed_list();
        let mount = pick_mount(&anchor, disks.list().iter().map(Disk::mount_point));
        let disk = mount
            .and_then(|mount| disks.list().iter().find(|d| d.mount_point() == mount))
            .ok_or_else(|| {
                ProbeError::unavailable(
                    capability::STORAGE,
                    format!("no disk mounted above {}", anchor.display()),
                )
            })?;

        let total = disk.total_space();
        Ok(StorageEstimate {
            quota: Some(total),
            usage: Some(total.saturating_sub(disk.available_space())),
        })
    }

    async fn decoding_info(
        &self,
        _config: &MediaDecodingConfig,
    ) -> Result<DecodingInfo, ProbeError> {
        Err(ProbeError::unsupported(capability::MEDIA_CAPABILITIES))
    }
}
