//! Human-readable formatting of host values.

const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
const BASE: f64 = 1024.0;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;
const MIN_DEVICE_MEMORY_GIB: f64 = 0.25;
const MAX_DEVICE_MEMORY_GIB: f64 = 8.0;

/// Format a byte count with the largest fitting binary unit.
///
/// The scaled value keeps at most two decimals, trailing zeros dropped.
/// `0` and `None` both format as `"0 B"`.
///
/// ```
/// use client_env_info::format::format_bytes;
///
/// assert_eq!(format_bytes(Some(1536)), "1.5 KB");
/// assert_eq!(format_bytes(Some(1_048_576)), "1 MB");
/// assert_eq!(format_bytes(None), "0 B");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: Option<u64>) -> String {
    let bytes = match bytes {
        None | Some(0) => return "0 B".to_owned(),
        Some(b) => b,
    };

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= BASE && unit < UNITS.len() - 1 {
        value /= BASE;
        unit += 1;
    }

    format!("{} {}", trim_decimals(value), UNITS[unit])
}

/// Percentage of `used` over `total` with two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_percent(used: u64, total: u64) -> String {
    if total == 0 {
        return "0.00%".to_owned();
    }
    format!("{:.2}%", used as f64 / total as f64 * 100.0)
}

/// Round physical memory the way browsers expose `deviceMemory`: the largest
/// power-of-two GiB not above the total, clamped to `0.25..=8`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn approximate_device_memory(total_bytes: u64) -> f64 {
    let gib = total_bytes as f64 / BYTES_PER_GIB;
    if gib <= MIN_DEVICE_MEMORY_GIB {
        return MIN_DEVICE_MEMORY_GIB;
    }
    let rounded = 2f64.powf(gib.log2().floor());
    rounded.clamp(MIN_DEVICE_MEMORY_GIB, MAX_DEVICE_MEMORY_GIB)
}

/// Render at most two decimals, dropping trailing zeros and a bare dot.
fn trim_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_owned()
}
