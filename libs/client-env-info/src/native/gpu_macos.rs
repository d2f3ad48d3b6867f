use super::GpuAdapter;
use regex::Regex;
use std::process::Command;

#[allow(clippy::expect_used)] // good regex, it doesn't panic
static MODEL_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"Chipset Model: (.+)").expect("static regex should not panic")
});
#[allow(clippy::expect_used)] // good regex, it doesn't panic
static VENDOR_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"Vendor: ([^(\n]+)").expect("static regex should not panic")
});

/// Collect GPU adapters on macOS using `system_profiler`
#[must_use]
pub fn collect_gpu_adapters() -> Vec<GpuAdapter> {
    let Ok(output) = Command::new("system_profiler")
        .arg("SPDisplaysDataType")
        .output()
    else {
        return Vec::new();
    };

    if !output.status.success() {
        return Vec::new();
    }

    parse_system_profiler(&String::from_utf8_lossy(&output.stdout))
}

fn parse_system_profiler(output: &str) -> Vec<GpuAdapter> {
    let vendors: Vec<_> = VENDOR_REGEX
        .captures_iter(output)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_owned())
        .collect();

    MODEL_REGEX
        .captures_iter(output)
        .filter_map(|cap| cap.get(1))
        .enumerate()
        .map(|(i, model)| GpuAdapter {
            vendor: vendors.get(i).cloned(),
            model: model.as_str().trim().to_owned(),
        })
        .collect()
}
