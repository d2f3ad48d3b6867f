use super::GpuAdapter;
use std::process::Command;

/// Collect GPU adapters on Windows: NVML for NVIDIA GPUs, fallback to WMIC
#[must_use]
pub fn collect_gpu_adapters() -> Vec<GpuAdapter> {
    if let Some(nvidia) = super::nvml::collect_nvidia_adapters()
        && !nvidia.is_empty()
    {
        return nvidia;
    }

    tracing::debug!("NVML not available, falling back to WMIC");
    let Ok(output) = Command::new("wmic")
        .args([
            "path",
            "win32_VideoController",
            "get",
            "name,AdapterCompatibility",
            "/format:csv",
        ])
        .output()
    else {
        return Vec::new();
    };
    if !output.status.success() {
        return Vec::new();
    }

    parse_wmic_csv(&String::from_utf8_lossy(&output.stdout))
}

/// Parse `Node,AdapterCompatibility,Name` CSV rows, skipping the header.
fn parse_wmic_csv(output: &str) -> Vec<GpuAdapter> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .skip(1)
        .filter_map(|line| {
            let mut parts = line.split(',').skip(1);
            let vendor = parts.next()?.trim();
            let model = parts.next()?.trim();
            (!model.is_empty()).then(|| GpuAdapter {
                vendor: (!vendor.is_empty()).then(|| vendor.to_owned()),
                model: model.to_owned(),
            })
        })
        .collect()
}
