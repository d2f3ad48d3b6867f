use super::GpuAdapter;
use std::process::Command;

/// Collect GPU adapters on Linux: NVML for NVIDIA GPUs, fallback to lspci
#[must_use]
pub fn collect_gpu_adapters() -> Vec<GpuAdapter> {
    if let Some(nvidia) = super::nvml::collect_nvidia_adapters()
        && !nvidia.is_empty()
    {
        return nvidia;
    }

    tracing::debug!("NVML not available, falling back to lspci");
    let Ok(output) = Command::new("lspci").output() else {
        return Vec::new();
    };
    if !output.status.success() {
        return Vec::new();
    }

    let adapters = parse_lspci(&String::from_utf8_lossy(&output.stdout));
    tracing::debug!(count = adapters.len(), "GPU adapters found via lspci");
    adapters
}

/// Pick display controllers out of `lspci` output.
///
/// Lines look like `00:02.0 VGA compatible controller: Intel Corporation ...`;
/// the model is everything after the class description.
fn parse_lspci(output: &str) -> Vec<GpuAdapter> {
    output
        .lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            lower.contains("vga") || lower.contains("3d") || lower.contains("display")
        })
        .filter_map(|line| {
            let (_, model) = line.split_once(": ")?;
            let model = model.trim();
            (!model.is_empty()).then(|| GpuAdapter {
                vendor: None,
                model: model.to_owned(),
            })
        })
        .collect()
}
