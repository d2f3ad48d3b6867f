use super::GpuAdapter;

const NVIDIA_VENDOR: &str = "NVIDIA Corporation";

/// Enumerate NVIDIA adapters through NVML. `None` when the driver library
/// is not installed.
#[must_use]
pub fn collect_nvidia_adapters() -> Option<Vec<GpuAdapter>> {
    use nvml_wrapper::Nvml;

    let Ok(nvml) = Nvml::init() else {
        return None;
    };

    let Ok(device_count) = nvml.device_count() else {
        return None;
    };

    let mut adapters = Vec::new();

    for i in 0..device_count {
        match nvml.device_by_index(i).and_then(|device| device.name()) {
            Ok(model) => {
                tracing::debug!(index = i, model = %model, "Found NVIDIA GPU via NVML");
                adapters.push(GpuAdapter {
                    vendor: Some(NVIDIA_VENDOR.to_owned()),
                    model,
                });
            }
            Err(e) => {
                tracing::warn!(index = i, error = %e, "Failed to read NVML device");
            }
        }
    }

    Some(adapters)
}
