#[cfg(feature = "nvml")]
use nvml_wrapper::{Device, Nvml};

use crate::core::dashboard::{GpuProvider, GpuReading};
use crate::error::{MonitorError, Result};

/// Index of the GPU whose readings are reported.
#[cfg(feature = "nvml")]
const DEVICE_INDEX: u32 = 0;

/// NVIDIA GPU provider using NVML
pub struct NvidiaGpuProvider {
    #[cfg(feature = "nvml")]
    nvml: Nvml,
}

impl NvidiaGpuProvider {
    /// Initializes NVML and checks that the first GPU is present.
    pub fn new() -> Result<Self> {
        #[cfg(feature = "nvml")]
        {
            let nvml = Nvml::init().map_err(|e| {
                MonitorError::gpu_not_available(format!("Failed to init NVML: {}", e))
            })?;

            // Verify device exists
            let _ = nvml.device_by_index(DEVICE_INDEX).map_err(|e| {
                MonitorError::gpu_not_available(format!("GPU {} not found: {}", DEVICE_INDEX, e))
            })?;

            Ok(Self { nvml })
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(MonitorError::gpu_not_available("NVML support not enabled"))
        }
    }

    #[cfg(feature = "nvml")]
    fn get_device(&self) -> Result<Device<'_>> {
        self.nvml
            .device_by_index(DEVICE_INDEX)
            .map_err(|e| MonitorError::acquisition(format!("Failed to get GPU device: {}", e)))
    }
}

impl GpuProvider for NvidiaGpuProvider {
    fn name(&self) -> &'static str {
        "nvml"
    }

    fn read(&mut self) -> Result<GpuReading> {
        #[cfg(feature = "nvml")]
        {
            let device = self.get_device()?;

            let utilization = device
                .utilization_rates()
                .map_err(|e| MonitorError::acquisition(format!("Failed to get utilization: {}", e)))?
                .gpu;

            let memory_info = device.memory_info().map_err(|e| {
                MonitorError::acquisition(format!("Failed to get memory info: {}", e))
            })?;

            Ok(GpuReading {
                utilization_percent: utilization as f32,
                memory_percent: memory_percent(memory_info.used, memory_info.total),
            })
        }
        #[cfg(not(feature = "nvml"))]
        {
            Err(MonitorError::gpu_not_available("NVML support not enabled"))
        }
    }
}

/// Used memory as a percentage rounded to one decimal.
pub(crate) fn memory_percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        return 0.0;
    }
    let percent = used as f64 / total as f64 * 100.0;
    ((percent * 10.0).round() / 10.0) as f32
}
