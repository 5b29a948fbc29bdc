//! GPU-specific platform code.
//!
//! Supports NVIDIA GPUs via NVML (`nvml` feature) or the `nvidia-smi` CLI.

mod nvidia;
mod smi;

pub use nvidia::NvidiaGpuProvider;
pub use smi::{parse_smi_output, NvidiaSmiProvider};

use crate::core::dashboard::GpuProvider;
use crate::error::{MonitorError, Result};

/// Attempt to get an available GPU provider
///
/// Tries each supported backend in order of preference:
/// 1. NVML (when built with the `nvml` feature)
/// 2. `nvidia-smi` found on PATH
///
/// Returns error if no GPU is available.
pub fn get_gpu_provider() -> Result<Box<dyn GpuProvider>> {
    if let Ok(provider) = NvidiaGpuProvider::new() {
        return Ok(Box::new(provider));
    }

    if let Ok(provider) = NvidiaSmiProvider::new() {
        return Ok(Box::new(provider));
    }

    Err(MonitorError::gpu_not_available("No supported GPU found"))
}
