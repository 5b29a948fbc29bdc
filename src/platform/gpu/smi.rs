use std::path::PathBuf;
use std::process::Command;

use super::nvidia::memory_percent;
use crate::core::dashboard::{GpuProvider, GpuReading};
use crate::error::{MonitorError, Result};

const QUERY_ARGS: [&str; 2] = [
    "--query-gpu=utilization.gpu,memory.used,memory.total",
    "--format=csv,noheader,nounits",
];

/// NVIDIA GPU provider shelling out to `nvidia-smi`
pub struct NvidiaSmiProvider {
    binary: PathBuf,
}

impl NvidiaSmiProvider {
    pub fn new() -> Result<Self> {
        let binary = which::which("nvidia-smi")
            .map_err(|e| MonitorError::gpu_not_available(format!("nvidia-smi not found: {}", e)))?;
        Ok(Self { binary })
    }
}

impl GpuProvider for NvidiaSmiProvider {
    fn name(&self) -> &'static str {
        "nvidia-smi"
    }

    fn read(&mut self) -> Result<GpuReading> {
        let output = Command::new(&self.binary).args(QUERY_ARGS).output()?;
        if !output.status.success() {
            return Err(MonitorError::acquisition(format!(
                "nvidia-smi exited with {}",
                output.status
            )));
        }
        parse_smi_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse `utilization, used MiB, total MiB` from the first GPU line.
pub fn parse_smi_output(output: &str) -> Result<GpuReading> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| MonitorError::acquisition("empty nvidia-smi output"))?;

    let fields: Vec<u64> = line
        .split(',')
        .map(|f| f.trim().parse::<u64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| MonitorError::acquisition(format!("bad nvidia-smi line '{}': {}", line, e)))?;

    match fields.as_slice() {
        [usage, used, total] => Ok(GpuReading {
            utilization_percent: *usage as f32,
            memory_percent: memory_percent(*used, *total),
        }),
        _ => Err(MonitorError::acquisition(format!(
            "expected 3 fields from nvidia-smi, got '{}'",
            line
        ))),
    }
}
