//! Host-metrics collaborator.
//!
//! Samplers only see the [`HostProbe`] trait; [`SysinfoProbe`] is the real
//! implementation backed by `sysinfo` and the platform GPU providers.

use sysinfo::{
    CpuRefreshKind, MemoryRefreshKind, Networks, ProcessRefreshKind, ProcessesToUpdate,
    RefreshKind, System,
};

use super::gpu::{GpuProvider, GpuReading};
use super::metrics::{sort_and_truncate_processes, NetworkCounters, ProcessSample};
use crate::error::{MonitorError, Result};
use crate::platform::gpu::get_gpu_provider;

/// Source of raw host readings. Each call may fail independently.
pub trait HostProbe: Send {
    /// Global CPU usage in percent
    fn sample_cpu(&mut self) -> Result<f32>;

    /// Used RAM in percent of total
    fn sample_memory(&mut self) -> Result<f32>;

    /// GPU utilisation and GPU memory usage in percent
    fn sample_gpu(&mut self) -> Result<GpuReading>;

    /// Busiest processes, sorted descending by (cpu, mem)
    fn sample_top_processes(&mut self, limit: usize) -> Result<Vec<ProcessSample>>;

    /// Cumulative (received, sent) bytes over all interfaces
    fn sample_network_counters(&mut self) -> Result<NetworkCounters>;
}

enum GpuState {
    Untried,
    Ready(Box<dyn GpuProvider>),
    Unavailable,
}

/// [`HostProbe`] backed by `sysinfo`.
pub struct SysinfoProbe {
    system: System,
    networks: Option<Networks>,
    gpu: GpuState,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
            .with_memory(MemoryRefreshKind::nothing().with_ram());

        Self {
            system: System::new_with_specifics(refresh_kind),
            networks: None,
            gpu: GpuState::Untried,
        }
    }

    fn gpu_provider(&mut self) -> Option<&mut Box<dyn GpuProvider>> {
        if let GpuState::Untried = self.gpu {
            self.gpu = match get_gpu_provider() {
                Ok(provider) => {
                    log::info!("GPU metrics via {}", provider.name());
                    GpuState::Ready(provider)
                }
                Err(e) => {
                    log::warn!("GPU provider not available: {}", e);
                    GpuState::Unavailable
                }
            };
        }

        match &mut self.gpu {
            GpuState::Ready(provider) => Some(provider),
            _ => None,
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProbe for SysinfoProbe {
    fn sample_cpu(&mut self) -> Result<f32> {
        self.system.refresh_cpu_usage();
        if self.system.cpus().is_empty() {
            return Err(MonitorError::acquisition("no CPUs reported"));
        }
        Ok(self.system.global_cpu_usage())
    }

    fn sample_memory(&mut self) -> Result<f32> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            return Err(MonitorError::acquisition("total memory reported as zero"));
        }
        Ok((self.system.used_memory() as f32 / total as f32) * 100.0)
    }

    fn sample_gpu(&mut self) -> Result<GpuReading> {
        match self.gpu_provider() {
            Some(provider) => provider.read(),
            None => Err(MonitorError::gpu_not_available("no GPU provider")),
        }
    }

    fn sample_top_processes(&mut self, limit: usize) -> Result<Vec<ProcessSample>> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cpu().with_memory(),
        );

        let total_memory = self.system.total_memory();
        let processes = self
            .system
            .processes()
            .values()
            .map(|proc| ProcessSample {
                name: proc.name().to_string_lossy().to_string(),
                cpu_percent: proc.cpu_usage(),
                mem_percent: if total_memory > 0 {
                    (proc.memory() as f32 / total_memory as f32) * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Ok(sort_and_truncate_processes(processes, limit))
    }

    fn sample_network_counters(&mut self) -> Result<NetworkCounters> {
        let networks = self
            .networks
            .get_or_insert_with(Networks::new_with_refreshed_list);
        networks.refresh(true);

        let counters = networks
            .values()
            .fold(NetworkCounters::default(), |acc, data| NetworkCounters {
                bytes_received: acc.bytes_received.saturating_add(data.total_received()),
                bytes_sent: acc.bytes_sent.saturating_add(data.total_transmitted()),
            });
        Ok(counters)
    }
}
