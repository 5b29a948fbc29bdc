//! Host metric sampling (CPU, memory, GPU, top processes).

use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use super::metrics::MetricSnapshot;
use super::probe::HostProbe;
use super::runtime::blocking_cycle;
use super::shutdown::RunFlag;
use super::slot::SlotWriter;
use crate::error::{MonitorError, Result};

pub const DEFAULT_TOP_PROCESSES: usize = 5;

/// Produces one [`MetricSnapshot`] per call.
///
/// A failed reading only zeroes its own field; the snapshot is always
/// complete.
pub struct MetricSampler {
    probe: Box<dyn HostProbe>,
    top_processes: usize,
}

impl MetricSampler {
    pub fn new(probe: Box<dyn HostProbe>) -> Self {
        Self::with_top_processes(probe, DEFAULT_TOP_PROCESSES)
    }

    pub fn with_top_processes(probe: Box<dyn HostProbe>, top_processes: usize) -> Self {
        Self {
            probe,
            top_processes,
        }
    }

    /// Take a throwaway CPU reading so the next one has a baseline.
    pub fn prime(&mut self) {
        if let Err(e) = self.probe.sample_cpu() {
            log::debug!("CPU priming read failed: {}", e);
        }
    }

    pub fn sample(&mut self) -> MetricSnapshot {
        let cpu_percent = degrade("cpu", self.probe.sample_cpu());
        let mem_percent = degrade("memory", self.probe.sample_memory());
        let gpu = degrade("gpu", self.probe.sample_gpu());
        let top_processes = degrade(
            "processes",
            self.probe.sample_top_processes(self.top_processes),
        );

        MetricSnapshot {
            timestamp: chrono::Utc::now().timestamp(),
            cpu_percent: clamp_percent(cpu_percent),
            mem_percent: clamp_percent(mem_percent),
            gpu_percent: clamp_percent(gpu.utilization_percent),
            gpu_mem_percent: clamp_percent(gpu.memory_percent),
            top_processes: top_processes.into_iter().take(self.top_processes).collect(),
        }
    }
}

fn degrade<T: Default>(field: &str, reading: Result<T>) -> T {
    match reading {
        Ok(value) => value,
        Err(MonitorError::GpuNotAvailable(reason)) => {
            log::trace!("{} reading unavailable: {}", field, reason);
            T::default()
        }
        Err(e) => {
            log::warn!("{} reading failed, using default: {}", field, e);
            T::default()
        }
    }
}

fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Task that publishes a fresh snapshot roughly every `period`.
///
/// A cycle that overruns its period delays the next one instead of
/// queueing extra cycles; cycles never overlap.
pub async fn metric_sampler_task(
    sampler: MetricSampler,
    slot: SlotWriter<MetricSnapshot>,
    running: RunFlag,
    period: Duration,
) {
    log::info!("Metric sampler task started");

    let Some((mut sampler, ())) = blocking_cycle(sampler, |s| s.prime()).await else {
        return;
    };
    if !running.sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await {
        return;
    }

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while running.is_running() {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = running.stopped() => break,
        }

        match blocking_cycle(sampler, MetricSampler::sample).await {
            Some((returned, snapshot)) => {
                log::trace!(
                    "Metric snapshot: cpu {:.1}% mem {:.1}%",
                    snapshot.cpu_percent,
                    snapshot.mem_percent
                );
                slot.publish(snapshot);
                sampler = returned;
            }
            None => break,
        }
    }

    log::info!("Metric sampler task shutting down");
}
