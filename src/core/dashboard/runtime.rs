//! Tokio runtime and task wiring for the samplers.
//!
//! Each sampler runs as its own task and publishes into its own handoff
//! slot. The render loop only ever reads through a [`DashboardContext`].

use std::time::Duration;
use tokio::task::JoinHandle;

use super::headlines::{headline_task, HeadlineAggregator};
use super::history::{shared_history, SharedHistory};
use super::metrics::{HeadlineFeed, MetricSnapshot, ThroughputSample};
use super::network::{network_sampler_task, NetworkSampler};
use super::sampler::{metric_sampler_task, MetricSampler};
use super::shutdown::RunFlag;
use super::slot::{handoff_slot, SlotReader};
use crate::error::Result;

/// The three samplers, ready to be moved into their tasks.
pub struct Samplers {
    pub metrics: MetricSampler,
    pub network: NetworkSampler,
    pub headlines: HeadlineAggregator,
}

/// Periods of the sampler loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerSchedule {
    pub metrics: Duration,
    pub network: Duration,
    pub headlines: Duration,
}

impl Default for SamplerSchedule {
    fn default() -> Self {
        Self {
            metrics: Duration::from_secs(1),
            network: Duration::from_secs(1),
            headlines: Duration::from_secs(30),
        }
    }
}

/// Everything the render loop shares with the sampler tasks.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub running: RunFlag,
    pub metrics: SlotReader<MetricSnapshot>,
    pub throughput: SlotReader<ThroughputSample>,
    pub headlines: SlotReader<HeadlineFeed>,
    pub history: SharedHistory,
}

/// Spawned sampler tasks plus the context that reads their output.
pub struct SamplerSet {
    pub context: DashboardContext,
    pub tasks: Vec<JoinHandle<()>>,
}

/// Spawn all sampler tasks on the current Tokio runtime.
pub fn spawn_samplers(
    samplers: Samplers,
    schedule: SamplerSchedule,
    history_capacity: usize,
) -> SamplerSet {
    let running = RunFlag::new();
    let history = shared_history(history_capacity);

    let (metrics_tx, metrics_rx) = handoff_slot(MetricSnapshot::default());
    let (throughput_tx, throughput_rx) = handoff_slot(ThroughputSample::default());
    let (headlines_tx, headlines_rx) = handoff_slot(HeadlineFeed::loading());

    let tasks = vec![
        tokio::spawn(metric_sampler_task(
            samplers.metrics,
            metrics_tx,
            running.clone(),
            schedule.metrics,
        )),
        tokio::spawn(network_sampler_task(
            samplers.network,
            history.clone(),
            throughput_tx,
            running.clone(),
            schedule.network,
        )),
        tokio::spawn(headline_task(
            samplers.headlines,
            headlines_tx,
            running.clone(),
            schedule.headlines,
        )),
    ];

    log::info!("All sampler tasks spawned");

    SamplerSet {
        context: DashboardContext {
            running,
            metrics: metrics_rx,
            throughput: throughput_rx,
            headlines: headlines_rx,
            history,
        },
        tasks,
    }
}

/// Wrapper around the Tokio runtime that hosts the samplers.
///
/// The render loop stays on the calling thread.
pub struct SamplerRuntime {
    pub context: DashboardContext,
    tasks: Vec<JoinHandle<()>>,
    runtime: tokio::runtime::Runtime,
}

impl SamplerRuntime {
    /// Create the runtime with all sampler tasks spawned.
    pub fn start(
        samplers: Samplers,
        schedule: SamplerSchedule,
        history_capacity: usize,
    ) -> Result<Self> {
        log::info!("Initializing sampler runtime");

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .thread_name("sampler-worker")
            .build()?;

        let set = {
            let _guard = runtime.enter();
            spawn_samplers(samplers, schedule, history_capacity)
        };

        Ok(Self {
            context: set.context,
            tasks: set.tasks,
            runtime,
        })
    }

    /// Clear the running flag and wait for every sampler task to exit.
    ///
    /// Sampler loops exit at their next iteration boundary; a cycle already
    /// in flight runs to completion first. Must not be called from inside
    /// another Tokio runtime.
    pub fn shutdown(self) {
        log::info!("Shutting down sampler runtime");
        self.context.running.stop();

        let tasks = self.tasks;
        self.runtime.block_on(async move {
            for task in tasks {
                if let Err(e) = task.await {
                    log::error!("Sampler task ended abnormally: {}", e);
                }
            }
        });

        log::info!("All sampler tasks finished");
    }
}

/// Run one synchronous sampling cycle on the blocking pool.
///
/// The state is moved in and handed back with the result. `None` means the
/// cycle panicked and the calling task should end.
pub(crate) async fn blocking_cycle<S, T, F>(mut state: S, cycle: F) -> Option<(S, T)>
where
    S: Send + 'static,
    T: Send + 'static,
    F: FnOnce(&mut S) -> T + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        let output = cycle(&mut state);
        (state, output)
    })
    .await;

    match result {
        Ok(done) => Some(done),
        Err(e) => {
            log::error!("Sampling cycle failed: {}", e);
            None
        }
    }
}
