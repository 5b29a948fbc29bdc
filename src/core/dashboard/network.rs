//! Network throughput sampling.

use std::time::{Duration, Instant};
use tokio::time::{interval_at, MissedTickBehavior};

use super::history::SharedHistory;
use super::metrics::{NetworkCounters, ThroughputSample};
use super::probe::HostProbe;
use super::runtime::blocking_cycle;
use super::shutdown::RunFlag;
use super::slot::SlotWriter;

const BYTES_PER_KB: f64 = 1024.0;

/// Turns cumulative byte counters into KB/s rates.
pub struct NetworkSampler {
    probe: Box<dyn HostProbe>,
    baseline: Option<(NetworkCounters, Instant)>,
}

impl NetworkSampler {
    pub fn new(probe: Box<dyn HostProbe>) -> Self {
        Self {
            probe,
            baseline: None,
        }
    }

    /// Record the counters every later rate is measured against.
    pub fn prime(&mut self) {
        self.prime_at(Instant::now());
    }

    pub fn prime_at(&mut self, now: Instant) {
        match self.probe.sample_network_counters() {
            Ok(counters) => self.baseline = Some((counters, now)),
            Err(e) => log::warn!("Network counters unavailable: {}", e),
        }
    }

    pub fn sample(&mut self) -> ThroughputSample {
        self.sample_at(Instant::now())
    }

    /// Throughput since the previous reading.
    ///
    /// The first reading, and any failed reading, yields a zero sample.
    /// A failed reading keeps the old baseline so the next rate spans the gap.
    pub fn sample_at(&mut self, now: Instant) -> ThroughputSample {
        let counters = match self.probe.sample_network_counters() {
            Ok(counters) => counters,
            Err(e) => {
                log::warn!("Network counters unavailable: {}", e);
                return ThroughputSample::default();
            }
        };

        let sample = match self.baseline {
            Some((previous, since)) => {
                throughput(previous, counters, now.saturating_duration_since(since))
            }
            None => ThroughputSample::default(),
        };
        self.baseline = Some((counters, now));
        sample
    }
}

/// Rate between two counter readings; negative deltas (counter resets)
/// clamp to zero.
pub fn throughput(
    previous: NetworkCounters,
    current: NetworkCounters,
    elapsed: Duration,
) -> ThroughputSample {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return ThroughputSample::default();
    }

    if current.bytes_received < previous.bytes_received || current.bytes_sent < previous.bytes_sent {
        log::debug!(
            "Network counter reset: {:?} -> {:?}",
            previous,
            current
        );
    }

    let rx_diff = current.bytes_received.saturating_sub(previous.bytes_received);
    let tx_diff = current.bytes_sent.saturating_sub(previous.bytes_sent);

    ThroughputSample {
        download_kbps: rx_diff as f64 / BYTES_PER_KB / secs,
        upload_kbps: tx_diff as f64 / BYTES_PER_KB / secs,
    }
}

/// Task that measures throughput every `period`.
///
/// Each sample is appended to the shared history first, then published as
/// the current value.
pub async fn network_sampler_task(
    sampler: NetworkSampler,
    history: SharedHistory,
    slot: SlotWriter<ThroughputSample>,
    running: RunFlag,
    period: Duration,
) {
    log::info!("Network sampler task started");

    let Some((mut sampler, ())) = blocking_cycle(sampler, NetworkSampler::prime).await else {
        return;
    };

    let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    while running.is_running() {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = running.stopped() => break,
        }

        match blocking_cycle(sampler, NetworkSampler::sample).await {
            Some((returned, sample)) => {
                history.write().push(sample);
                slot.publish(sample);
                sampler = returned;
            }
            None => break,
        }
    }

    log::info!("Network sampler task shutting down");
}
