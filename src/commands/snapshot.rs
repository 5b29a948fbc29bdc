//! One-shot JSON output (for scripting).

use std::time::Duration;

use anyhow::Result;
use clap::ArgMatches;
use serde::Serialize;

use super::load_config;
use crate::core::dashboard::{
    MetricSampler, MetricSnapshot, NetworkSampler, SysinfoProbe, ThroughputSample,
};

#[derive(Debug, Serialize)]
pub struct SnapshotReport {
    pub metrics: MetricSnapshot,
    pub throughput: ThroughputSample,
}

/// Execute the snapshot command
pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    config.validate()?;

    let mut metrics = MetricSampler::with_top_processes(
        Box::new(SysinfoProbe::new()),
        config.top_processes,
    );
    let mut network = NetworkSampler::new(Box::new(SysinfoProbe::new()));

    metrics.prime();
    network.prime();

    // One network period between counter reads; CPU usage needs at least
    // the sysinfo minimum.
    let wait = Duration::from_millis(config.network_interval_ms).max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    std::thread::sleep(wait);

    let report = SnapshotReport {
        metrics: metrics.sample(),
        throughput: network.sample(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
