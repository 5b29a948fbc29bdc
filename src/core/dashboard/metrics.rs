use serde::{Deserialize, Serialize};

/// One sampling cycle worth of host readings.
///
/// Produced whole by the metric sampler and replaced wholesale on the next
/// cycle. GPU fields read `0.0` both when the GPU is idle and when it could
/// not be queried.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub timestamp: i64, // Unix timestamp
    pub cpu_percent: f32,
    pub mem_percent: f32,
    pub gpu_percent: f32,
    pub gpu_mem_percent: f32,
    pub top_processes: Vec<ProcessSample>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub name: String,
    pub cpu_percent: f32,
    pub mem_percent: f32,
}

/// Instantaneous network throughput in KB/s, both non-negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThroughputSample {
    pub download_kbps: f64,
    pub upload_kbps: f64,
}

/// Cumulative byte counters summed over all interfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkCounters {
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

/// Headline list of one fetch cycle, API source first, feed source second.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlineFeed {
    pub headlines: Vec<String>,
    /// Text shown in the ticker: headlines joined by the separator, or the
    /// placeholder when there are none.
    pub ticker_text: String,
}

/// Sort processes descending by (cpu, mem) and keep the first `limit`.
pub fn sort_and_truncate_processes(mut processes: Vec<ProcessSample>, limit: usize) -> Vec<ProcessSample> {
    processes.sort_by(|a, b| {
        b.cpu_percent
            .total_cmp(&a.cpu_percent)
            .then_with(|| b.mem_percent.total_cmp(&a.mem_percent))
    });
    processes.truncate(limit);
    processes
}
