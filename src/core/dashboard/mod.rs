//! Concurrent sampling-and-rendering engine.
//!
//! Samplers run as independent Tokio tasks and publish into single-value
//! handoff slots; the render loop reads those slots, advances the
//! animation state and composes frames without ever waiting on a sampler.

mod animation;
mod gpu;
mod headlines;
mod history;
mod metrics;
mod network;
mod probe;
mod runtime;
mod sampler;
mod scheduler;
mod shutdown;
mod slot;
pub mod sources;

pub use animation::{
    Accent, AnimationCursor, AnimationState, DropColumn, DropKind, Extent, Glyph, GridDimensions,
    RainField, Reflection, TickerCursor, Tint, GLYPHS,
};
pub use gpu::{GpuProvider, GpuReading};
pub use headlines::{
    format_headline, headline_task, merge_headlines, FetchFuture, HeadlineAggregator,
    HeadlineSource, HEADLINE_SEPARATOR, LOADING_PLACEHOLDER, NO_HEADLINES_PLACEHOLDER,
};
pub use history::{shared_history, SharedHistory, ThroughputHistory, DEFAULT_HISTORY_SIZE};
pub use metrics::{
    sort_and_truncate_processes, HeadlineFeed, MetricSnapshot, NetworkCounters, ProcessSample,
    ThroughputSample,
};
pub use network::{network_sampler_task, throughput, NetworkSampler};
pub use probe::{HostProbe, SysinfoProbe};
pub use runtime::{
    spawn_samplers, DashboardContext, SamplerRuntime, SamplerSchedule, SamplerSet, Samplers,
};
pub use sampler::{metric_sampler_task, MetricSampler, DEFAULT_TOP_PROCESSES};
pub use scheduler::{
    info_lines, run_render_loop, Cadence, ChartView, DisplaySurface, LinkOpener, PanelView, Scene,
    Scheduler, SchedulerConfig, SurfaceEvent, TickerView, DEFAULT_MOTION_PERIOD,
    DEFAULT_RAIN_PERIOD, MAX_TICKER_STEP, MIN_TICKER_STEP, TICKER_ROW,
};
pub use shutdown::RunFlag;
pub use slot::{handoff_slot, SlotReader, SlotWriter};
