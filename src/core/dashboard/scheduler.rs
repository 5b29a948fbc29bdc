//! Render loop coordinator.
//!
//! Owns the animation state, drives its fixed-rate ticks, picks up whatever
//! the samplers last published and composes it all into a [`Scene`] for the
//! display surface. Never waits on a sampler.

use std::sync::Arc;
use std::time::{Duration, Instant};

use unicode_width::UnicodeWidthStr;

use super::animation::{Accent, AnimationState, Extent, Glyph};
use super::metrics::{HeadlineFeed, MetricSnapshot, ThroughputSample};
use super::runtime::DashboardContext;
use crate::error::Result;

pub const DEFAULT_RAIN_PERIOD: Duration = Duration::from_millis(10);
pub const DEFAULT_MOTION_PERIOD: Duration = Duration::from_millis(20);
pub const TICKER_ROW: u16 = 0;
pub const MIN_TICKER_STEP: f32 = 1.0;
pub const MAX_TICKER_STEP: f32 = 4.0;
const PROCESS_NAME_WIDTH: usize = 20;

/// Fixed-period trigger. Missed periods are skipped, not replayed.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    period: Duration,
    next: Instant,
}

impl Cadence {
    pub fn new(period: Duration, start: Instant) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            next: start,
        }
    }

    /// Whether the cadence is due at `now`; fires at most once per call.
    pub fn fire(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }

    pub fn until_next(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }
}

/// Input the display surface hands back to the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    Resize { width: u16, height: u16 },
    Click { column: u16, row: u16 },
    TickerFaster,
    TickerSlower,
    Quit,
}

/// Where composed frames go.
pub trait DisplaySurface {
    /// Current size in cells
    fn size(&self) -> Result<(u16, u16)>;

    /// Replace whatever is on screen with `scene`
    fn present(&mut self, scene: &Scene) -> Result<()>;

    /// Wait at most `timeout` for one input event
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<SurfaceEvent>>;
}

/// Opens the news link when the ticker is clicked.
pub trait LinkOpener {
    fn open(&self, url: &str) -> Result<()>;
}

/// The bouncing info panel as it should appear this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub x: u16,
    pub y: u16,
    pub lines: Vec<String>,
    pub accent: Accent,
}

/// The ticker as it should appear this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerView {
    /// Column of the first character; may be negative while scrolling out.
    pub x: i32,
    pub row: u16,
    pub text: String,
}

/// Network chart data, oldest sample first.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub download: Vec<f64>,
    pub upload: Vec<f64>,
    pub capacity: usize,
    pub peak: f64,
    pub caption: String,
}

/// One composed frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: u16,
    pub height: u16,
    pub cell_width: u16,
    pub cell_height: u16,
    pub glyphs: Vec<Glyph>,
    pub chart: ChartView,
    pub panel: PanelView,
    pub ticker: TickerView,
}

/// Render-loop settings.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub rain_period: Duration,
    pub motion_period: Duration,
    pub cell_width: u16,
    pub cell_height: u16,
    pub news_link: String,
    pub seed: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            rain_period: DEFAULT_RAIN_PERIOD,
            motion_period: DEFAULT_MOTION_PERIOD,
            cell_width: 1,
            cell_height: 1,
            news_link: "https://news.google.com".to_string(),
            seed: None,
        }
    }
}

/// The single coordinator of the render side.
pub struct Scheduler {
    context: DashboardContext,
    animation: AnimationState,
    rain: Cadence,
    motion: Cadence,
    news_link: String,
    ticker_step: f32,
    color_index: usize,
    accent: Accent,
    snapshot: Arc<MetricSnapshot>,
    throughput: Arc<ThroughputSample>,
    feed: Arc<HeadlineFeed>,
    panel_lines: Vec<String>,
    panel_extent: Extent,
    ticker_width: f32,
}

impl Scheduler {
    pub fn new(context: DashboardContext, config: SchedulerConfig) -> Self {
        Self::starting_at(context, config, Instant::now())
    }

    pub fn starting_at(context: DashboardContext, config: SchedulerConfig, start: Instant) -> Self {
        let animation = match config.seed {
            Some(seed) => AnimationState::with_seed(seed, config.cell_width, config.cell_height),
            None => AnimationState::new(config.cell_width, config.cell_height),
        };

        let snapshot = context.metrics.latest();
        let throughput = context.throughput.latest();
        let feed = context.headlines.latest();
        let panel_lines = info_lines(&snapshot);
        let panel_extent = text_extent(&panel_lines);
        let ticker_width = feed.ticker_text.width() as f32;

        Self {
            context,
            animation,
            rain: Cadence::new(config.rain_period, start),
            motion: Cadence::new(config.motion_period, start),
            news_link: config.news_link,
            ticker_step: MIN_TICKER_STEP,
            color_index: 0,
            accent: Accent::White,
            snapshot,
            throughput,
            feed,
            panel_lines,
            panel_extent,
            ticker_width,
        }
    }

    pub fn is_running(&self) -> bool {
        self.context.running.is_running()
    }

    pub fn stop(&self) {
        self.context.running.stop();
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    /// Snapshot currently shown in the info panel.
    pub fn snapshot(&self) -> &MetricSnapshot {
        &self.snapshot
    }

    pub fn ticker_step(&self) -> f32 {
        self.ticker_step
    }

    pub fn panel_extent(&self) -> Extent {
        self.panel_extent
    }

    /// Adopt a new surface size: regrid, reseed drops, re-clamp the panel.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.animation.resize(width, height, self.panel_extent) {
            log::debug!("Rain grid now {:?}", self.animation.grid());
        }
    }

    /// Pull fresh sampler output and run every animation tick that is due.
    ///
    /// Returns whether anything visible changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let mut changed = self.pull_published();

        if self.rain.fire(now) {
            self.animation.tick_rain();
            changed = true;
        }

        if self.motion.fire(now) {
            self.animation.tick_panel(self.panel_extent);
            self.animation.tick_ticker(self.ticker_step, self.ticker_width);
            changed = true;
        }

        changed
    }

    /// Time until the next animation tick is due.
    pub fn until_next_tick(&self, now: Instant) -> Duration {
        self.rain.until_next(now).min(self.motion.until_next(now))
    }

    fn pull_published(&mut self) -> bool {
        let (snapshot, fresh_snapshot) = self.context.metrics.take_latest();
        if fresh_snapshot {
            self.accent = Accent::cycled(self.color_index);
            self.color_index = self.color_index.wrapping_add(1);
            self.panel_lines = info_lines(&snapshot);
            self.panel_extent = text_extent(&self.panel_lines);
            self.snapshot = snapshot;
        }

        let (throughput, fresh_throughput) = self.context.throughput.take_latest();
        self.throughput = throughput;

        // Scroll position survives a content change.
        let (feed, fresh_feed) = self.context.headlines.take_latest();
        if fresh_feed {
            self.ticker_width = feed.ticker_text.width() as f32;
            self.feed = feed;
        }

        fresh_snapshot || fresh_throughput || fresh_feed
    }

    /// Build the frame from the current state.
    pub fn compose(&self) -> Scene {
        let surface = self.animation.surface();
        let (cell_width, cell_height) = self.animation.cell_size();
        let history = self.context.history.read();

        Scene {
            width: surface.width as u16,
            height: surface.height as u16,
            cell_width,
            cell_height,
            glyphs: self.animation.glyphs().to_vec(),
            chart: ChartView {
                download: history.iter().map(|s| s.download_kbps).collect(),
                upload: history.iter().map(|s| s.upload_kbps).collect(),
                capacity: history.capacity(),
                peak: history.peak_kbps(),
                caption: format!(
                    "↓ {:5.1} KB/s    ↑ {:5.1} KB/s",
                    self.throughput.download_kbps, self.throughput.upload_kbps
                ),
            },
            panel: PanelView {
                x: self.animation.panel.x.max(0.0) as u16,
                y: self.animation.panel.y.max(0.0) as u16,
                lines: self.panel_lines.clone(),
                accent: self.accent,
            },
            ticker: TickerView {
                x: self.animation.ticker.x.floor() as i32,
                row: TICKER_ROW,
                text: self.feed.ticker_text.clone(),
            },
        }
    }

    /// Whether a click at (column, row) lands on ticker text.
    pub fn ticker_hit(&self, column: u16, row: u16) -> bool {
        if row != TICKER_ROW {
            return false;
        }
        let start = self.animation.ticker.x.floor();
        let column = column as f32;
        column >= start && column < start + self.ticker_width
    }

    pub fn handle_event(&mut self, event: SurfaceEvent, opener: &dyn LinkOpener) {
        match event {
            SurfaceEvent::Resize { width, height } => self.resize(width, height),
            SurfaceEvent::Click { column, row } => {
                if self.ticker_hit(column, row) {
                    log::info!("Opening {}", self.news_link);
                    if let Err(e) = opener.open(&self.news_link) {
                        log::warn!("Failed to open {}: {}", self.news_link, e);
                    }
                }
            }
            SurfaceEvent::TickerFaster => {
                self.ticker_step = (self.ticker_step + 1.0).min(MAX_TICKER_STEP);
            }
            SurfaceEvent::TickerSlower => {
                self.ticker_step = (self.ticker_step - 1.0).max(MIN_TICKER_STEP);
            }
            SurfaceEvent::Quit => self.stop(),
        }
    }
}

/// Drive `surface` until the running flag is cleared.
pub fn run_render_loop(
    scheduler: &mut Scheduler,
    surface: &mut dyn DisplaySurface,
    opener: &dyn LinkOpener,
) -> Result<()> {
    let (width, height) = surface.size()?;
    scheduler.resize(width, height);

    let mut frames: u64 = 0;
    while scheduler.is_running() {
        if scheduler.advance(Instant::now()) {
            surface.present(&scheduler.compose())?;
            frames += 1;
        }

        let timeout = scheduler.until_next_tick(Instant::now());
        if let Some(event) = surface.poll_event(timeout)? {
            scheduler.handle_event(event, opener);
        }
    }

    log::info!("Render loop stopped after {} frames", frames);
    Ok(())
}

/// Info panel text for a snapshot.
pub fn info_lines(snapshot: &MetricSnapshot) -> Vec<String> {
    let mut lines = Vec::with_capacity(snapshot.top_processes.len() + 2);
    lines.push(format!(
        "CPU: {:5.1}%  RAM: {:5.1}%  GPU: {:5.1}%  GPU-RAM: {:5.1}%",
        snapshot.cpu_percent, snapshot.mem_percent, snapshot.gpu_percent, snapshot.gpu_mem_percent
    ));
    lines.push("Top 5 processes:".to_string());
    for process in &snapshot.top_processes {
        let name: String = process.name.chars().take(PROCESS_NAME_WIDTH).collect();
        lines.push(format!(
            "{:<width$} | CPU: {:5.1}% | MEM: {:5.1}%",
            name,
            process.cpu_percent,
            process.mem_percent,
            width = PROCESS_NAME_WIDTH
        ));
    }
    lines
}

fn text_extent(lines: &[String]) -> Extent {
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0);
    Extent::new(width as f32, lines.len() as f32)
}
