use std::time::{Duration, Instant};

use matrix_monitor::core::dashboard::{
    merge_headlines, run_render_loop, GridDimensions, MetricSnapshot, Scheduler, SchedulerConfig,
    SurfaceEvent, ThroughputSample, LOADING_PLACEHOLDER, TICKER_ROW,
};

use super::common::{manual_context, FakeSurface, RecordingOpener};

fn config() -> SchedulerConfig {
    SchedulerConfig {
        seed: Some(11),
        ..Default::default()
    }
}

/// Run `ticks` animation ticks, one motion period apart.
fn run_ticks(scheduler: &mut Scheduler, start: Instant, ticks: u32) -> Instant {
    let period = config().motion_period;
    let mut now = start;
    for i in 0..ticks {
        now = start + period * i;
        scheduler.advance(now);
    }
    now
}

#[test]
fn test_quit_event_ends_loop_and_clears_running_flag() {
    let (context, _publishers) = manual_context(10);
    let running = context.running.clone();
    let mut scheduler = Scheduler::new(context, config());
    let mut surface = FakeSurface::new((80, 40), [SurfaceEvent::Quit]);
    let opener = RecordingOpener::default();

    run_render_loop(&mut scheduler, &mut surface, &opener).unwrap();

    assert!(!running.is_running());
    assert!(!surface.frames.is_empty());
    assert_eq!((surface.frames[0].width, surface.frames[0].height), (80, 40));
}

#[test]
fn test_resize_event_regrids_and_reseeds() {
    let (context, _publishers) = manual_context(10);
    let mut scheduler = Scheduler::new(context, config());
    let mut surface = FakeSurface::new(
        (80, 40),
        [SurfaceEvent::Resize { width: 60, height: 30 }, SurfaceEvent::Quit],
    );

    run_render_loop(&mut scheduler, &mut surface, &RecordingOpener::default()).unwrap();

    let animation = scheduler.animation();
    assert_eq!(animation.grid(), GridDimensions { columns: 60, rows: 30 });
    assert_eq!(animation.rain().background().len(), 60);
    assert!(animation.rain().background().iter().all(|d| d.position < 30));
    // A foreground drop may sit one row below the grid until its reset.
    assert!(animation.rain().foreground().iter().all(|d| d.position <= 30));
}

#[test]
fn test_resize_clamps_panel_inside_surface() {
    let (context, _publishers) = manual_context(10);
    let start = Instant::now();
    let mut scheduler = Scheduler::starting_at(context, config(), start);
    scheduler.resize(200, 60);
    run_ticks(&mut scheduler, start, 120);

    scheduler.resize(70, 12);
    let panel = scheduler.panel_extent();
    let cursor = scheduler.animation().panel;
    assert!(cursor.x >= 0.0 && cursor.x + panel.width <= 70.0);
    assert!(cursor.y >= 0.0 && cursor.y + panel.height <= 12.0);
}

#[test]
fn test_ticker_speed_is_bounded() {
    let (context, _publishers) = manual_context(10);
    let mut scheduler = Scheduler::new(context, config());
    let opener = RecordingOpener::default();

    for _ in 0..10 {
        scheduler.handle_event(SurfaceEvent::TickerFaster, &opener);
    }
    assert_eq!(scheduler.ticker_step(), 4.0);

    for _ in 0..10 {
        scheduler.handle_event(SurfaceEvent::TickerSlower, &opener);
    }
    assert_eq!(scheduler.ticker_step(), 1.0);
}

#[test]
fn test_click_on_ticker_opens_news_link() {
    let (context, _publishers) = manual_context(10);
    let start = Instant::now();
    let mut scheduler = Scheduler::starting_at(context, config(), start);
    let opener = RecordingOpener::default();

    // The ticker enters from the right edge, one cell per tick.
    scheduler.resize(20, 10);
    run_ticks(&mut scheduler, start, 10);
    assert_eq!(scheduler.animation().ticker.x, 10.0);

    scheduler.handle_event(SurfaceEvent::Click { column: 5, row: TICKER_ROW }, &opener);
    scheduler.handle_event(SurfaceEvent::Click { column: 12, row: TICKER_ROW + 1 }, &opener);
    assert!(opener.opened.lock().unwrap().is_empty());

    scheduler.handle_event(SurfaceEvent::Click { column: 12, row: TICKER_ROW }, &opener);
    assert_eq!(
        opener.opened.lock().unwrap().as_slice(),
        ["https://news.google.com".to_string()]
    );
}

#[test]
fn test_feed_update_keeps_ticker_position() {
    let (context, publishers) = manual_context(10);
    let start = Instant::now();
    let mut scheduler = Scheduler::starting_at(context, config(), start);
    scheduler.resize(100, 20);

    let now = run_ticks(&mut scheduler, start, 30);
    assert_eq!(scheduler.compose().ticker.text, LOADING_PLACEHOLDER);
    let before = scheduler.animation().ticker.x;

    publishers
        .headlines
        .publish(merge_headlines(vec!["Rates unchanged".to_string()], Vec::new()));
    scheduler.advance(now + config().motion_period);

    assert_eq!(scheduler.compose().ticker.text, "Rates unchanged");
    assert_eq!(scheduler.animation().ticker.x, before - 1.0);
}

#[test]
fn test_panel_color_cycles_per_published_snapshot() {
    let (context, publishers) = manual_context(10);
    let start = Instant::now();
    let mut scheduler = Scheduler::starting_at(context, config(), start);
    scheduler.resize(120, 40);

    let mut accents = Vec::new();
    for i in 0..3u32 {
        publishers.metrics.publish(MetricSnapshot {
            cpu_percent: 10.0 * i as f32,
            ..Default::default()
        });
        scheduler.advance(start + Duration::from_millis(20) * i);
        accents.push(scheduler.compose().panel.accent);
    }

    assert_ne!(accents[0], accents[1]);
    assert_ne!(accents[1], accents[2]);

    // No publish, no color change.
    scheduler.advance(start + Duration::from_millis(100));
    assert_eq!(scheduler.compose().panel.accent, accents[2]);
    assert_eq!(scheduler.snapshot().cpu_percent, 20.0);
}

#[test]
fn test_scene_reflects_throughput_and_history() {
    let (context, publishers) = manual_context(5);
    let history = context.history.clone();
    let mut scheduler = Scheduler::new(context, config());
    scheduler.resize(80, 24);

    for kbps in [1.0, 2.0, 3.0] {
        let sample = ThroughputSample {
            download_kbps: kbps,
            upload_kbps: kbps / 2.0,
        };
        history.write().push(sample);
        publishers.throughput.publish(sample);
    }
    scheduler.advance(Instant::now());

    let scene = scheduler.compose();
    assert_eq!(scene.chart.download, vec![1.0, 2.0, 3.0]);
    assert_eq!(scene.chart.upload, vec![0.5, 1.0, 1.5]);
    assert_eq!(scene.chart.capacity, 5);
    assert!(scene.chart.caption.contains("3.0 KB/s"));
    assert!(scene.chart.caption.contains("1.5 KB/s"));
}
