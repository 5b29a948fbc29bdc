use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use matrix_monitor::core::dashboard::{
    handoff_slot, headline_task, metric_sampler_task, network_sampler_task, shared_history,
    spawn_samplers, HeadlineAggregator, HeadlineFeed, MetricSampler, MetricSnapshot,
    NetworkSampler, RunFlag, SamplerRuntime, SamplerSchedule, Samplers, Scheduler,
    SchedulerConfig, ThroughputSample, HEADLINE_SEPARATOR, NO_HEADLINES_PLACEHOLDER,
};

use super::common::{manual_context, FakeProbe, FakeSource, SlowCpuProbe, SlowSource};

const WAIT: Duration = Duration::from_secs(5);

fn fast_schedule() -> SamplerSchedule {
    SamplerSchedule {
        metrics: Duration::from_millis(10),
        network: Duration::from_millis(10),
        headlines: Duration::from_millis(50),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_metric_task_publishes_and_stops() {
    let sampler = MetricSampler::new(Box::new(FakeProbe::new(37.5)));
    let (writer, mut reader) = handoff_slot(MetricSnapshot::default());
    let running = RunFlag::new();

    let task = tokio::spawn(metric_sampler_task(
        sampler,
        writer,
        running.clone(),
        Duration::from_millis(10),
    ));

    assert!(timeout(WAIT, reader.changed()).await.unwrap());
    let snapshot = reader.latest();
    assert_eq!(snapshot.cpu_percent, 37.5);
    assert_eq!(snapshot.mem_percent, 61.0);
    // The GPU is missing, so both GPU fields degrade to zero.
    assert_eq!(snapshot.gpu_percent, 0.0);
    assert_eq!(snapshot.gpu_mem_percent, 0.0);
    assert_eq!(snapshot.top_processes.len(), 5);
    assert_eq!(snapshot.top_processes[0].name, "proc-7");

    running.stop();
    timeout(WAIT, task).await.unwrap().unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_network_task_fills_bounded_history() {
    let sampler = NetworkSampler::new(Box::new(FakeProbe::new(0.0)));
    let history = shared_history(3);
    let (writer, mut reader) = handoff_slot(ThroughputSample::default());
    let running = RunFlag::new();

    let task = tokio::spawn(network_sampler_task(
        sampler,
        history.clone(),
        writer,
        running.clone(),
        Duration::from_millis(5),
    ));

    for _ in 0..6 {
        assert!(timeout(WAIT, reader.changed()).await.unwrap());
    }
    running.stop();
    timeout(WAIT, task).await.unwrap().unwrap();

    let history = history.read();
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|s| s.download_kbps > 0.0));
    assert!(history.iter().all(|s| s.upload_kbps > 0.0));

    // The published value is the newest history entry.
    let latest = *reader.latest();
    assert_eq!(history.iter().last().copied(), Some(latest));
}

#[tokio::test]
async fn test_headline_task_merges_sources_in_order() {
    let aggregator = HeadlineAggregator::new(
        FakeSource::ok("api", &["Markets rally", "  Storm   warning "]),
        FakeSource::ok("feed", &["Election results"]),
    );
    let (writer, mut reader) = handoff_slot(HeadlineFeed::loading());
    let running = RunFlag::new();

    let task = tokio::spawn(headline_task(
        aggregator,
        writer,
        running.clone(),
        Duration::from_secs(30),
    ));

    assert!(timeout(WAIT, reader.changed()).await.unwrap());
    let feed = reader.latest();
    assert_eq!(
        feed.headlines,
        vec!["Markets rally", "Storm warning", "Election results"]
    );
    assert_eq!(
        feed.ticker_text,
        ["Markets rally", "Storm warning", "Election results"].join(HEADLINE_SEPARATOR)
    );

    // Stopping interrupts the 30 s wait.
    running.stop();
    timeout(WAIT, task).await.unwrap().unwrap();
}

#[tokio::test]
async fn test_failing_sources_degrade_to_placeholder() {
    let aggregator =
        HeadlineAggregator::new(FakeSource::failing("api"), FakeSource::failing("feed"));
    assert_eq!(aggregator.refresh().await.ticker_text, NO_HEADLINES_PLACEHOLDER);

    let aggregator = HeadlineAggregator::new(
        FakeSource::failing("api"),
        FakeSource::ok("feed", &["Only the feed"]),
    );
    assert_eq!(aggregator.refresh().await.ticker_text, "Only the feed");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_spawned_samplers_publish_into_context() {
    let samplers = Samplers {
        metrics: MetricSampler::new(Box::new(FakeProbe::new(12.0))),
        network: NetworkSampler::new(Box::new(FakeProbe::new(0.0))),
        headlines: HeadlineAggregator::new(
            FakeSource::ok("api", &["One"]),
            FakeSource::ok("feed", &["Two"]),
        ),
    };

    let set = spawn_samplers(samplers, fast_schedule(), 4);
    let mut context = set.context.clone();

    assert!(timeout(WAIT, context.metrics.changed()).await.unwrap());
    assert!(timeout(WAIT, context.headlines.changed()).await.unwrap());
    for _ in 0..5 {
        assert!(timeout(WAIT, context.throughput.changed()).await.unwrap());
    }

    assert_eq!(context.metrics.latest().cpu_percent, 12.0);
    assert_eq!(context.headlines.latest().headlines, vec!["One", "Two"]);
    assert!(context.history.read().len() <= 4);

    context.running.stop();
    for task in set.tasks {
        timeout(WAIT, task).await.unwrap().unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_metric_cycles_never_overlap() {
    let probe = SlowCpuProbe::new(Duration::from_millis(50));
    let max_in_flight = probe.max_in_flight.clone();
    let (writer, mut reader) = handoff_slot(MetricSnapshot::default());
    let running = RunFlag::new();

    // Each cycle takes ten periods.
    let task = tokio::spawn(metric_sampler_task(
        MetricSampler::new(Box::new(probe)),
        writer,
        running.clone(),
        Duration::from_millis(5),
    ));

    let mut seen = Vec::new();
    for _ in 0..4 {
        assert!(timeout(WAIT, reader.changed()).await.unwrap());
        seen.push(reader.latest().cpu_percent);
    }
    running.stop();
    timeout(WAIT, task).await.unwrap().unwrap();

    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
    // The priming read is 1; every later cycle publishes a newer read.
    assert!(seen[0] >= 2.0);
    assert!(seen.windows(2).all(|pair| pair[1] > pair[0]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_render_advances_on_previous_snapshot_while_cycle_blocks() {
    let probe = SlowCpuProbe::new(Duration::from_millis(400));
    let in_flight = probe.in_flight.clone();
    let (writer, reader) = handoff_slot(MetricSnapshot::default());
    let mut watcher = reader.clone();

    let (mut context, _publishers) = manual_context(10);
    context.metrics = reader;
    let running = context.running.clone();

    let config = SchedulerConfig {
        seed: Some(5),
        ..Default::default()
    };
    let period = config.motion_period;
    let start = Instant::now();
    let mut scheduler = Scheduler::starting_at(context, config, start);
    scheduler.resize(80, 24);

    let task = tokio::spawn(metric_sampler_task(
        MetricSampler::new(Box::new(probe)),
        writer,
        running.clone(),
        Duration::from_millis(5),
    ));

    assert!(timeout(WAIT, watcher.changed()).await.unwrap());
    assert!(scheduler.advance(start));
    assert_eq!(scheduler.snapshot().cpu_percent, 2.0);

    // The next cycle starts right away and blocks inside the CPU read.
    timeout(WAIT, async {
        while in_flight.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .unwrap();

    for i in 1..=5 {
        assert!(scheduler.advance(start + period * i));
        assert_eq!(scheduler.snapshot().cpu_percent, 2.0);
    }

    // Once the cycle completes the new snapshot is picked up.
    assert!(timeout(WAIT, watcher.changed()).await.unwrap());
    scheduler.advance(start + period * 6);
    assert_eq!(scheduler.snapshot().cpu_percent, 3.0);

    running.stop();
    timeout(WAIT, task).await.unwrap().unwrap();
}

#[test]
fn test_shutdown_lets_in_flight_headline_refresh_finish() {
    let slow = SlowSource::new(Duration::from_millis(1500));
    let finished = slow.finished.clone();
    let samplers = Samplers {
        metrics: MetricSampler::new(Box::new(FakeProbe::new(12.0))),
        network: NetworkSampler::new(Box::new(FakeProbe::new(0.0))),
        headlines: HeadlineAggregator::new(slow, FakeSource::ok("feed", &["Two"])),
    };

    let runtime = SamplerRuntime::start(samplers, fast_schedule(), 4).unwrap();
    let headlines = runtime.context.headlines.clone();
    std::thread::sleep(Duration::from_millis(200));

    runtime.shutdown();

    assert!(finished.load(Ordering::SeqCst));
    assert_eq!(headlines.latest().headlines, vec!["Late edition", "Two"]);
}
