//! Headline aggregation for the news ticker.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

use super::metrics::HeadlineFeed;
use super::shutdown::RunFlag;
use super::slot::SlotWriter;
use crate::error::Result;

pub const HEADLINE_SEPARATOR: &str = "   ***   ";
pub const NO_HEADLINES_PLACEHOLDER: &str = "No news available";
pub const LOADING_PLACEHOLDER: &str = "Loading news...";

pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>>;

/// A source of headlines. Fails with `MonitorError::Fetch` (or an HTTP/JSON
/// error) when the source is unreachable or unparseable.
pub trait HeadlineSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch(&self) -> FetchFuture<'_>;
}

impl HeadlineFeed {
    /// Feed shown before the first fetch completes.
    pub fn loading() -> Self {
        Self {
            headlines: Vec::new(),
            ticker_text: LOADING_PLACEHOLDER.to_string(),
        }
    }
}

/// Merges the API source and the feed source into one ticker string.
pub struct HeadlineAggregator {
    api: Box<dyn HeadlineSource>,
    feed: Box<dyn HeadlineSource>,
}

impl HeadlineAggregator {
    pub fn new(api: Box<dyn HeadlineSource>, feed: Box<dyn HeadlineSource>) -> Self {
        Self { api, feed }
    }

    /// Fetch both sources concurrently. A failing source counts as empty.
    pub async fn refresh(&self) -> HeadlineFeed {
        let (api, feed) = tokio::join!(self.api.fetch(), self.feed.fetch());
        merge_headlines(
            settle(self.api.name(), api),
            settle(self.feed.name(), feed),
        )
    }
}

fn settle(source: &str, fetched: Result<Vec<String>>) -> Vec<String> {
    match fetched {
        Ok(headlines) => {
            log::debug!("Fetched {} headlines from {}", headlines.len(), source);
            headlines
        }
        Err(e) => {
            log::warn!("Headline source {} failed: {}", source, e);
            Vec::new()
        }
    }
}

/// API headlines first, then feed headlines, each in source order.
pub fn merge_headlines(api: Vec<String>, feed: Vec<String>) -> HeadlineFeed {
    let headlines: Vec<String> = api
        .into_iter()
        .chain(feed)
        .map(|h| h.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|h| !h.is_empty())
        .collect();

    let ticker_text = if headlines.is_empty() {
        NO_HEADLINES_PLACEHOLDER.to_string()
    } else {
        headlines.join(HEADLINE_SEPARATOR)
    };

    HeadlineFeed {
        headlines,
        ticker_text,
    }
}

/// Render an article as `title - summary`, or just `title`.
pub fn format_headline(title: &str, summary: Option<&str>) -> String {
    match summary.map(str::trim).filter(|s| !s.is_empty()) {
        Some(summary) => format!("{} - {}", title.trim(), summary),
        None => title.trim().to_string(),
    }
}

/// Task that refreshes the ticker text every `period`.
pub async fn headline_task(
    aggregator: HeadlineAggregator,
    slot: SlotWriter<HeadlineFeed>,
    running: RunFlag,
    period: Duration,
) {
    log::info!("Headline task started");

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while running.is_running() {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = running.stopped() => break,
        }

        let feed = aggregator.refresh().await;
        log::debug!("Publishing {} headlines", feed.headlines.len());
        slot.publish(feed);
    }

    log::info!("Headline task shutting down");
}
