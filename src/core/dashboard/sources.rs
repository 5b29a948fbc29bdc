//! Concrete headline sources: NewsAPI (JSON) and an RSS 2.0 feed.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use super::headlines::{format_headline, FetchFuture, HeadlineSource};
use crate::error::{MonitorError, Result};

pub const NEWS_API_URL: &str = "https://newsapi.org/v2/top-headlines";
pub const DEFAULT_RSS_URL: &str = "https://www.tagesschau.de/xml/rss2/";

const USER_AGENT: &str = concat!("matrix-monitor/", env!("CARGO_PKG_VERSION"));

static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<item\b[^>]*>(.*?)</item>").expect("valid item regex"));
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<title\b[^>]*>(.*?)</title>").expect("valid title regex"));
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<description\b[^>]*>(.*?)</description>").expect("valid description regex")
});
static CDATA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid cdata regex"));
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("valid tag regex"));

fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?)
}

async fn get_text(request: reqwest::RequestBuilder) -> Result<String> {
    let response = request.send().await?;
    if !response.status().is_success() {
        return Err(MonitorError::fetch(format!(
            "server returned status {}",
            response.status()
        )));
    }
    Ok(response.text().await?)
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Top headlines from newsapi.org.
pub struct NewsApiSource {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    country: String,
}

impl NewsApiSource {
    pub fn new(api_key: Option<String>, country: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            url: NEWS_API_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            country: country.into(),
        })
    }
}

impl HeadlineSource for NewsApiSource {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            let api_key = self
                .api_key
                .as_deref()
                .ok_or_else(|| MonitorError::fetch("no NewsAPI key configured"))?;

            let request = self.client.get(&self.url).query(&[
                ("country", self.country.as_str()),
                ("category", "general"),
                ("pageSize", "10"),
                ("apiKey", api_key),
            ]);
            let body = get_text(request).await?;
            parse_news_api(&body)
        })
    }
}

/// Headlines from a NewsAPI `top-headlines` JSON body.
pub fn parse_news_api(body: &str) -> Result<Vec<String>> {
    let response: NewsApiResponse = serde_json::from_str(body)?;
    if response.status.as_deref() == Some("error") {
        return Err(MonitorError::fetch(format!(
            "NewsAPI error: {}",
            response.message.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(response
        .articles
        .into_iter()
        .map(|a| format_headline(a.title.as_deref().unwrap_or(""), a.description.as_deref()))
        .collect())
}

/// Items of an RSS 2.0 feed.
pub struct RssFeedSource {
    client: reqwest::Client,
    url: String,
}

impl RssFeedSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: http_client(timeout)?,
            url: url.into(),
        })
    }
}

impl HeadlineSource for RssFeedSource {
    fn name(&self) -> &'static str {
        "rss"
    }

    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(async move {
            let body = get_text(self.client.get(&self.url)).await?;
            parse_rss(&body)
        })
    }
}

/// Headlines from an RSS 2.0 document, in item order.
pub fn parse_rss(body: &str) -> Result<Vec<String>> {
    if !body.contains("<rss") && !body.contains("<channel") {
        return Err(MonitorError::fetch("response is not an RSS document"));
    }

    Ok(ITEM_RE
        .captures_iter(body)
        .map(|item| {
            let item = &item[1];
            let title = element_text(&TITLE_RE, item).unwrap_or_default();
            let description = element_text(&DESCRIPTION_RE, item);
            format_headline(&title, description.as_deref())
        })
        .collect())
}

fn element_text(re: &Regex, item: &str) -> Option<String> {
    let raw = re.captures(item)?.get(1)?.as_str();
    let text = CDATA_RE.replace_all(raw, "$1");
    // Markup goes before entities are decoded, so `&lt;` stays text.
    let text = TAG_RE.replace_all(&text, " ");
    let text = unescape_xml(&text);
    Some(text.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
