use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::config::Config;
use crate::error::UpstreamError;
use crate::http_client::get_text;

const QUERY_TERM: &str = "football";
const LOOKBACK_DAYS: i64 = 7;
const PAGE_SIZE: &str = "20";

#[derive(Debug, Clone, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "publishedAt", default)]
    pub published_at: String,
    #[serde(default)]
    pub source: Source,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub name: String,
}

/// English-language football articles from the last week, newest first,
/// capped at one page.
pub async fn fetch_news(client: &Client, config: &Config) -> Result<NewsResponse, UpstreamError> {
    let key = config
        .news_api_key
        .as_deref()
        .ok_or(UpstreamError::MissingKey("NEWS_API_KEY"))?;
    let from_date = (Utc::now() - ChronoDuration::days(LOOKBACK_DAYS))
        .format("%Y-%m-%d")
        .to_string();
    let body = get_text(client.get(&config.news_api_url).query(&[
        ("q", QUERY_TERM),
        ("from", from_date.as_str()),
        ("sortBy", "publishedAt"),
        ("language", "en"),
        ("pageSize", PAGE_SIZE),
        ("apiKey", key),
    ]))
    .await?;
    parse_news_json(&body)
}

pub fn parse_news_json(raw: &str) -> Result<NewsResponse, UpstreamError> {
    Ok(serde_json::from_str(raw)?)
}
