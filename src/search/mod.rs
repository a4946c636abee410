//! Keyword-to-link resolution.
//!
//! `playlist add <name> lofi beats` resolves the keywords through a video
//! search service and takes the first result's watch link.

use crate::error::{Result, VoxlistError};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Mutex;

/// Default video search endpoint.
const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";

/// Trait for resolving free-text keywords to a video link.
#[async_trait]
pub trait LinkSearch: Send + Sync {
    /// First matching video link for `query`, or `None` when nothing matched.
    async fn first_link(&self, query: &str) -> Result<Option<String>>;
}

/// Search client against the video platform's REST API.
pub struct YoutubeSearchClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

impl YoutubeSearchClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: SEARCH_ENDPOINT.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Watch link for a video id.
    fn watch_url(video_id: &str) -> String {
        format!("https://www.youtube.com/watch?v={}", video_id)
    }
}

#[async_trait]
impl LinkSearch for YoutubeSearchClient {
    async fn first_link(&self, query: &str) -> Result<Option<String>> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", query),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VoxlistError::Search {
                message: format!("search request failed: {}", response.status()),
            });
        }

        let parsed: SearchResponse = response.json().await?;
        Ok(parsed
            .items
            .into_iter()
            .next()
            .and_then(|item| item.id.video_id)
            .map(|id| Self::watch_url(&id)))
    }
}

/// Fixed-response search, used by tests and the offline REPL mode.
///
/// Records every query so callers can assert whether (and with what) the
/// search adapter was consulted.
#[derive(Default)]
pub struct StaticSearch {
    result: Option<String>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    /// Search that never finds anything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Search that always resolves to `link`.
    pub fn with_result(link: &str) -> Self {
        Self {
            result: Some(link.to_string()),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl LinkSearch for StaticSearch {
    async fn first_link(&self, query: &str) -> Result<Option<String>> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query.to_string());
        Ok(self.result.clone())
    }
}
