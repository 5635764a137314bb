//! DuckDuckGo instant-answer search
use crate::{check_status, http_client, network_error};
use async_trait::async_trait;
use launch_core::{CollaboratorError, SearchHit, SearchProvider};
use serde::Deserialize;
use std::time::Duration;

const DUCKDUCKGO_URL: &str = "https://api.duckduckgo.com/";
const USER_AGENT: &str = "ProductLaunchBot/1.0";

/// Hits returned per query unless configured otherwise
pub const DEFAULT_MAX_RESULTS: usize = 5;

pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    base_url: String,
    max_results: usize,
}

impl DuckDuckGoSearch {
    pub fn new(timeout: Duration, max_results: usize) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: http_client(timeout, USER_AGENT)?,
            base_url: DUCKDUCKGO_URL.to_string(),
            max_results,
        })
    }

    /// Point at another instant-answer compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch(&self, query: &str) -> Result<InstantAnswer, CollaboratorError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(network_error)?;
        check_status(&response)?;

        // DuckDuckGo answers with a javascript content type, so decode by hand
        let body = response.text().await.map_err(network_error)?;
        serde_json::from_str(&body).map_err(|e| CollaboratorError::Parse(e.to_string()))
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Vec<SearchHit> {
        match self.fetch(query).await {
            Ok(answer) => {
                let hits = parse_instant_answer(answer, self.max_results);
                tracing::debug!(query, hits = hits.len(), "search complete");
                hits
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "search failed");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstantAnswer {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub abstract_text: String,
    #[serde(default, rename = "AbstractURL")]
    pub abstract_url: String,
    #[serde(default)]
    pub related_topics: Vec<RelatedTopic>,
}

/// Either a plain topic or a named group of topics; only plain ones carry `Text`
#[derive(Debug, Default, Deserialize)]
pub struct RelatedTopic {
    #[serde(rename = "Text")]
    pub text: Option<String>,
    #[serde(default, rename = "FirstURL")]
    pub first_url: String,
}

/// Abstract first (when it has a URL), then related topics, capped at `max_results`
pub fn parse_instant_answer(answer: InstantAnswer, max_results: usize) -> Vec<SearchHit> {
    let mut hits = Vec::new();

    if !answer.abstract_url.is_empty() {
        hits.push(SearchHit {
            title: non_empty_or(answer.heading, "No title"),
            snippet: non_empty_or(answer.abstract_text, "No description"),
            url: answer.abstract_url,
        });
    }

    for topic in answer.related_topics.into_iter().take(max_results) {
        let Some(text) = topic.text else {
            continue;
        };
        let title = text.split(" - ").next().unwrap_or_default().to_string();
        hits.push(SearchHit {
            title,
            snippet: text,
            url: topic.first_url,
        });
    }

    hits.truncate(max_results);
    hits
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
