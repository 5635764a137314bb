//! HTML page scraping and product-information extraction
use crate::{check_status, http_client, network_error};
use async_trait::async_trait;
use launch_core::{CollaboratorError, PageScraper, ScrapedPage};
use scraper::{Html, Selector};
use serde::Serialize;
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const MAX_HEADINGS: usize = 10;
const MAX_SNIPPETS: usize = 5;
const MAX_LINKS: usize = 10;
/// Paragraphs must be longer than this to count as content
const MIN_SNIPPET_CHARS: usize = 50;

const MAX_PRICING_MENTIONS: usize = 3;
const MAX_FEATURE_MENTIONS: usize = 5;

const PRICING_KEYWORDS: [&str; 6] = ["price", "pricing", "cost", "$", "€", "£"];
const FEATURE_KEYWORDS: [&str; 4] = ["feature", "benefit", "capability", "includes"];

/// Raw content pulled from one HTML document
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageContent {
    pub title: String,
    pub description: String,
    pub headings: Vec<String>,
    pub content_snippets: Vec<String>,
    pub external_links: Vec<String>,
}

pub struct WebScraper {
    client: reqwest::Client,
}

impl WebScraper {
    pub fn new(timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: http_client(timeout, BROWSER_USER_AGENT)?,
        })
    }

    async fn fetch(&self, url: &str) -> Result<String, CollaboratorError> {
        let response = self.client.get(url).send().await.map_err(network_error)?;
        check_status(&response)?;
        response.text().await.map_err(network_error)
    }
}

#[async_trait]
impl PageScraper for WebScraper {
    async fn scrape(&self, url: &str) -> ScrapedPage {
        match self.fetch(url).await {
            Ok(html) => {
                let page = product_info(url, &extract_page_content(&html));
                tracing::debug!(
                    url,
                    pricing = page.pricing_mentions.len(),
                    features = page.feature_mentions.len(),
                    "page scraped"
                );
                page
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "scrape failed");
                ScrapedPage::failed(url, e.to_string())
            }
        }
    }
}

/// Title, meta description, headings, long paragraphs and absolute links
pub fn extract_page_content(html: &str) -> PageContent {
    let document = Html::parse_document(html);

    let title = select_texts(&document, "title")
        .into_iter()
        .next()
        .unwrap_or_else(|| "No title found".to_string());

    let description = Selector::parse("meta[name='description']")
        .ok()
        .and_then(|sel| {
            document
                .select(&sel)
                .next()
                .and_then(|el| el.value().attr("content"))
                .map(str::to_string)
        })
        .unwrap_or_default();

    let mut headings = select_texts(&document, "h1, h2, h3");
    headings.truncate(MAX_HEADINGS);

    let content_snippets = select_texts(&document, "p")
        .into_iter()
        .filter(|p| p.chars().count() > MIN_SNIPPET_CHARS)
        .take(MAX_SNIPPETS)
        .collect();

    let external_links = Selector::parse("a[href]")
        .map(|sel| {
            document
                .select(&sel)
                .filter_map(|el| el.value().attr("href"))
                .filter(|href| href.starts_with("http"))
                .take(MAX_LINKS)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    PageContent {
        title,
        description,
        headings,
        content_snippets,
        external_links,
    }
}

/// Keep the snippets that mention pricing or features
pub fn product_info(url: &str, content: &PageContent) -> ScrapedPage {
    let mentions = |keywords: &[&str], cap: usize| -> Vec<String> {
        content
            .content_snippets
            .iter()
            .filter(|snippet| {
                let lowered = snippet.to_lowercase();
                keywords.iter().any(|k| lowered.contains(*k))
            })
            .take(cap)
            .cloned()
            .collect()
    };

    ScrapedPage {
        url: url.to_string(),
        title: content.title.clone(),
        description: content.description.clone(),
        pricing_mentions: mentions(&PRICING_KEYWORDS, MAX_PRICING_MENTIONS),
        feature_mentions: mentions(&FEATURE_KEYWORDS, MAX_FEATURE_MENTIONS),
        ..Default::default()
    }
}

/// Trimmed text of every element matching `css`, in document order
fn select_texts(document: &Html, css: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect()
}
