//! Collaborator contracts consumed by the stages
//!
//! Implementations are best-effort: failures are logged and surface as empty
//! results (or an error-status page), never as an `Err` into the pipeline.
use crate::data_model::{
    OverallSentiment, ScoredText, ScrapedPage, SearchHit, SentimentDistribution, SentimentLabel,
    SocialPost,
};
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Vec<SearchHit>;

    /// Competitor-focused query
    async fn search_competitor(&self, competitor: &str) -> Vec<SearchHit> {
        let query = format!("{} product features pricing", competitor.trim());
        self.search(&query).await
    }
}

#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Fetch a page and extract its product information
    async fn scrape(&self, url: &str) -> ScrapedPage;
}

#[async_trait]
pub trait SocialSource: Send + Sync {
    async fn fetch_posts(&self, keyword: &str, limit: usize) -> Vec<SocialPost>;

    /// Comment bodies for a post, in listing order
    async fn fetch_comments(&self, post_url: &str, limit: usize) -> Vec<String>;
}

pub trait SentimentScorer: Send + Sync {
    fn score_text(&self, text: &str) -> ScoredText;

    fn score_batch(&self, texts: &[String]) -> Vec<ScoredText> {
        texts.iter().map(|t| self.score_text(t)).collect()
    }

    fn score_overall(&self, texts: &[String]) -> OverallSentiment {
        summarize(&self.score_batch(texts))
    }
}

/// Aggregate per-text scores into an overall sentiment summary
pub fn summarize(scored: &[ScoredText]) -> OverallSentiment {
    let mut distribution = SentimentDistribution::default();
    let mut total_compound = 0.0;
    for item in scored {
        distribution.record(item.sentiment);
        total_compound += item.scores.compound;
    }

    let average = if scored.is_empty() {
        0.0
    } else {
        total_compound / scored.len() as f64
    };

    OverallSentiment {
        total_analyzed: scored.len(),
        average_compound_score: average,
        sentiment_distribution: distribution,
        overall_sentiment: SentimentLabel::from_compound(average),
    }
}

/// One client per external source, shared across requests
#[derive(Clone)]
pub struct Collaborators {
    pub search: Arc<dyn SearchProvider>,
    pub scraper: Arc<dyn PageScraper>,
    pub social: Arc<dyn SocialSource>,
    pub sentiment: Arc<dyn SentimentScorer>,
}
