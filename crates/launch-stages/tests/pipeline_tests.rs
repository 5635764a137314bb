//! End-to-end pipeline tests over deterministic collaborators.
//!
//! ```text
//! "Acme vs Globex"
//!     ↓ ResearchStage   (FixedSearch + RecordingScraper)
//!     ↓ SentimentStage  (CannedSocial + KeywordScorer)
//!     ↓ StrategyStage
//! LaunchReport
//! ```

use async_trait::async_trait;
use launch_core::collaborator::summarize;
use launch_core::data_model::{OverallSentiment, PolarityScores, ScoredText};
use launch_core::{
    AnalysisContext, Collaborators, PageScraper, ReadinessLevel, ScrapedPage, SearchHit,
    SearchProvider, SentimentLabel, SentimentScorer, SocialPost, SocialSource, Stage, StageKind,
};
use launch_stages::{Orchestrator, ResearchStage, SentimentStage, StrategyStage};
use std::sync::{Arc, Mutex};

// =============================================================================
// Fakes
// =============================================================================

struct FixedSearch(Vec<SearchHit>);

#[async_trait]
impl SearchProvider for FixedSearch {
    async fn search(&self, _query: &str) -> Vec<SearchHit> {
        self.0.clone()
    }
}

#[derive(Default)]
struct RecordingScraper {
    visited: Mutex<Vec<String>>,
}

#[async_trait]
impl PageScraper for RecordingScraper {
    async fn scrape(&self, url: &str) -> ScrapedPage {
        self.visited.lock().unwrap().push(url.to_string());
        if url.contains("broken") {
            return ScrapedPage::failed(url, "connection refused");
        }
        ScrapedPage {
            url: url.to_string(),
            title: "Globex Pro".to_string(),
            description: "Project tracking".to_string(),
            pricing_mentions: vec!["$12 per seat".to_string()],
            feature_mentions: vec!["Includes offline sync".to_string()],
            ..Default::default()
        }
    }
}

struct CannedSocial {
    posts: usize,
    comments_per_post: usize,
}

#[async_trait]
impl SocialSource for CannedSocial {
    async fn fetch_posts(&self, keyword: &str, _limit: usize) -> Vec<SocialPost> {
        (0..self.posts)
            .map(|i| SocialPost {
                title: format!("{} is great #{}", keyword, i),
                text: format!("Long body text about {} number {}", keyword, i),
                url: format!("https://social.test/{}/{}", keyword, i),
                ..Default::default()
            })
            .collect()
    }

    async fn fetch_comments(&self, post_url: &str, _limit: usize) -> Vec<String> {
        (0..self.comments_per_post)
            .map(|i| format!("comment {} on {}", i, post_url))
            .collect()
    }
}

/// Positive on "great" or "positive", negative on "bad" or "negative"
struct KeywordScorer;

impl SentimentScorer for KeywordScorer {
    fn score_text(&self, text: &str) -> ScoredText {
        let lowered = text.to_lowercase();
        let compound = if lowered.contains("great") || lowered.contains("positive") {
            0.6
        } else if lowered.contains("bad") || lowered.contains("negative") {
            -0.6
        } else {
            0.0
        };
        ScoredText {
            text: text.to_string(),
            sentiment: SentimentLabel::from_compound(compound),
            scores: PolarityScores { compound, ..Default::default() },
        }
    }
}

/// Seven posts: an untitled one with a 10-char body, one with an 11-char
/// body, then five title-only posts
struct ShapedSocial;

#[async_trait]
impl SocialSource for ShapedSocial {
    async fn fetch_posts(&self, _keyword: &str, _limit: usize) -> Vec<SocialPost> {
        let mut posts = vec![
            SocialPost {
                title: String::new(),
                text: "ten chars!".to_string(),
                url: "https://social.test/0".to_string(),
                ..Default::default()
            },
            SocialPost {
                title: "Acme launch".to_string(),
                text: "eleven char".to_string(),
                url: "https://social.test/1".to_string(),
                ..Default::default()
            },
        ];
        posts.extend((2..7).map(|i| SocialPost {
            title: format!("Post {}", i),
            url: format!("https://social.test/{}", i),
            ..Default::default()
        }));
        posts
    }

    async fn fetch_comments(&self, _post_url: &str, _limit: usize) -> Vec<String> {
        Vec::new()
    }
}

/// Neutral scorer that remembers the batch it was handed
#[derive(Default)]
struct RecordingScorer {
    batch: Mutex<Vec<String>>,
}

impl SentimentScorer for RecordingScorer {
    fn score_text(&self, text: &str) -> ScoredText {
        ScoredText {
            text: text.to_string(),
            sentiment: SentimentLabel::Neutral,
            scores: PolarityScores::default(),
        }
    }

    fn score_batch(&self, texts: &[String]) -> Vec<ScoredText> {
        *self.batch.lock().unwrap() = texts.to_vec();
        texts.iter().map(|t| self.score_text(t)).collect()
    }

    fn score_overall(&self, texts: &[String]) -> OverallSentiment {
        summarize(&texts.iter().map(|t| self.score_text(t)).collect::<Vec<_>>())
    }
}

fn hit(title: &str, url: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        snippet: format!("{} snippet", title),
        url: url.to_string(),
    }
}

fn offline() -> Collaborators {
    Collaborators {
        search: Arc::new(FixedSearch(Vec::new())),
        scraper: Arc::new(RecordingScraper::default()),
        social: Arc::new(CannedSocial { posts: 0, comments_per_post: 0 }),
        sentiment: Arc::new(KeywordScorer),
    }
}

fn texts(ctx: &AnalysisContext) -> Vec<&str> {
    ctx.log().iter().map(|e| e.text.as_str()).collect()
}

// =============================================================================
// Research
// =============================================================================

#[tokio::test]
async fn test_research_scrapes_only_first_two_hits_with_urls() {
    let search = Arc::new(FixedSearch(vec![
        hit("No link", ""),
        hit("Globex", "https://globex.test"),
        hit("Third", "https://third.test"),
    ]));
    let scraper = Arc::new(RecordingScraper::default());
    let stage = ResearchStage::new(search, scraper.clone());

    let ctx = stage.execute(AnalysisContext::new(), "Acme vs Globex").await;

    assert_eq!(*scraper.visited.lock().unwrap(), vec!["https://globex.test"]);
    assert_eq!(ctx.search_hits.len(), 3);
    assert_eq!(ctx.scraped_pages.len(), 1);

    let record = ctx.competitor_record.as_ref().unwrap();
    assert_eq!(record.competitors_analyzed, 1);
    assert_eq!(record.total_sources, 3);
    assert!(record.competitor_details.contains_key("https://globex.test"));
}

#[tokio::test]
async fn test_research_drops_failed_pages() {
    let search = Arc::new(FixedSearch(vec![
        hit("Broken", "https://broken.test"),
        hit("Globex", "https://globex.test"),
    ]));
    let stage = ResearchStage::new(search, Arc::new(RecordingScraper::default()));

    let ctx = stage.execute(AnalysisContext::new(), "Acme vs Globex").await;

    assert_eq!(ctx.scraped_pages.len(), 1);
    assert!(ctx.scraped_pages.iter().all(|p| p.is_success()));
}

#[tokio::test]
async fn test_research_log_contract() {
    let stage = ResearchStage::new(
        Arc::new(FixedSearch(Vec::new())),
        Arc::new(RecordingScraper::default()),
    );
    let ctx = stage.execute(AnalysisContext::new(), "Acme vs Globex and Initech").await;

    assert_eq!(
        texts(&ctx),
        vec![
            "[Competitive Intelligence Analyst] Starting competitive research for: Acme vs Globex and Initech",
            "[Competitive Intelligence Analyst] Researching competitor: Globex",
            "[Competitive Intelligence Analyst] Researching competitor: Initech",
            "[Competitive Intelligence Analyst] Completed research on 2 competitors",
        ]
    );
    assert!(ctx.log().iter().all(|e| e.actor == "CompetitiveResearcher"));
    assert_eq!(ctx.competitor_record.as_ref().unwrap().competitors_analyzed, 0);
}

// =============================================================================
// Sentiment
// =============================================================================

#[tokio::test]
async fn test_sentiment_falls_back_to_synthetic_samples() {
    let stage = SentimentStage::new(
        Arc::new(CannedSocial { posts: 0, comments_per_post: 0 }),
        Arc::new(KeywordScorer),
    );
    let ctx = stage.execute(AnalysisContext::new(), "Acme").await;
    let log = texts(&ctx);

    let fallback = log
        .iter()
        .position(|t| t.ends_with("No social media data available, using sample texts"))
        .unwrap();
    let analyzing = log
        .iter()
        .position(|t| t.ends_with("Analyzing sentiment for 3 text samples"))
        .unwrap();
    assert!(fallback < analyzing);

    let record = ctx.sentiment_record.as_ref().unwrap();
    assert_eq!(record.total_samples, 3);
    assert_eq!(record.overall_sentiment, SentimentLabel::Neutral);
    assert_eq!(record.positive_mentions, 1);
    assert_eq!(record.negative_mentions, 1);
    assert_eq!(record.keywords_analyzed, vec!["acme"]);
}

#[tokio::test]
async fn test_sentiment_caps_comments_and_scored_texts() {
    // 5 posts × (title + body + 10 capped comments) = 60 texts
    let stage = SentimentStage::new(
        Arc::new(CannedSocial { posts: 5, comments_per_post: 25 }),
        Arc::new(KeywordScorer),
    );
    let ctx = stage.execute(AnalysisContext::new(), "Acme").await;

    assert!(texts(&ctx)
        .iter()
        .any(|t| t.ends_with("Analyzing sentiment for 60 text samples")));
    assert!(!texts(&ctx).iter().any(|t| t.contains("sample texts")));

    let record = ctx.sentiment_record.as_ref().unwrap();
    assert_eq!(record.total_samples, 50);
    assert_eq!(record.sample_positive_comments.len(), 3);
}

#[tokio::test]
async fn test_sentiment_collection_rules() {
    let scorer = Arc::new(RecordingScorer::default());
    let stage = SentimentStage::new(Arc::new(ShapedSocial), scorer.clone());
    let ctx = stage.execute(AnalysisContext::new(), "Acme").await;

    // untitled post and 10-char body skipped, 11-char body kept, posts past five ignored
    assert_eq!(
        *scorer.batch.lock().unwrap(),
        vec!["Acme launch", "eleven char", "Post 2", "Post 3", "Post 4"]
    );
    assert!(texts(&ctx)
        .iter()
        .any(|t| t.ends_with("Analyzing sentiment for 5 text samples")));
    assert_eq!(ctx.sentiment_record.as_ref().unwrap().total_samples, 5);
}

#[tokio::test]
async fn test_sentiment_log_contract() {
    let stage = SentimentStage::new(
        Arc::new(CannedSocial { posts: 1, comments_per_post: 0 }),
        Arc::new(KeywordScorer),
    );
    let ctx = stage.execute(AnalysisContext::new(), "Acme Widget").await;
    let log = texts(&ctx);

    assert_eq!(
        log[0],
        "[Social Media Sentiment Analyst] Starting sentiment analysis for: Acme Widget"
    );
    assert_eq!(log[1], "[Social Media Sentiment Analyst] Collecting social media data for: acme");
    assert_eq!(log[2], "[Social Media Sentiment Analyst] Collecting social media data for: widget");
    assert_eq!(
        log.last().copied(),
        Some("[Social Media Sentiment Analyst] Sentiment analysis complete: positive")
    );
}

// =============================================================================
// Orchestration
// =============================================================================

#[tokio::test]
async fn test_report_with_every_collaborator_empty() {
    let orchestrator = Orchestrator::new(offline());
    let report = orchestrator.run_analysis("Acme", "").await;

    assert_eq!(report.product_name, "Acme");
    assert_eq!(report.data_sources.search_results_count, 0);
    assert_eq!(report.data_sources.scraped_pages_count, 0);
    assert_eq!(report.data_sources.sentiment_samples, 3);

    let strategy = report.launch_strategy.as_ref().unwrap();
    // neutral sentiment (25) + baseline (30)
    assert_eq!(strategy.launch_readiness.readiness_score, 55);
    assert_eq!(strategy.launch_readiness.readiness_level, ReadinessLevel::Medium);
    assert_eq!(
        report.executive_summary.overview,
        "Analysis of 0 competitors with neutral market sentiment. Launch readiness assessed as Medium."
    );

    assert_eq!(report.agent_logs.first().unwrap().actor, "system");
    assert_eq!(report.agent_logs.first().unwrap().text, "Starting multi-agent analysis for: Acme");
    assert_eq!(report.agent_logs.last().unwrap().text, "Multi-agent analysis complete");
}

#[tokio::test]
async fn test_full_run_with_data() {
    let collaborators = Collaborators {
        search: Arc::new(FixedSearch(vec![hit("Globex", "https://globex.test")])),
        scraper: Arc::new(RecordingScraper::default()),
        social: Arc::new(CannedSocial { posts: 2, comments_per_post: 1 }),
        sentiment: Arc::new(KeywordScorer),
    };
    let outcome = Orchestrator::new(collaborators)
        .run_analysis_timed("Acme", "Globex")
        .await;
    let report = outcome.report;

    assert_eq!(outcome.timings.len(), 3);
    assert!(outcome.timings.iter().all(|t| t.log_entries >= 2));

    assert_eq!(report.competitive_intelligence.as_ref().unwrap().competitors_analyzed, 1);
    assert_eq!(
        report.sentiment_analysis.as_ref().unwrap().overall_sentiment,
        SentimentLabel::Positive
    );
    let readiness = &report.launch_strategy.as_ref().unwrap().launch_readiness;
    // research (30) + positive (40) + baseline (30)
    assert_eq!(readiness.readiness_score, 100);
    assert_eq!(readiness.readiness_level, ReadinessLevel::High);
    assert_eq!(report.executive_summary.top_recommendations.len(), 5);
    assert_eq!(
        report.executive_summary.key_insights[0],
        "Found pricing information for 1 competitors"
    );
}

#[tokio::test]
async fn test_stage_order_in_log() {
    let ctx = Orchestrator::new(offline()).run_pipeline("Acme").await;
    let actors: Vec<&str> = ctx.log().iter().map(|e| e.actor.as_str()).collect();

    let last_research = actors.iter().rposition(|a| *a == "CompetitiveResearcher").unwrap();
    let first_sentiment = actors.iter().position(|a| *a == "SentimentAnalyzer").unwrap();
    let first_strategy = actors.iter().position(|a| *a == "StrategyAdvisor").unwrap();
    assert!(last_research < first_sentiment);
    assert!(first_sentiment < first_strategy);
}

#[tokio::test]
async fn test_single_stage_run() {
    let orchestrator = Orchestrator::new(offline());

    let ctx = orchestrator.run_stage(StageKind::Strategy, "Acme").await;
    assert!(ctx.competitor_record.is_none());
    assert!(ctx.sentiment_record.is_none());
    assert_eq!(
        ctx.strategy_record.as_ref().unwrap().launch_readiness.readiness_score,
        30
    );

    let ctx = StrategyStage.execute(AnalysisContext::new(), "Acme").await;
    assert_eq!(ctx.log().len(), 2);
}
