//! Social sentiment stage: collect posts and comments, score them, summarize
use crate::extract::{extract_keywords, preview};
use async_trait::async_trait;
use launch_core::data_model::{OverallSentiment, ScoredText};
use launch_core::{
    AnalysisContext, SentimentLabel, SentimentRecord, SentimentScorer, SocialSource, Stage,
    StageKind,
};
use std::sync::Arc;

/// Posts fetched per keyword
const POSTS_PER_KEYWORD: usize = 5;
/// Comment bodies collected per post
const COMMENTS_PER_POST: usize = 10;
/// Post bodies this short or shorter are skipped
const MIN_BODY_CHARS: usize = 10;
/// Upper bound on texts sent to the scorer
const MAX_SCORED_TEXTS: usize = 50;
/// Sample comments kept per polarity
const SAMPLES_PER_POLARITY: usize = 3;
const SAMPLE_PREVIEW_CHARS: usize = 100;

/// Social sentiment: gather posts and comments for the task keywords and
/// score them into a [`SentimentRecord`].
pub struct SentimentStage {
    social: Arc<dyn SocialSource>,
    scorer: Arc<dyn SentimentScorer>,
}

impl SentimentStage {
    pub fn new(social: Arc<dyn SocialSource>, scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { social, scorer }
    }

    async fn collect_texts(&self, ctx: &mut AnalysisContext, keywords: &[String]) -> Vec<String> {
        let mut texts = Vec::new();

        for keyword in keywords {
            self.log_action(ctx, &format!("Collecting social media data for: {}", keyword));

            let posts = self.social.fetch_posts(keyword, POSTS_PER_KEYWORD).await;
            for post in posts.iter().take(POSTS_PER_KEYWORD) {
                if !post.title.is_empty() {
                    texts.push(post.title.clone());
                }
                if post.text.chars().count() > MIN_BODY_CHARS {
                    texts.push(post.text.clone());
                }

                let comments = self.social.fetch_comments(&post.url, COMMENTS_PER_POST).await;
                texts.extend(comments.into_iter().take(COMMENTS_PER_POST));
            }
        }

        texts
    }
}

/// Placeholder texts used when no social data could be collected
pub fn synthetic_samples(task: &str) -> Vec<String> {
    vec![
        format!("Sample positive text about {}", task),
        format!("Sample negative feedback regarding {}", task),
        format!("Neutral opinion on {}", task),
    ]
}

#[async_trait]
impl Stage for SentimentStage {
    fn name(&self) -> &'static str {
        "SentimentAnalyzer"
    }

    fn role(&self) -> &'static str {
        "Social Media Sentiment Analyst"
    }

    fn kind(&self) -> StageKind {
        StageKind::Sentiment
    }

    async fn execute(&self, mut ctx: AnalysisContext, task: &str) -> AnalysisContext {
        self.log_action(&mut ctx, &format!("Starting sentiment analysis for: {}", task));

        let keywords = extract_keywords(task);
        let mut texts = self.collect_texts(&mut ctx, &keywords).await;

        if texts.is_empty() {
            texts = synthetic_samples(task);
            self.log_action(&mut ctx, "No social media data available, using sample texts");
            tracing::info!(task, "no social data, scoring synthetic samples");
        }

        self.log_action(
            &mut ctx,
            &format!("Analyzing sentiment for {} text samples", texts.len()),
        );

        texts.truncate(MAX_SCORED_TEXTS);
        let scored = self.scorer.score_batch(&texts);
        let overall = self.scorer.score_overall(&texts);

        let record = build_report(&scored, &overall, keywords);
        let label = record.overall_sentiment;
        ctx.sentiment_record = Some(record);

        self.log_action(&mut ctx, &format!("Sentiment analysis complete: {}", label));
        ctx
    }
}

/// Assemble the sentiment record from per-text and overall scores
pub fn build_report(
    scored: &[ScoredText],
    overall: &OverallSentiment,
    keywords: Vec<String>,
) -> SentimentRecord {
    let positive: Vec<&ScoredText> = scored
        .iter()
        .filter(|s| s.sentiment == SentimentLabel::Positive)
        .collect();
    let negative: Vec<&ScoredText> = scored
        .iter()
        .filter(|s| s.sentiment == SentimentLabel::Negative)
        .collect();

    SentimentRecord {
        keywords_analyzed: keywords,
        total_samples: overall.total_analyzed,
        overall_sentiment: overall.overall_sentiment,
        sentiment_distribution: overall.sentiment_distribution,
        average_score: overall.average_compound_score,
        positive_mentions: positive.len(),
        negative_mentions: negative.len(),
        sample_positive_comments: samples(&positive),
        sample_negative_comments: samples(&negative),
        insights: insights(overall),
    }
}

fn samples(items: &[&ScoredText]) -> Vec<String> {
    items
        .iter()
        .take(SAMPLES_PER_POLARITY)
        .map(|s| preview(&s.text, SAMPLE_PREVIEW_CHARS))
        .collect()
}

fn insights(overall: &OverallSentiment) -> Vec<String> {
    let mut insights = vec![match overall.overall_sentiment {
        SentimentLabel::Positive => "Overall sentiment is positive - strong market reception",
        SentimentLabel::Negative => "Overall sentiment is negative - potential concerns to address",
        SentimentLabel::Neutral => "Overall sentiment is neutral - mixed market reception",
    }
    .to_string()];

    let dist = &overall.sentiment_distribution;
    if dist.total() > 0 {
        insights.push(format!(
            "{:.1}% positive mentions, {:.1}% negative mentions",
            dist.percent(dist.positive),
            dist.percent(dist.negative)
        ));
    }

    insights
}
