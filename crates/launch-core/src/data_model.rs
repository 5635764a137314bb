//! Data Model: raw collaborator payloads, per-stage records and the final report
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

// ============================================================================
// AUDIT LOG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Who wrote the entry ("system" or a stage name)
    pub actor: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// RAW COLLABORATOR DATA
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    /// May be empty when the search backend had no link for the hit
    pub url: String,
}

impl SearchHit {
    pub fn has_url(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeStatus {
    #[default]
    Success,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub description: String,
    pub pricing_mentions: Vec<String>,
    pub feature_mentions: Vec<String>,
    pub status: ScrapeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapedPage {
    /// Error-status page for a URL that could not be fetched or parsed
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: ScrapeStatus::Error,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ScrapeStatus::Success
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialPost {
    /// Empty when the post has no title
    pub title: String,
    pub text: String,
    /// Discussion URL, used to fetch comments
    pub url: String,
    #[serde(default)]
    pub link_url: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub num_comments: u64,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub created_utc: f64,
}

// ============================================================================
// SENTIMENT SCORING
// ============================================================================

/// Compound score at or above which text is positive
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound score at or below which text is negative
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl SentimentLabel {
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Negative => write!(f, "negative"),
            SentimentLabel::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PolarityScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    pub compound: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredText {
    pub text: String,
    pub sentiment: SentimentLabel,
    pub scores: PolarityScores,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentDistribution {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Share of `count` in the distribution, in percent (0 when empty)
    pub fn percent(&self, count: usize) -> f64 {
        match self.total() {
            0 => 0.0,
            total => count as f64 / total as f64 * 100.0,
        }
    }

    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverallSentiment {
    pub total_analyzed: usize,
    pub average_compound_score: f64,
    pub sentiment_distribution: SentimentDistribution,
    pub overall_sentiment: SentimentLabel,
}

// ============================================================================
// STAGE RECORDS
// ============================================================================

/// Per-page summary inside the competitor record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorSummary {
    pub title: String,
    pub pricing_info: Vec<String>,
    pub features: Vec<String>,
    pub description: String,
}

/// Output of the research stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub competitors_analyzed: usize,
    pub total_sources: usize,
    /// Keyed by page URL
    pub competitor_details: BTreeMap<String, CompetitorSummary>,
    pub key_findings: Vec<String>,
}

/// Output of the sentiment stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub keywords_analyzed: Vec<String>,
    pub total_samples: usize,
    pub overall_sentiment: SentimentLabel,
    pub sentiment_distribution: SentimentDistribution,
    pub average_score: f64,
    pub positive_mentions: usize,
    pub negative_mentions: usize,
    pub sample_positive_comments: Vec<String>,
    pub sample_negative_comments: Vec<String>,
    pub insights: Vec<String>,
}

/// Launch readiness level derived from the readiness score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum ReadinessLevel {
    /// below 40
    Low,
    /// 40-69
    #[default]
    Medium,
    /// 70 and above
    High,
}

impl ReadinessLevel {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=39 => ReadinessLevel::Low,
            40..=69 => ReadinessLevel::Medium,
            _ => ReadinessLevel::High,
        }
    }
}

impl std::fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ReadinessLevel::Low => write!(f, "Low"),
            ReadinessLevel::Medium => write!(f, "Medium"),
            ReadinessLevel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchReadiness {
    pub readiness_score: u32,
    pub readiness_level: ReadinessLevel,
    pub contributing_factors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PositioningStrategy {
    pub differentiation_opportunities: Vec<String>,
    pub target_positioning: String,
    pub messaging_focus: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSuggestion {
    pub recommended_launch_window: String,
    pub phases: Vec<String>,
}

/// Output of the strategy stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRecord {
    pub launch_readiness: LaunchReadiness,
    pub positioning_strategy: PositioningStrategy,
    pub key_recommendations: Vec<String>,
    pub risk_assessment: Vec<String>,
    pub timeline_suggestion: TimelineSuggestion,
}

// ============================================================================
// REPORT
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub overview: String,
    pub key_insights: Vec<String>,
    pub top_recommendations: Vec<String>,
}

/// Provenance counts for a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSources {
    pub search_results_count: usize,
    pub scraped_pages_count: usize,
    pub sentiment_samples: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchReport {
    pub product_name: String,
    pub analysis_timestamp: DateTime<Utc>,
    pub executive_summary: ExecutiveSummary,
    #[serde(serialize_with = "slot_or_empty")]
    pub competitive_intelligence: Option<CompetitorRecord>,
    #[serde(serialize_with = "slot_or_empty")]
    pub sentiment_analysis: Option<SentimentRecord>,
    #[serde(serialize_with = "slot_or_empty")]
    pub launch_strategy: Option<StrategyRecord>,
    pub agent_logs: Vec<LogEntry>,
    pub data_sources: DataSources,
}

/// Serializes an empty record slot as `{}` so consumers always see the key
pub fn slot_or_empty<T, S>(slot: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match slot {
        Some(record) => record.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
