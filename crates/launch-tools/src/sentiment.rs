//! VADER polarity scoring
use launch_core::data_model::{PolarityScores, ScoredText};
use launch_core::{SentimentLabel, SentimentScorer};
use vader_sentiment::SentimentIntensityAnalyzer;

/// Lexicon and rule based scorer; pure CPU, no I/O
#[derive(Debug, Clone, Copy, Default)]
pub struct VaderScorer;

impl VaderScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn polarity(&self, text: &str) -> PolarityScores {
        let analyzer = SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let get = |key: &str| scores.get(key).copied().unwrap_or(0.0);

        PolarityScores {
            positive: get("pos"),
            negative: get("neg"),
            neutral: get("neu"),
            compound: get("compound"),
        }
    }
}

impl SentimentScorer for VaderScorer {
    fn score_text(&self, text: &str) -> ScoredText {
        let scores = self.polarity(text);
        ScoredText {
            text: text.to_string(),
            sentiment: SentimentLabel::from_compound(scores.compound),
            scores,
        }
    }
}
