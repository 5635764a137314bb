//! Launch strategy synthesis.
//!
//! A pure function of the research and sentiment records. Either record may
//! be absent; the strategy then falls back to baseline scores and generic
//! advice instead of failing.

use async_trait::async_trait;
use launch_core::data_model::{LaunchReadiness, PositioningStrategy, TimelineSuggestion};
use launch_core::{
    AnalysisContext, CompetitorRecord, ReadinessLevel, SentimentLabel, SentimentRecord, Stage,
    StageKind, StrategyRecord,
};

/// Maximum recommendations in a strategy
pub const MAX_RECOMMENDATIONS: usize = 7;

const RESEARCH_BONUS: u32 = 30;
const BASELINE_SCORE: u32 = 30;
const NEGATIVE_SHARE_RISK_PERCENT: f64 = 30.0;

pub struct StrategyStage;

#[async_trait]
impl Stage for StrategyStage {
    fn name(&self) -> &'static str {
        "StrategyAdvisor"
    }

    fn role(&self) -> &'static str {
        "Launch Strategy Consultant"
    }

    fn kind(&self) -> StageKind {
        StageKind::Strategy
    }

    async fn execute(&self, mut ctx: AnalysisContext, _task: &str) -> AnalysisContext {
        self.log_action(&mut ctx, "Synthesizing insights for launch strategy");

        let strategy = generate_strategy(
            ctx.competitor_record.as_ref(),
            ctx.sentiment_record.as_ref(),
        );
        tracing::debug!(
            score = strategy.launch_readiness.readiness_score,
            level = %strategy.launch_readiness.readiness_level,
            "strategy generated"
        );
        ctx.strategy_record = Some(strategy);

        self.log_action(&mut ctx, "Launch strategy recommendations generated");
        ctx
    }
}

pub fn generate_strategy(
    competitors: Option<&CompetitorRecord>,
    sentiment: Option<&SentimentRecord>,
) -> StrategyRecord {
    StrategyRecord {
        launch_readiness: assess_readiness(competitors, sentiment),
        positioning_strategy: positioning(competitors, sentiment),
        key_recommendations: recommendations(competitors, sentiment),
        risk_assessment: assess_risks(competitors, sentiment),
        timeline_suggestion: suggest_timeline(sentiment),
    }
}

fn competitors_analyzed(competitors: Option<&CompetitorRecord>) -> usize {
    competitors.map_or(0, |c| c.competitors_analyzed)
}

pub fn assess_readiness(
    competitors: Option<&CompetitorRecord>,
    sentiment: Option<&SentimentRecord>,
) -> LaunchReadiness {
    let mut score = 0;
    let mut factors = Vec::new();

    let analyzed = competitors_analyzed(competitors);
    if analyzed > 0 {
        score += RESEARCH_BONUS;
        factors.push(format!("Analyzed {} competitors", analyzed));
    }

    if let Some(sentiment) = sentiment {
        let (bonus, factor) = match sentiment.overall_sentiment {
            SentimentLabel::Positive => (40, "Positive market sentiment detected"),
            SentimentLabel::Neutral => (25, "Neutral market sentiment"),
            SentimentLabel::Negative => (10, "Negative sentiment - caution advised"),
        };
        score += bonus;
        factors.push(factor.to_string());
    }

    score += BASELINE_SCORE;
    factors.push("Basic market research completed".to_string());

    LaunchReadiness {
        readiness_score: score,
        readiness_level: ReadinessLevel::from_score(score),
        contributing_factors: factors,
    }
}

pub fn positioning(
    competitors: Option<&CompetitorRecord>,
    sentiment: Option<&SentimentRecord>,
) -> PositioningStrategy {
    let analyzed = competitors_analyzed(competitors);

    let (differentiation, target) = if analyzed > 0 {
        (
            format!("Differentiate from {} identified competitors", analyzed),
            "Position as modern alternative with unique features",
        )
    } else {
        (
            "Focus on unique value proposition".to_string(),
            "Position as innovative solution in the market",
        )
    };

    let messaging_focus = match sentiment.map(|s| s.overall_sentiment) {
        Some(SentimentLabel::Positive) => vec![
            "Amplify existing positive sentiment".to_string(),
            "Leverage community enthusiasm".to_string(),
        ],
        Some(_) => vec![
            "Address pain points and concerns".to_string(),
            "Build trust through transparency".to_string(),
        ],
        None => Vec::new(),
    };

    PositioningStrategy {
        differentiation_opportunities: vec![differentiation],
        target_positioning: target.to_string(),
        messaging_focus,
    }
}

pub fn recommendations(
    competitors: Option<&CompetitorRecord>,
    sentiment: Option<&SentimentRecord>,
) -> Vec<String> {
    let mut recs: Vec<&str> = Vec::new();

    if let Some(competitors) = competitors {
        if competitors.competitors_analyzed > 2 {
            recs.push("Conduct deeper competitive analysis to identify gaps");
        }
        if !competitors.key_findings.is_empty() {
            recs.push("Leverage competitor insights for pricing strategy");
        }
    }

    if let Some(sentiment) = sentiment {
        match sentiment.overall_sentiment {
            SentimentLabel::Positive => {
                recs.push("Capitalize on positive sentiment with early launch");
            }
            SentimentLabel::Negative => {
                recs.push("Address negative feedback before launch");
                recs.push("Consider soft launch to test messaging");
            }
            SentimentLabel::Neutral => {}
        }
        if sentiment.sentiment_distribution.negative > 0 {
            recs.push("Prepare FAQ addressing common concerns");
        }
    }

    recs.push("Build pre-launch email list and community");
    recs.push("Create content marketing strategy");
    recs.push("Plan influencer outreach campaign");

    recs.into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(str::to_string)
        .collect()
}

pub fn assess_risks(
    competitors: Option<&CompetitorRecord>,
    sentiment: Option<&SentimentRecord>,
) -> Vec<String> {
    let mut risks = Vec::new();

    if competitors_analyzed(competitors) > 3 {
        risks.push("High competition - differentiation critical".to_string());
    }

    if let Some(sentiment) = sentiment {
        let dist = &sentiment.sentiment_distribution;
        if dist.percent(dist.negative) > NEGATIVE_SHARE_RISK_PERCENT {
            risks.push("Significant negative sentiment detected".to_string());
        }
        if sentiment.overall_sentiment == SentimentLabel::Neutral {
            risks.push("Lack of strong market enthusiasm".to_string());
        }
    }

    if risks.is_empty() {
        risks.push("Low risk - market conditions favorable".to_string());
    }

    risks
}

/// Three-way branch: positive, any other measured sentiment, or no data
pub fn suggest_timeline(sentiment: Option<&SentimentRecord>) -> TimelineSuggestion {
    let (window, phases) = match sentiment.map(|s| s.overall_sentiment) {
        Some(SentimentLabel::Positive) => (
            "2-4 weeks (fast track)",
            vec![
                "Week 1-2: Finalize product and messaging",
                "Week 3: Soft launch to early adopters",
                "Week 4: Full public launch",
            ],
        ),
        Some(_) => (
            "6-8 weeks (gradual approach)",
            vec![
                "Week 1-3: Address feedback and refine product",
                "Week 4-5: Beta testing with select users",
                "Week 6-7: Build marketing momentum",
                "Week 8: Official launch",
            ],
        ),
        None => (
            "4-6 weeks (standard)",
            vec![
                "Week 1-2: Market research and positioning",
                "Week 3-4: Pre-launch marketing",
                "Week 5-6: Launch execution",
            ],
        ),
    };

    TimelineSuggestion {
        recommended_launch_window: window.to_string(),
        phases: phases.into_iter().map(str::to_string).collect(),
    }
}
