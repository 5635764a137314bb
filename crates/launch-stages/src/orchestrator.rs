//! Orchestrator: runs research → sentiment → strategy and assembles the report
use crate::research::ResearchStage;
use crate::sentiment::SentimentStage;
use crate::strategy::StrategyStage;
use chrono::Utc;
use launch_core::data_model::{DataSources, ExecutiveSummary};
use launch_core::{
    AnalysisContext, Collaborators, LaunchReport, PipelinePhase, PipelineRunner, ReadinessLevel,
    SentimentLabel, StageKind, StageTiming,
};
use tracing::Instrument;

/// Recommendations surfaced in the executive summary
const TOP_RECOMMENDATIONS: usize = 5;

const SYSTEM_ACTOR: &str = "system";

/// Report plus the per-stage timings of the run that produced it
pub struct AnalysisOutcome {
    pub report: LaunchReport,
    pub timings: Vec<StageTiming>,
}

pub struct Orchestrator {
    runner: PipelineRunner,
}

impl Orchestrator {
    pub fn new(collaborators: Collaborators) -> Self {
        let runner = PipelineRunner::new(vec![
            Box::new(ResearchStage::new(collaborators.search, collaborators.scraper)),
            Box::new(SentimentStage::new(collaborators.social, collaborators.sentiment)),
            Box::new(StrategyStage),
        ]);
        Self { runner }
    }

    /// `product` alone, or `product vs competitors` when competitors are given
    pub fn build_task(product_name: &str, competitors: &str) -> String {
        let competitors = competitors.trim();
        if competitors.is_empty() {
            product_name.to_string()
        } else {
            format!("{} vs {}", product_name, competitors)
        }
    }

    pub async fn run_analysis(&self, product_name: &str, competitors: &str) -> LaunchReport {
        self.run_analysis_timed(product_name, competitors).await.report
    }

    pub async fn run_analysis_timed(
        &self,
        product_name: &str,
        competitors: &str,
    ) -> AnalysisOutcome {
        let task = Self::build_task(product_name, competitors);
        let mut ctx = AnalysisContext::new();
        let span = tracing::info_span!(
            "analysis",
            run_id = ctx.run_id(),
            pipeline = self.runner.pipeline_id()
        );

        async move {
            let mut phase = PipelinePhase::Init;
            ctx.append_log(SYSTEM_ACTOR, format!("Starting multi-agent analysis for: {}", task));
            tracing::info!(task = %task, "analysis started");

            let outcome = self.runner.run(ctx, &task).await;
            for timing in &outcome.timings {
                phase = advance(phase, timing.phase);
            }
            let mut ctx = outcome.context;

            ctx.append_log(SYSTEM_ACTOR, "Multi-agent analysis complete");
            phase = advance(phase, PipelinePhase::Report);
            tracing::info!(?phase, log_entries = ctx.log().len(), "analysis complete");

            AnalysisOutcome {
                report: generate_report(ctx, product_name),
                timings: outcome.timings,
            }
        }
        .instrument(span)
        .await
    }

    /// Run one stage alone over a fresh context
    pub async fn run_stage(&self, kind: StageKind, task: &str) -> AnalysisContext {
        self.runner.run_only(kind, AnalysisContext::new(), task).await.context
    }

    /// Run every stage over a fresh context, without report assembly
    pub async fn run_pipeline(&self, task: &str) -> AnalysisContext {
        self.runner.run(AnalysisContext::new(), task).await.context
    }
}

fn advance(current: PipelinePhase, reached: PipelinePhase) -> PipelinePhase {
    if current.next() != Some(reached) {
        tracing::warn!(?current, ?reached, "unexpected phase transition");
    }
    reached
}

/// Assemble the final report from a finished context
pub fn generate_report(ctx: AnalysisContext, product_name: &str) -> LaunchReport {
    let executive_summary = executive_summary(&ctx);
    let data_sources = DataSources {
        search_results_count: ctx.search_hits.len(),
        scraped_pages_count: ctx.scraped_pages.len(),
        sentiment_samples: ctx.sentiment_record.as_ref().map_or(0, |s| s.total_samples),
    };

    let competitive_intelligence = ctx.competitor_record.clone();
    let sentiment_analysis = ctx.sentiment_record.clone();
    let launch_strategy = ctx.strategy_record.clone();

    LaunchReport {
        product_name: product_name.to_string(),
        analysis_timestamp: Utc::now(),
        executive_summary,
        competitive_intelligence,
        sentiment_analysis,
        launch_strategy,
        agent_logs: ctx.into_log(),
        data_sources,
    }
}

pub fn executive_summary(ctx: &AnalysisContext) -> ExecutiveSummary {
    let competitors = ctx.competitor_record.as_ref();
    let sentiment = ctx.sentiment_record.as_ref();
    let strategy = ctx.strategy_record.as_ref();

    let analyzed = competitors.map_or(0, |c| c.competitors_analyzed);
    let label = sentiment.map_or(SentimentLabel::Neutral, |s| s.overall_sentiment);
    let level = strategy.map_or(ReadinessLevel::Medium, |s| s.launch_readiness.readiness_level);

    let overview = format!(
        "Analysis of {} competitors with {} market sentiment. Launch readiness assessed as {}.",
        analyzed, label, level
    );

    let mut key_insights = Vec::new();
    if let Some(c) = competitors {
        key_insights.extend(c.key_findings.iter().cloned());
    }
    if let Some(s) = sentiment {
        key_insights.extend(s.insights.iter().cloned());
    }

    let top_recommendations = strategy
        .map(|s| s.key_recommendations.iter().take(TOP_RECOMMENDATIONS).cloned().collect())
        .unwrap_or_default();

    ExecutiveSummary {
        overview,
        key_insights,
        top_recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launch_core::{CompetitorRecord, SentimentRecord};

    #[test]
    fn test_build_task() {
        assert_eq!(Orchestrator::build_task("Notion", ""), "Notion");
        assert_eq!(Orchestrator::build_task("Notion", "   "), "Notion");
        assert_eq!(Orchestrator::build_task("Notion", "Slack"), "Notion vs Slack");
    }

    #[test]
    fn test_summary_of_empty_context_uses_fallbacks() {
        let summary = executive_summary(&AnalysisContext::new());
        assert_eq!(
            summary.overview,
            "Analysis of 0 competitors with neutral market sentiment. Launch readiness assessed as Medium."
        );
        assert!(summary.key_insights.is_empty());
        assert!(summary.top_recommendations.is_empty());
    }

    #[test]
    fn test_summary_insight_order() {
        let mut ctx = AnalysisContext::new();
        ctx.competitor_record = Some(CompetitorRecord {
            key_findings: vec!["research".to_string()],
            ..Default::default()
        });
        ctx.sentiment_record = Some(SentimentRecord {
            insights: vec!["social".to_string(), "research".to_string()],
            ..Default::default()
        });
        let summary = executive_summary(&ctx);
        assert_eq!(summary.key_insights, vec!["research", "social", "research"]);
    }

    #[test]
    fn test_report_on_empty_context_keeps_every_key() {
        let report = generate_report(AnalysisContext::new(), "Acme");
        let value = serde_json::to_value(&report).unwrap();
        for key in [
            "product_name",
            "analysis_timestamp",
            "executive_summary",
            "competitive_intelligence",
            "sentiment_analysis",
            "launch_strategy",
            "agent_logs",
            "data_sources",
        ] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["launch_strategy"], serde_json::json!({}));
        assert_eq!(value["data_sources"]["sentiment_samples"], 0);
    }
}
