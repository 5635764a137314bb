//! Pipeline Runner: chains stages over one owned context and times them
use crate::context::AnalysisContext;
use crate::stage::{Stage, StageKind};
use serde::Serialize;
use std::time::Instant;

/// Orchestration phases, strictly linear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelinePhase {
    Init,
    Research,
    Sentiment,
    Strategy,
    Report,
}

impl PipelinePhase {
    /// Next phase, `None` once the report phase is reached
    pub fn next(self) -> Option<Self> {
        match self {
            PipelinePhase::Init => Some(PipelinePhase::Research),
            PipelinePhase::Research => Some(PipelinePhase::Sentiment),
            PipelinePhase::Sentiment => Some(PipelinePhase::Strategy),
            PipelinePhase::Strategy => Some(PipelinePhase::Report),
            PipelinePhase::Report => None,
        }
    }

    pub fn for_stage(kind: StageKind) -> Self {
        match kind {
            StageKind::Research => PipelinePhase::Research,
            StageKind::Sentiment => PipelinePhase::Sentiment,
            StageKind::Strategy => PipelinePhase::Strategy,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageTiming {
    pub stage: String,
    pub phase: PipelinePhase,
    pub latency_ms: u64,
    /// Log entries the stage appended
    pub log_entries: usize,
}

pub struct PipelineOutcome {
    pub context: AnalysisContext,
    pub timings: Vec<StageTiming>,
}

pub struct PipelineRunner {
    stages: Vec<Box<dyn Stage>>,
    pipeline_id: String,
}

impl PipelineRunner {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        let pipeline_id = stages
            .iter()
            .map(|s| s.kind().to_string())
            .collect::<Vec<_>>()
            .join("→");

        Self { stages, pipeline_id }
    }

    pub async fn run(&self, ctx: AnalysisContext, task: &str) -> PipelineOutcome {
        self.run_selected(ctx, task, |_| true).await
    }

    /// Run only the stages of one kind
    pub async fn run_only(
        &self,
        kind: StageKind,
        ctx: AnalysisContext,
        task: &str,
    ) -> PipelineOutcome {
        self.run_selected(ctx, task, move |k| k == kind).await
    }

    async fn run_selected<F>(&self, ctx: AnalysisContext, task: &str, keep: F) -> PipelineOutcome
    where
        F: Fn(StageKind) -> bool,
    {
        let mut current = ctx;
        let mut timings = Vec::with_capacity(self.stages.len());

        for stage in self.stages.iter().filter(|s| keep(s.kind())) {
            let phase = PipelinePhase::for_stage(stage.kind());
            let start = Instant::now();
            let before = current.log().len();

            tracing::debug!(
                stage = stage.name(),
                ?phase,
                run_id = current.run_id(),
                "stage started"
            );
            current = stage.execute(current, task).await;

            let latency_ms = start.elapsed().as_millis() as u64;
            let log_entries = current.log().len().saturating_sub(before);
            if log_entries < 2 {
                tracing::warn!(
                    stage = stage.name(),
                    log_entries,
                    "stage did not log its start and completion"
                );
            }
            tracing::info!(stage = stage.name(), latency_ms, log_entries, "stage finished");

            timings.push(StageTiming {
                stage: stage.name().to_string(),
                phase,
                latency_ms,
                log_entries,
            });
        }

        PipelineOutcome { context: current, timings }
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Chatty(StageKind);

    #[async_trait]
    impl Stage for Chatty {
        fn name(&self) -> &'static str {
            "Chatty"
        }

        fn role(&self) -> &'static str {
            "Tester"
        }

        fn kind(&self) -> StageKind {
            self.0
        }

        async fn execute(&self, mut ctx: AnalysisContext, task: &str) -> AnalysisContext {
            self.log_action(&mut ctx, &format!("start {}", task));
            self.log_action(&mut ctx, "done");
            ctx
        }
    }

    struct Silent;

    #[async_trait]
    impl Stage for Silent {
        fn name(&self) -> &'static str {
            "Silent"
        }

        fn role(&self) -> &'static str {
            "Mute"
        }

        fn kind(&self) -> StageKind {
            StageKind::Strategy
        }

        async fn execute(&self, ctx: AnalysisContext, _task: &str) -> AnalysisContext {
            ctx
        }
    }

    #[test]
    fn test_phase_transitions_are_linear() {
        let mut phase = PipelinePhase::Init;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(
            seen,
            vec![
                PipelinePhase::Init,
                PipelinePhase::Research,
                PipelinePhase::Sentiment,
                PipelinePhase::Strategy,
                PipelinePhase::Report,
            ]
        );
    }

    #[tokio::test]
    async fn test_run_only_selects_one_kind() {
        let runner = PipelineRunner::new(vec![
            Box::new(Chatty(StageKind::Research)),
            Box::new(Chatty(StageKind::Sentiment)),
        ]);
        let outcome = runner.run_only(StageKind::Sentiment, AnalysisContext::new(), "x").await;
        assert_eq!(outcome.timings.len(), 1);
        assert_eq!(outcome.timings[0].phase, PipelinePhase::Sentiment);
        assert_eq!(outcome.context.log().len(), 2);
    }

    #[test]
    fn test_pipeline_id() {
        let runner = PipelineRunner::new(vec![
            Box::new(Chatty(StageKind::Research)),
            Box::new(Chatty(StageKind::Sentiment)),
        ]);
        assert_eq!(runner.pipeline_id(), "research→sentiment");
        assert_eq!(runner.len(), 2);
    }

    #[tokio::test]
    async fn test_run_counts_log_entries_per_stage() {
        let runner = PipelineRunner::new(vec![
            Box::new(Chatty(StageKind::Research)),
            Box::new(Silent),
        ]);
        let outcome = runner.run(AnalysisContext::new(), "Acme").await;

        assert_eq!(outcome.timings.len(), 2);
        assert_eq!(outcome.timings[0].log_entries, 2);
        assert_eq!(outcome.timings[0].phase, PipelinePhase::Research);
        assert_eq!(outcome.timings[1].log_entries, 0);
        assert_eq!(outcome.context.log()[0].text, "[Tester] start Acme");
        assert_eq!(outcome.context.log()[0].actor, "Chatty");
    }
}
