//! Stage Trait: single contract for every analysis stage
use crate::context::AnalysisContext;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The fixed set of stages in the launch pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Research,
    Sentiment,
    Strategy,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            StageKind::Research => write!(f, "research"),
            StageKind::Sentiment => write!(f, "sentiment"),
            StageKind::Strategy => write!(f, "strategy"),
        }
    }
}

/// Contract of a launch-analysis stage
///
/// A stage takes ownership of the context, writes only its own record slot
/// and hands the context back. It must append at least a start and a
/// completion entry to the log, and it must not fail when upstream slots are
/// empty: it degrades to a lower-confidence record instead.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Actor name used in the log (ex: "CompetitiveResearcher")
    fn name(&self) -> &'static str;

    /// Human-readable role (ex: "Competitive Intelligence Analyst")
    fn role(&self) -> &'static str;

    fn kind(&self) -> StageKind;

    /// Executes the stage
    async fn execute(&self, ctx: AnalysisContext, task: &str) -> AnalysisContext;

    /// Append a `[role] action` entry under this stage's name
    fn log_action(&self, ctx: &mut AnalysisContext, action: &str) {
        ctx.append_log(self.name(), format!("[{}] {}", self.role(), action));
    }
}
