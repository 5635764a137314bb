//! Launch Core: Stage Trait, Runner, Context and Data Model
//!
//! Shared contract of the launch-analysis pipeline: the context threaded
//! through the stages, the records each stage produces, and the collaborator
//! interfaces the stages consume.

pub mod collaborator;
pub mod context;
pub mod data_model;
pub mod error;
pub mod runner;
pub mod stage;

pub use collaborator::{Collaborators, PageScraper, SearchProvider, SentimentScorer, SocialSource};
pub use context::{AnalysisContext, ContextRecord};
pub use data_model::{
    CompetitorRecord, LaunchReport, ReadinessLevel, ScrapedPage, SearchHit, SentimentLabel,
    SentimentRecord, SocialPost, StrategyRecord,
};
pub use error::{CollaboratorError, LaunchError};
pub use runner::{PipelineOutcome, PipelinePhase, PipelineRunner, StageTiming};
pub use stage::{Stage, StageKind};

/// Engine version reported by the service
pub const LAUNCH_VERSION: &str = "1.0.0";
