//! Launch Stages: the three analysis stages and the orchestrator that chains them.
//!
//! # Pipeline Flow
//!
//! ```text
//! task → Research → Sentiment → Strategy → Report
//!           ↓           ↓           ↓
//!      competitor   sentiment    strategy
//!        record      record       record
//! ```
//!
//! Research and sentiment depend only on their collaborators; strategy is a
//! pure function of the two upstream records.

pub mod extract;
pub mod orchestrator;
pub mod research;
pub mod sentiment;
pub mod strategy;

pub use extract::{extract_competitors, extract_keywords};
pub use orchestrator::{generate_report, AnalysisOutcome, Orchestrator};
pub use research::ResearchStage;
pub use sentiment::SentimentStage;
pub use strategy::{generate_strategy, StrategyStage};
