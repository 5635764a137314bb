//! Analysis Context: state threaded through the pipeline
//!
//! One context belongs to exactly one orchestration run. It is moved into each
//! stage and handed back, so there is never more than one writer.
use crate::data_model::{
    slot_or_empty, CompetitorRecord, LogEntry, ScrapedPage, SearchHit, SentimentRecord,
    StrategyRecord,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct AnalysisContext {
    log: Vec<LogEntry>,
    pub competitor_record: Option<CompetitorRecord>,
    pub sentiment_record: Option<SentimentRecord>,
    pub strategy_record: Option<StrategyRecord>,
    pub search_hits: Vec<SearchHit>,
    pub scraped_pages: Vec<ScrapedPage>,
    created_at: DateTime<Utc>,
    run_id: String,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self {
            log: Vec::new(),
            competitor_record: None,
            sentiment_record: None,
            strategy_record: None,
            search_hits: Vec::new(),
            scraped_pages: Vec::new(),
            created_at: Utc::now(),
            run_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Append an entry stamped with the current time
    pub fn append_log(&mut self, actor: impl Into<String>, text: impl Into<String>) {
        self.log.push(LogEntry {
            actor: actor.into(),
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Tracing correlation id; not part of the exported record
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Snapshot with the fixed key set, independent of how many stages ran
    pub fn to_record(&self) -> ContextRecord {
        ContextRecord {
            log: self.log.clone(),
            competitor_record: self.competitor_record.clone(),
            sentiment_record: self.sentiment_record.clone(),
            strategy_record: self.strategy_record.clone(),
            search_hits: self.search_hits.clone(),
            scraped_pages: self.scraped_pages.clone(),
            created_at: self.created_at,
        }
    }

    /// Consume the context, keeping the log for the report
    pub fn into_log(self) -> Vec<LogEntry> {
        self.log
    }
}

impl Default for AnalysisContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable export of an [`AnalysisContext`]
#[derive(Debug, Clone, Serialize)]
pub struct ContextRecord {
    pub log: Vec<LogEntry>,
    #[serde(serialize_with = "slot_or_empty")]
    pub competitor_record: Option<CompetitorRecord>,
    #[serde(serialize_with = "slot_or_empty")]
    pub sentiment_record: Option<SentimentRecord>,
    #[serde(serialize_with = "slot_or_empty")]
    pub strategy_record: Option<StrategyRecord>,
    pub search_hits: Vec<SearchHit>,
    pub scraped_pages: Vec<ScrapedPage>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD_KEYS: [&str; 7] = [
        "log",
        "competitor_record",
        "sentiment_record",
        "strategy_record",
        "search_hits",
        "scraped_pages",
        "created_at",
    ];

    #[test]
    fn test_append_log_preserves_order() {
        let mut ctx = AnalysisContext::new();
        ctx.append_log("system", "first");
        ctx.append_log("CompetitiveResearcher", "second");
        ctx.append_log("system", "third");

        let texts: Vec<&str> = ctx.log().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert!(ctx.log()[0].timestamp <= ctx.log()[2].timestamp);
        assert!(ctx.log()[0].timestamp >= ctx.created_at());
    }

    #[test]
    fn test_fresh_record_has_all_keys() {
        let ctx = AnalysisContext::new();
        let value = serde_json::to_value(ctx.to_record()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), RECORD_KEYS.len());
        for key in RECORD_KEYS {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert_eq!(value["competitor_record"], serde_json::json!({}));
        assert_eq!(value["search_hits"], serde_json::json!([]));
    }

    #[test]
    fn test_populated_record_has_all_keys() {
        let mut ctx = AnalysisContext::new();
        ctx.competitor_record = Some(CompetitorRecord::default());
        ctx.search_hits.push(SearchHit::default());
        ctx.append_log("system", "done");

        let value = serde_json::to_value(ctx.to_record()).unwrap();
        for key in RECORD_KEYS {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["competitor_record"]["competitors_analyzed"], 0);
        assert_eq!(value["log"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(AnalysisContext::new().run_id(), AnalysisContext::new().run_id());
    }
}
