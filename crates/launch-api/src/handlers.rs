//! API Handlers
use crate::error::ApiError;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use launch_core::data_model::{
    slot_or_empty, ExecutiveSummary, LaunchReadiness, OverallSentiment, ScoredText,
};
use launch_core::{
    ContextRecord, LaunchReport, ScrapedPage, SearchHit, SentimentLabel, StageKind, LAUNCH_VERSION,
};
use launch_stages::AnalysisOutcome;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;

/// Recommendations included in a quick analysis
const QUICK_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    #[serde(alias = "productName")]
    pub product_name: String,
    #[serde(default)]
    pub competitors: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    #[serde(alias = "productName")]
    pub product_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct UrlQuery {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    pub task: String,
}

#[derive(Debug, Serialize)]
pub struct QuickAnalysis {
    pub product: String,
    pub executive_summary: ExecutiveSummary,
    #[serde(serialize_with = "slot_or_empty")]
    pub launch_readiness: Option<LaunchReadiness>,
    pub top_recommendations: Vec<String>,
    pub sentiment: SentimentLabel,
    pub competitors_analyzed: usize,
}

impl QuickAnalysis {
    pub fn from_report(report: LaunchReport) -> Self {
        let (launch_readiness, top_recommendations) = match report.launch_strategy {
            Some(strategy) => (
                Some(strategy.launch_readiness),
                strategy
                    .key_recommendations
                    .into_iter()
                    .take(QUICK_RECOMMENDATIONS)
                    .collect(),
            ),
            None => (None, Vec::new()),
        };

        Self {
            product: report.product_name,
            executive_summary: report.executive_summary,
            launch_readiness,
            top_recommendations,
            sentiment: report
                .sentiment_analysis
                .map_or(SentimentLabel::Neutral, |s| s.overall_sentiment),
            competitors_analyzed: report
                .competitive_intelligence
                .map_or(0, |c| c.competitors_analyzed),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SentimentCheck {
    pub individual_results: Vec<ScoredText>,
    pub overall_analysis: OverallSentiment,
}

#[derive(Debug, Serialize)]
pub struct SearchCheck {
    pub query: String,
    pub results: Vec<SearchHit>,
}

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": state.settings.app_name,
        "status": "running"
    }))
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "healthy", "version": LAUNCH_VERSION })),
    )
}

pub async fn analyze_product_launch(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<LaunchReport>, ApiError> {
    let outcome = analyze(&state, &request.product_name, &request.competitors).await?;
    Ok(Json(outcome.report))
}

pub async fn quick_analysis(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<QuickAnalysis>, ApiError> {
    let outcome = analyze(&state, &query.product_name, "").await?;
    Ok(Json(QuickAnalysis::from_report(outcome.report)))
}

async fn analyze(
    state: &AppState,
    product_name: &str,
    competitors: &str,
) -> Result<AnalysisOutcome, ApiError> {
    let product_name = product_name.trim();
    if product_name.is_empty() {
        return Err(ApiError::BadRequest("product_name must not be empty".to_string()));
    }

    let start = Instant::now();
    let outcome = state
        .orchestrator
        .run_analysis_timed(product_name, competitors)
        .await;
    state.metrics.observe_analysis(start.elapsed(), &outcome.timings);

    tracing::info!(
        product = product_name,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "analysis served"
    );
    Ok(outcome)
}

pub async fn test_sentiment(
    State(state): State<AppState>,
    Json(texts): Json<Vec<String>>,
) -> Json<SentimentCheck> {
    let scorer = &state.collaborators.sentiment;
    Json(SentimentCheck {
        individual_results: scorer.score_batch(&texts),
        overall_analysis: scorer.score_overall(&texts),
    })
}

pub async fn test_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchCheck> {
    let results = state.collaborators.search.search(&query.query).await;
    Json(SearchCheck {
        query: query.query,
        results,
    })
}

pub async fn test_scraper(
    State(state): State<AppState>,
    Query(query): Query<UrlQuery>,
) -> Json<ScrapedPage> {
    Json(state.collaborators.scraper.scrape(&query.url).await)
}

pub async fn test_competitive_agent(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Json<ContextRecord> {
    let ctx = state.orchestrator.run_stage(StageKind::Research, &query.task).await;
    Json(ctx.to_record())
}

pub async fn test_sentiment_agent(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Json<ContextRecord> {
    let ctx = state.orchestrator.run_stage(StageKind::Sentiment, &query.task).await;
    Json(ctx.to_record())
}

/// Strategy needs both upstream records, so the whole pipeline runs
pub async fn test_strategy_agent(
    State(state): State<AppState>,
    Query(query): Query<TaskQuery>,
) -> Json<ContextRecord> {
    let ctx = state.orchestrator.run_pipeline(&query.task).await;
    Json(ctx.to_record())
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
