//! Launch API: REST endpoints over the launch-analysis pipeline
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;

pub use config::Settings;
pub use error::ApiError;

use axum::{
    routing::{get, post},
    Router,
};
use launch_core::{Collaborators, LaunchError};
use launch_stages::Orchestrator;
use launch_tools::{DuckDuckGoSearch, RedditClient, RedditCredentials, VaderScorer, WebScraper};
use metrics::ApiMetrics;
use std::sync::Arc;

/// Shared by every request; the collaborators are safe for concurrent use
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub collaborators: Collaborators,
    pub orchestrator: Arc<Orchestrator>,
    pub metrics: Arc<ApiMetrics>,
}

impl AppState {
    pub fn new(settings: Settings, collaborators: Collaborators) -> Result<Self, LaunchError> {
        let metrics = ApiMetrics::new().map_err(|e| LaunchError::Config(e.to_string()))?;
        Ok(Self {
            settings: Arc::new(settings),
            orchestrator: Arc::new(Orchestrator::new(collaborators.clone())),
            collaborators,
            metrics: Arc::new(metrics),
        })
    }

    /// Wire the production collaborators from settings
    pub fn from_settings(settings: Settings) -> Result<Self, LaunchError> {
        let collaborators = production_collaborators(&settings)?;
        Self::new(settings, collaborators)
    }
}

pub fn production_collaborators(settings: &Settings) -> Result<Collaborators, LaunchError> {
    let timeout = settings.http_timeout();
    let config_error = |e: launch_core::CollaboratorError| LaunchError::Config(e.to_string());

    let credentials = RedditCredentials::from_parts(
        settings.reddit_client_id.clone(),
        settings.reddit_client_secret.clone(),
    );

    Ok(Collaborators {
        search: Arc::new(
            DuckDuckGoSearch::new(timeout, settings.search_max_results).map_err(config_error)?,
        ),
        scraper: Arc::new(WebScraper::new(timeout).map_err(config_error)?),
        social: Arc::new(
            RedditClient::new(credentials, &settings.reddit_user_agent, timeout)
                .map_err(config_error)?,
        ),
        sentiment: Arc::new(VaderScorer::new()),
    })
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/analyze-product-launch", post(handlers::analyze_product_launch))
        .route("/quick-analysis", post(handlers::quick_analysis))
        .route("/test-sentiment", post(handlers::test_sentiment))
        .route("/test-search", post(handlers::test_search))
        .route("/test-scraper", post(handlers::test_scraper))
        .route("/test-competitive-agent", post(handlers::test_competitive_agent))
        .route("/test-sentiment-agent", post(handlers::test_sentiment_agent))
        .route("/test-strategy-agent", post(handlers::test_strategy_agent))
        .layer(middleware::cors())
        .layer(middleware::trace())
        .with_state(state)
}

pub async fn run(settings: Settings) -> Result<(), LaunchError> {
    let addr = settings.listen_addr.clone();
    let app = create_app(AppState::from_settings(settings)?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(addr = %addr, "launch API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
