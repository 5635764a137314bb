//! Launch Tools: production collaborators for the analysis stages
//!
//! | collaborator        | trait            | source                      |
//! |---------------------|------------------|-----------------------------|
//! | [`DuckDuckGoSearch`]| `SearchProvider` | DuckDuckGo instant answers  |
//! | [`WebScraper`]      | `PageScraper`    | plain HTTP + HTML parsing   |
//! | [`RedditClient`]    | `SocialSource`   | Reddit app-only OAuth API   |
//! | [`VaderScorer`]     | `SentimentScorer`| VADER lexicon, in-process   |
//!
//! Every network call is bounded by a timeout. Failures are logged here and
//! handed to the stages as empty results.

pub mod page;
pub mod reddit;
pub mod search;
pub mod sentiment;

pub use page::WebScraper;
pub use reddit::{RedditClient, RedditCredentials};
pub use search::{DuckDuckGoSearch, DEFAULT_MAX_RESULTS};
pub use sentiment::VaderScorer;

use launch_core::CollaboratorError;
use std::time::Duration;

/// Default network timeout for every collaborator
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

fn http_client(timeout: Duration, user_agent: &str) -> Result<reqwest::Client, CollaboratorError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| CollaboratorError::Network(e.to_string()))
}

fn network_error(e: reqwest::Error) -> CollaboratorError {
    CollaboratorError::Network(e.to_string())
}

fn check_status(response: &reqwest::Response) -> Result<(), CollaboratorError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(CollaboratorError::Status {
            status: response.status().as_u16(),
            url: response.url().to_string(),
        })
    }
}
