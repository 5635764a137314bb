//! Reddit client over the app-only OAuth API
use crate::{check_status, http_client, network_error};
use async_trait::async_trait;
use launch_core::{CollaboratorError, SocialPost, SocialSource};
use serde::Deserialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";
const WEB_BASE: &str = "https://www.reddit.com";
const SEARCH_SUBREDDIT: &str = "all";

/// Refresh the token this long before it expires
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl RedditCredentials {
    /// Both parts must be present and non-empty
    pub fn from_parts(client_id: Option<String>, client_secret: Option<String>) -> Option<Self> {
        match (client_id, client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some(Self {
                client_id: id,
                client_secret: secret,
            }),
            _ => None,
        }
    }
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Without credentials every call returns an empty result
pub struct RedditClient {
    client: reqwest::Client,
    credentials: Option<RedditCredentials>,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(
        credentials: Option<RedditCredentials>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, CollaboratorError> {
        if credentials.is_none() {
            tracing::info!("reddit credentials not configured, social data disabled");
        }
        Ok(Self {
            client: http_client(timeout, user_agent)?,
            credentials,
            token: Mutex::new(None),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Cached token, fetched once and shared by concurrent callers
    async fn access_token(&self) -> Result<String, CollaboratorError> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            CollaboratorError::Unavailable("reddit credentials missing".to_string())
        })?;

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(network_error)?;
        check_status(&response)?;

        let body = response.text().await.map_err(network_error)?;
        let token = parse_token(&body)?;
        tracing::debug!(expires_in = token.expires_in, "reddit token refreshed");

        let value = token.access_token.clone();
        *cached = Some(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(value)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CollaboratorError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .get(format!("{}{}", API_BASE, path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(network_error)?;
        check_status(&response)?;

        let body = response.text().await.map_err(network_error)?;
        serde_json::from_str(&body).map_err(|e| CollaboratorError::Parse(e.to_string()))
    }

    async fn search(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<SocialPost>, CollaboratorError> {
        let listing: Listing<PostData> = self
            .get_json(
                &format!("/r/{}/search", SEARCH_SUBREDDIT),
                &[
                    ("q", keyword.to_string()),
                    ("sort", "relevance".to_string()),
                    ("limit", limit.to_string()),
                    ("raw_json", "1".to_string()),
                ],
            )
            .await?;

        Ok(listing
            .data
            .children
            .into_iter()
            .take(limit)
            .map(|thing| thing.data.into_post())
            .collect())
    }

    async fn comments(
        &self,
        post_url: &str,
        limit: usize,
    ) -> Result<Vec<String>, CollaboratorError> {
        let path = permalink_path(post_url).ok_or_else(|| {
            CollaboratorError::Parse(format!("not a reddit permalink: {}", post_url))
        })?;

        let listings: Vec<Listing<CommentData>> = self
            .get_json(
                &format!("{}.json", path.trim_end_matches('/')),
                &[("limit", limit.to_string()), ("raw_json", "1".to_string())],
            )
            .await?;

        // First listing is the post itself, second the comment tree
        Ok(listings
            .into_iter()
            .nth(1)
            .map(|tree| comment_bodies(tree, limit))
            .unwrap_or_default())
    }
}

#[async_trait]
impl SocialSource for RedditClient {
    async fn fetch_posts(&self, keyword: &str, limit: usize) -> Vec<SocialPost> {
        if !self.is_configured() {
            return Vec::new();
        }
        match self.search(keyword, limit).await {
            Ok(posts) => {
                tracing::debug!(keyword, posts = posts.len(), "reddit search complete");
                posts
            }
            Err(e) => {
                tracing::warn!(keyword, error = %e, "reddit search failed");
                Vec::new()
            }
        }
    }

    async fn fetch_comments(&self, post_url: &str, limit: usize) -> Vec<String> {
        if !self.is_configured() {
            return Vec::new();
        }
        self.comments(post_url, limit).await.unwrap_or_else(|e| {
            tracing::warn!(url = post_url, error = %e, "reddit comments failed");
            Vec::new()
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expiry")]
    expires_in: u64,
}

fn default_expiry() -> u64 {
    3600
}

/// A 200 answer can still carry `{"error": ...}` instead of a token
fn parse_token(body: &str) -> Result<TokenResponse, CollaboratorError> {
    serde_json::from_str(body).map_err(|e| CollaboratorError::Parse(e.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct Listing<T> {
    pub data: ListingData<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListingData<T> {
    #[serde(default = "Vec::new")]
    pub children: Vec<Thing<T>>,
}

#[derive(Debug, Deserialize)]
pub struct Thing<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostData {
    pub title: String,
    pub selftext: String,
    pub permalink: String,
    pub url: String,
    pub score: i64,
    pub num_comments: u64,
    pub subreddit: String,
    pub created_utc: f64,
}

impl PostData {
    fn into_post(self) -> SocialPost {
        SocialPost {
            title: self.title,
            text: self.selftext,
            url: format!("{}{}", WEB_BASE, self.permalink),
            link_url: self.url,
            score: self.score,
            num_comments: self.num_comments,
            subreddit: self.subreddit,
            created_utc: self.created_utc,
        }
    }
}

/// `replies` is an empty string on leaf comments and a listing otherwise
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CommentData {
    pub body: Option<String>,
    pub replies: serde_json::Value,
}

/// Comment bodies of a tree, level by level in listing order, skipping
/// "load more" stubs
pub fn comment_bodies(tree: Listing<CommentData>, limit: usize) -> Vec<String> {
    let mut bodies = Vec::new();
    let mut queue: VecDeque<Thing<CommentData>> = tree.data.children.into();

    while let Some(thing) = queue.pop_front() {
        if bodies.len() >= limit {
            break;
        }
        if thing.kind != "t1" {
            continue;
        }
        let CommentData { body, replies } = thing.data;
        if let Some(body) = body {
            bodies.push(body);
        }
        if replies.is_object() {
            if let Ok(listing) = serde_json::from_value::<Listing<CommentData>>(replies) {
                queue.extend(listing.data.children);
            }
        }
    }

    bodies
}

/// Path part of a reddit discussion URL, e.g. `/r/rust/comments/abc/title/`
pub fn permalink_path(post_url: &str) -> Option<&str> {
    let path = post_url
        .strip_prefix(WEB_BASE)
        .or_else(|| post_url.strip_prefix("https://reddit.com"))
        .or_else(|| post_url.strip_prefix("https://old.reddit.com"))
        .unwrap_or(post_url);
    path.starts_with("/r/").then_some(path)
}
