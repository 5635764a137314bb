//! Service settings: defaults, then an optional YAML file, then environment
use launch_core::LaunchError;
use launch_tools::{DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Env var naming the optional YAML settings file
pub const CONFIG_PATH_ENV: &str = "LAUNCH_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app_name: String,
    pub listen_addr: String,
    pub reddit_client_id: Option<String>,
    pub reddit_client_secret: Option<String>,
    pub reddit_user_agent: String,
    pub http_timeout_secs: u64,
    pub search_max_results: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Product Launch Intelligence Platform".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            reddit_client_id: None,
            reddit_client_secret: None,
            reddit_user_agent: "ProductLaunchBot/1.0".to_string(),
            http_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            search_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl Settings {
    /// Resolve settings from the process environment
    pub fn load() -> Result<Self, LaunchError> {
        let mut settings = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_yaml_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, LaunchError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, LaunchError> {
        serde_yaml::from_str(raw).map_err(|e| LaunchError::Config(e.to_string()))
    }

    /// Apply `APP_NAME`-style overrides from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), LaunchError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("APP_NAME") {
            self.app_name = v;
        }
        if let Some(v) = lookup("LAUNCH_ADDR") {
            self.listen_addr = v;
        }
        if let Some(v) = lookup("REDDIT_CLIENT_ID") {
            self.reddit_client_id = Some(v);
        }
        if let Some(v) = lookup("REDDIT_CLIENT_SECRET") {
            self.reddit_client_secret = Some(v);
        }
        if let Some(v) = lookup("REDDIT_USER_AGENT") {
            self.reddit_user_agent = v;
        }
        if let Some(v) = lookup("HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = parse_number("HTTP_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("SEARCH_MAX_RESULTS") {
            self.search_max_results = parse_number("SEARCH_MAX_RESULTS", &v)?;
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, LaunchError> {
    value
        .trim()
        .parse()
        .map_err(|_| LaunchError::Config(format!("{} is not a number: {:?}", key, value)))
}
