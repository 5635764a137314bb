//! Unified Error Model
//!
//! The analysis pipeline itself has no fatal path: collaborator errors are
//! converted into empty or error-status results at the collaborator boundary.
use thiserror::Error;

/// Failures inside a collaborator implementation
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// Missing credentials or configuration
    #[error("UNAVAILABLE/{0}")]
    Unavailable(String),

    #[error("NETWORK/{0}")]
    Network(String),

    #[error("PARSE/{0}")]
    Parse(String),

    #[error("STATUS/{status}: {url}")]
    Status { status: u16, url: String },
}

/// Errors outside the degrade-never-fail pipeline
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("CONFIG/{0}")]
    Config(String),

    #[error("IO/{0}")]
    Io(#[from] std::io::Error),
}
