// ABOUTME: Application-wide error types for fairing.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::build::{BuildError, PublishError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Development mode is enabled but the registry username it depends on is
    /// not configured. Raised before any build or network action.
    #[error(
        "{marker} is set but {username} is not; set {username} to your registry username or unset {marker}"
    )]
    DevUsernameMissing {
        marker: &'static str,
        username: &'static str,
    },

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("deployment failed: {0}")]
    Deploy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
