// ABOUTME: Trait boundary to the deployment backend that runs workloads.
// ABOUTME: Submission, cancellation, and log streaming; implementations live elsewhere.

use crate::workload::WorkloadSpec;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("workload submission failed: {0}")]
    Submission(String),

    #[error("cancellation failed: {0}")]
    Cancellation(String),

    #[error("log stream error: {0}")]
    LogStream(String),
}

/// Lines from the deployed workload. The stream blocks until the workload
/// produces output or terminates.
pub type LogLines = Pin<Box<dyn Stream<Item = Result<String, BackendError>> + Send>>;

/// A backend that accepts a workload descriptor and runs, cancels, and
/// streams logs for it.
#[async_trait]
pub trait DeployBackend: Send + Sync {
    async fn run(&self, spec: &WorkloadSpec) -> Result<(), BackendError>;

    async fn cancel(&self, name: &str) -> Result<(), BackendError>;

    async fn logs(&self, name: &str) -> Result<LogLines, BackendError>;
}
