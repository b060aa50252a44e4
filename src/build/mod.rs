// ABOUTME: Image building and publishing over a streaming build engine.
// ABOUTME: Interprets engine output line by line; an error event aborts the operation.

pub mod docker;
pub mod engine;
pub mod events;

pub use docker::DockerEngine;
pub use engine::{BuildEngine, EngineError, EventChunks};
pub use events::BuildEvent;

use futures::StreamExt;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("build engine unavailable: {0}")]
    Engine(String),

    #[error("image build failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("build engine unavailable: {0}")]
    Engine(String),

    #[error("image push failed: {0}")]
    Failed(String),
}

/// Drives the build engine and interprets its event streams.
pub struct ImageBuilder<E: BuildEngine = DockerEngine> {
    engine: E,
}

impl ImageBuilder<DockerEngine> {
    /// Builder over the local Docker-compatible daemon.
    pub fn docker() -> Self {
        Self::new(DockerEngine::new())
    }
}

impl<E: BuildEngine> ImageBuilder<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Build `tag` from the context at `path`, consuming engine events
    /// strictly in emission order. The first error event aborts the build.
    pub async fn build(&self, tag: &str, path: &Path) -> Result<(), BuildError> {
        println!("Building image {tag}...");
        let mut chunks = self
            .engine
            .build(path, tag)
            .await
            .map_err(|e| BuildError::Engine(e.to_string()))?;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| BuildError::Engine(e.to_string()))?;
            if let Some(message) = interpret_chunk(&chunk) {
                return Err(BuildError::Failed(message));
            }
        }
        Ok(())
    }

    /// Push `tag`, consuming push events the same way as build events.
    pub async fn publish(&self, tag: &str) -> Result<(), PublishError> {
        println!("Publishing image {tag}...");
        let mut chunks = self
            .engine
            .push(tag)
            .await
            .map_err(|e| PublishError::Engine(e.to_string()))?;

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk.map_err(|e| PublishError::Engine(e.to_string()))?;
            if let Some(message) = interpret_chunk(&chunk) {
                return Err(PublishError::Failed(message));
            }
        }
        Ok(())
    }
}

/// Log every classified payload in a chunk. Returns the message of the first
/// error event; payloads after it are not processed. Lines that fail to
/// decode are logged as warnings and skipped.
fn interpret_chunk(raw: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(raw);
    for line in text.trim().split('\n') {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(_) => {
                warn!(line = %line, "JSON decode error");
                continue;
            }
        };

        match events::classify(value) {
            BuildEvent::Error(message) => {
                error!("Build failed: {message}");
                return Some(message);
            }
            BuildEvent::Progress(output) => info!("Build output: {output}"),
            BuildEvent::StatusUpdate { status, progress } => {
                info!("Push output: {} {}", status, progress.unwrap_or_default())
            }
            BuildEvent::PushResult(aux) => info!("Push finished: {aux}"),
            BuildEvent::Unclassified(value) => info!("{value}"),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_payload_yields_its_message() {
        let outcome = interpret_chunk(br#"{"error": "disk full"}"#);
        assert_eq!(outcome, Some("disk full".to_string()));
    }

    #[test]
    fn progress_payload_is_not_a_failure() {
        assert_eq!(interpret_chunk(br#"{"stream": "Step 1/4 : FROM python"}"#), None);
    }

    #[test]
    fn bundled_payloads_stop_at_the_first_error() {
        let chunk = b"{\"stream\": \"Step 1\"}\n{\"error\": \"boom\"}\n{\"stream\": \"Step 2\"}";
        assert_eq!(interpret_chunk(chunk), Some("boom".to_string()));
    }

    #[test]
    fn undecodable_lines_are_skipped() {
        let chunk = b"not json\n{\"stream\": \"still fine\"}";
        assert_eq!(interpret_chunk(chunk), None);
    }

    #[test]
    fn surrounding_whitespace_is_stripped() {
        assert_eq!(interpret_chunk(b"  {\"status\": \"Pushed\"}  \n"), None);
    }
}
