// ABOUTME: Trait boundary to the external image build engine.
// ABOUTME: Streams raw event chunks; all decoding happens in the interpreter.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to connect to build engine: {0}")]
    Connection(String),

    #[error("failed to pack build context: {0}")]
    Context(String),

    #[error("build engine stream error: {0}")]
    Stream(String),
}

/// Raw event chunks as emitted by the engine. One chunk may bundle several
/// newline-joined JSON payloads.
pub type EventChunks = Pin<Box<dyn Stream<Item = Result<Bytes, EngineError>> + Send>>;

/// An engine that builds an image from a context directory and pushes a
/// tagged image, reporting progress as a stream of raw chunks.
#[async_trait]
pub trait BuildEngine: Send + Sync {
    async fn build(&self, path: &Path, tag: &str) -> Result<EventChunks, EngineError>;

    async fn push(&self, tag: &str) -> Result<EventChunks, EngineError>;
}
