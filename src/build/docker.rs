// ABOUTME: Bollard-backed build engine for Docker-compatible daemons.
// ABOUTME: The client handle is created on first use and cached for the engine's lifetime.

use crate::build::engine::{BuildEngine, EngineError, EventChunks};
use async_trait::async_trait;
use bollard::Docker;
use bollard::models::{BuildInfo, PushImageInfo};
use bollard::query_parameters::{BuildImageOptions, PushImageOptions};
use bytes::Bytes;
use futures::StreamExt;
use http_body_util::{Either, Full};
use serde_json::{Map, Value, json};
use std::path::Path;
use tokio::sync::OnceCell;

/// Build engine over the local Docker-compatible daemon.
pub struct DockerEngine {
    client: OnceCell<Docker>,
}

impl DockerEngine {
    pub fn new() -> Self {
        Self {
            client: OnceCell::new(),
        }
    }

    async fn client(&self) -> Result<&Docker, EngineError> {
        self.client
            .get_or_try_init(|| async {
                Docker::connect_with_local_defaults()
                    .map_err(|e| EngineError::Connection(e.to_string()))
            })
            .await
    }
}

impl Default for DockerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack a build context directory into an uncompressed tar archive.
fn pack_context(path: &Path) -> Result<Bytes, EngineError> {
    let mut ar = tar::Builder::new(Vec::new());
    ar.append_dir_all(".", path)
        .map_err(|e| EngineError::Context(e.to_string()))?;
    let data = ar
        .into_inner()
        .map_err(|e| EngineError::Context(e.to_string()))?;
    Ok(Bytes::from(data))
}

/// Re-encode a client-side failure as an error payload so the interpreter
/// sees one uniform wire format.
fn error_chunk(message: &str) -> Bytes {
    Bytes::from(json!({ "error": message }).to_string())
}

/// Map a typed build event back to the wire shape the interpreter reads.
/// Only the keys the interpreter inspects are carried over.
fn build_payload(info: BuildInfo) -> Value {
    let mut payload = Map::new();
    let error = info
        .error
        .or_else(|| info.error_detail.and_then(|d| d.message));
    if let Some(error) = error {
        payload.insert("error".to_string(), Value::String(error));
    }
    if let Some(stream) = info.stream {
        payload.insert("stream".to_string(), Value::String(stream));
    }
    if let Some(status) = info.status {
        payload.insert("status".to_string(), Value::String(status));
    }
    if let Some(progress) = info.progress {
        payload.insert("progress".to_string(), Value::String(progress));
    }
    if let Some(id) = info.aux.and_then(|aux| aux.id) {
        payload.insert("aux".to_string(), json!({ "ID": id }));
    }
    Value::Object(payload)
}

fn push_payload(info: PushImageInfo) -> Value {
    let mut payload = Map::new();
    let error = info
        .error
        .or_else(|| info.error_detail.and_then(|d| d.message));
    if let Some(error) = error {
        payload.insert("error".to_string(), Value::String(error));
    }
    if let Some(status) = info.status {
        payload.insert("status".to_string(), Value::String(status));
    }
    if let Some(progress) = info.progress {
        payload.insert("progress".to_string(), Value::String(progress));
    }
    Value::Object(payload)
}

fn to_chunk<T>(
    item: Result<T, bollard::errors::Error>,
    payload: fn(T) -> Value,
) -> Result<Bytes, EngineError> {
    match item {
        Ok(info) => Ok(Bytes::from(payload(info).to_string())),
        Err(e) => Ok(error_chunk(&e.to_string())),
    }
}

#[async_trait]
impl BuildEngine for DockerEngine {
    async fn build(&self, path: &Path, tag: &str) -> Result<EventChunks, EngineError> {
        let client = self.client().await?.clone();
        let context = pack_context(path)?;

        let options = BuildImageOptions {
            dockerfile: "Dockerfile".to_string(),
            t: Some(tag.to_string()),
            ..Default::default()
        };

        let body = Either::Left(Full::new(context));
        let stream = client
            .build_image(options, None, Some(body))
            .map(|item| to_chunk(item, build_payload));
        Ok(Box::pin(stream))
    }

    async fn push(&self, tag: &str) -> Result<EventChunks, EngineError> {
        let client = self.client().await?.clone();
        let stream = client
            .push_image(tag, None::<PushImageOptions>, None)
            .map(|item| to_chunk(item, push_payload));
        Ok(Box::pin(stream))
    }
}
