// ABOUTME: Test support utilities.
// ABOUTME: Scripted build engine and recording backend stand in for the real collaborators.
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use fairing::Trainer;
use fairing::architecture::BasicArchitecture;
use fairing::backend::{BackendError, DeployBackend, LogLines};
use fairing::build::{BuildEngine, EngineError, EventChunks, ImageBuilder};
use fairing::options::PackageOptions;
use fairing::strategy::BasicTrainingStrategy;
use fairing::workload::WorkloadSpec;
use futures::StreamExt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Build engine that replays scripted chunks and counts what was polled.
#[derive(Clone)]
pub struct ScriptedEngine {
    build_chunks: Arc<Mutex<Vec<Bytes>>>,
    push_chunks: Arc<Mutex<Vec<Bytes>>>,
    pub polled: Arc<AtomicUsize>,
    pub builds: Arc<AtomicUsize>,
    pub pushes: Arc<AtomicUsize>,
}

impl ScriptedEngine {
    pub fn new(build_chunks: Vec<&str>, push_chunks: Vec<&str>) -> Self {
        let to_bytes = |chunks: Vec<&str>| {
            chunks
                .into_iter()
                .map(|c| Bytes::from(c.to_string()))
                .collect::<Vec<_>>()
        };
        Self {
            build_chunks: Arc::new(Mutex::new(to_bytes(build_chunks))),
            push_chunks: Arc::new(Mutex::new(to_bytes(push_chunks))),
            polled: Arc::new(AtomicUsize::new(0)),
            builds: Arc::new(AtomicUsize::new(0)),
            pushes: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn stream(chunks: Vec<Bytes>, polled: Arc<AtomicUsize>) -> EventChunks {
        let stream = futures::stream::iter(chunks.into_iter().map(Ok)).inspect(move |_| {
            polled.fetch_add(1, Ordering::SeqCst);
        });
        Box::pin(stream)
    }
}

#[async_trait]
impl BuildEngine for ScriptedEngine {
    async fn build(&self, _path: &Path, _tag: &str) -> Result<EventChunks, EngineError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let chunks = self.build_chunks.lock().unwrap().clone();
        Ok(Self::stream(chunks, self.polled.clone()))
    }

    async fn push(&self, _tag: &str) -> Result<EventChunks, EngineError> {
        self.pushes.fetch_add(1, Ordering::SeqCst);
        let chunks = self.push_chunks.lock().unwrap().clone();
        Ok(Self::stream(chunks, self.polled.clone()))
    }
}

/// Backend that records submissions and serves scripted log lines.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    pub runs: Arc<Mutex<Vec<WorkloadSpec>>>,
    pub cancels: Arc<Mutex<Vec<String>>>,
    log_lines: Arc<Mutex<Vec<String>>>,
    hang_logs: Arc<AtomicBool>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_lines(lines: Vec<&str>) -> Self {
        let backend = Self::default();
        *backend.log_lines.lock().unwrap() = lines.into_iter().map(String::from).collect();
        backend
    }

    /// Backend whose log stream never terminates on its own.
    pub fn hanging() -> Self {
        let backend = Self::default();
        backend.hang_logs.store(true, Ordering::SeqCst);
        backend
    }
}

#[async_trait]
impl DeployBackend for RecordingBackend {
    async fn run(&self, spec: &WorkloadSpec) -> Result<(), BackendError> {
        self.runs.lock().unwrap().push(spec.clone());
        Ok(())
    }

    async fn cancel(&self, name: &str) -> Result<(), BackendError> {
        self.cancels.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn logs(&self, _name: &str) -> Result<LogLines, BackendError> {
        let lines = self.log_lines.lock().unwrap().clone();
        let finite = futures::stream::iter(lines.into_iter().map(Ok));
        if self.hang_logs.load(Ordering::SeqCst) {
            Ok(Box::pin(finite.chain(futures::stream::pending())))
        } else {
            Ok(Box::pin(finite))
        }
    }
}

/// Trainer wired up with the scripted mocks and the basic collaborators.
pub fn trainer_with(
    engine: ScriptedEngine,
    backend: RecordingBackend,
    package: PackageOptions,
    context_dir: &Path,
) -> Trainer<ScriptedEngine> {
    Trainer::with_parts(
        package,
        None,
        Box::new(BasicArchitecture),
        Box::new(BasicTrainingStrategy),
        Box::new(backend),
        ImageBuilder::new(engine),
    )
    .context_dir(context_dir)
}
