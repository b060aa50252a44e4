// ABOUTME: Integration tests for the execution gate state machine.
// ABOUTME: Covers both phases and the pass-through behavior once armed.

mod support;

use fairing::gate::{Gate, Trainable};
use fairing::{PackageOptions, Phase};
use std::sync::atomic::Ordering;
use support::{RecordingBackend, ScriptedEngine, trainer_with};

struct CountingModel {
    runs: usize,
    learning_rate: f64,
}

impl CountingModel {
    fn new() -> Self {
        Self {
            runs: 0,
            learning_rate: 0.01,
        }
    }
}

impl Trainable for CountingModel {
    fn train(&mut self) {
        self.runs += 1;
    }
}

#[tokio::test]
async fn runtime_phase_runs_user_logic_without_deploying() {
    let dir = tempfile::tempdir().unwrap();
    let engine = ScriptedEngine::new(vec![], vec![]);
    let backend = RecordingBackend::new();
    let builds = engine.builds.clone();
    let runs = backend.runs.clone();

    let trainer = trainer_with(engine, backend, PackageOptions::new("mnist", "repo"), dir.path());
    let mut gate = Gate::with_phase(CountingModel::new(), trainer, Phase::Runtime);

    gate.train().await.unwrap();

    assert!(gate.is_armed());
    assert_eq!(gate.get_ref().runs, 1);
    assert_eq!(builds.load(Ordering::SeqCst), 0);
    assert!(runs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn authoring_phase_deploys_without_running_user_logic() {
    let dir = tempfile::tempdir().unwrap();
    let engine = ScriptedEngine::new(vec![], vec![]);
    let backend = RecordingBackend::new();
    let builds = engine.builds.clone();
    let runs = backend.runs.clone();

    let trainer = trainer_with(engine, backend, PackageOptions::new("mnist", "repo"), dir.path());
    let mut gate = Gate::with_phase(CountingModel::new(), trainer, Phase::Authoring);

    gate.train().await.unwrap();

    assert!(gate.is_armed());
    assert_eq!(gate.get_ref().runs, 0);
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(runs.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn armed_gate_passes_later_calls_to_the_inner_object() {
    let dir = tempfile::tempdir().unwrap();
    let engine = ScriptedEngine::new(vec![], vec![]);
    let backend = RecordingBackend::new();
    let builds = engine.builds.clone();

    let trainer = trainer_with(engine, backend, PackageOptions::new("mnist", "repo"), dir.path());
    let mut gate = Gate::with_phase(CountingModel::new(), trainer, Phase::Runtime);

    gate.train().await.unwrap();
    gate.train().await.unwrap();
    gate.train().await.unwrap();

    assert_eq!(gate.get_ref().runs, 3);
    assert_eq!(builds.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn authoring_deploys_only_once_then_passes_through() {
    let dir = tempfile::tempdir().unwrap();
    let engine = ScriptedEngine::new(vec![], vec![]);
    let backend = RecordingBackend::new();
    let builds = engine.builds.clone();

    let trainer = trainer_with(engine, backend, PackageOptions::new("mnist", "repo"), dir.path());
    let mut gate = Gate::with_phase(CountingModel::new(), trainer, Phase::Authoring);

    gate.train().await.unwrap();
    gate.train().await.unwrap();

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(gate.get_ref().runs, 1);
}

#[tokio::test]
async fn other_attributes_pass_through_without_arming_the_gate() {
    let dir = tempfile::tempdir().unwrap();
    let engine = ScriptedEngine::new(vec![], vec![]);
    let backend = RecordingBackend::new();

    let trainer = trainer_with(engine, backend, PackageOptions::new("mnist", "repo"), dir.path());
    let mut gate = Gate::with_phase(CountingModel::new(), trainer, Phase::Runtime);

    assert_eq!(gate.learning_rate, 0.01);
    gate.learning_rate = 0.1;
    assert_eq!(gate.learning_rate, 0.1);

    assert!(!gate.is_armed());
    assert_eq!(gate.into_inner().runs, 0);
}
