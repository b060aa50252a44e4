// ABOUTME: Execution gate wrapping a user trainable object.
// ABOUTME: The first train() call deploys (authoring) or runs user logic (runtime).

use crate::build::{BuildEngine, DockerEngine};
use crate::deploy::Trainer;
use crate::error::Result;
use crate::phase::Phase;
use std::ops::{Deref, DerefMut};

/// User training logic. Written once, against one method name; it never needs
/// to branch on phase.
pub trait Trainable {
    fn train(&mut self);
}

/// Where the gate routed the first training call. Terminal once armed; there
/// is no way back to `Unarmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GateState {
    Unarmed,
    ArmedLocal,
    ArmedRemote,
}

/// Wraps a trainable object and routes the first `train()` call by phase:
/// authoring deploys the package, runtime executes the wrapped logic. Every
/// later call, and every other attribute, passes through to the inner object.
pub struct Gate<T: Trainable, E: BuildEngine = DockerEngine> {
    inner: T,
    trainer: Trainer<E>,
    phase: Phase,
    state: GateState,
}

impl<T: Trainable, E: BuildEngine> Gate<T, E> {
    /// Gate with the phase read from the process environment.
    pub fn new(inner: T, trainer: Trainer<E>) -> Self {
        Self::with_phase(inner, trainer, Phase::detect())
    }

    pub fn with_phase(inner: T, trainer: Trainer<E>, phase: Phase) -> Self {
        Self {
            inner,
            trainer,
            phase,
            state: GateState::Unarmed,
        }
    }

    /// The training entry point user code calls in both phases.
    pub async fn train(&mut self) -> Result<()> {
        match self.state {
            GateState::Unarmed => match self.phase {
                Phase::Runtime => {
                    self.state = GateState::ArmedLocal;
                    self.inner.train();
                    Ok(())
                }
                Phase::Authoring => {
                    self.state = GateState::ArmedRemote;
                    self.trainer.deploy().await
                }
            },
            // Armed: the gate is transparent and the call reaches the inner
            // object's own train.
            GateState::ArmedLocal | GateState::ArmedRemote => {
                self.inner.train();
                Ok(())
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.state != GateState::Unarmed
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Trainable, E: BuildEngine> Deref for Gate<T, E> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: Trainable, E: BuildEngine> DerefMut for Gate<T, E> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}
