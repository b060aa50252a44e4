// ABOUTME: Library root for fairing - one train() entry point that deploys in
// ABOUTME: authoring phase and executes user logic inside the deployed container.

pub mod architecture;
pub mod backend;
pub mod build;
pub mod cancel;
pub mod deploy;
pub mod dockerfile;
pub mod error;
pub mod gate;
pub mod options;
pub mod phase;
pub mod strategy;
pub mod workload;

pub use deploy::Trainer;
pub use error::{Error, Result};
pub use gate::{Gate, Trainable};
pub use options::{PackageOptions, TensorboardOptions};
pub use phase::Phase;
