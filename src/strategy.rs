// ABOUTME: Training strategy collaborators that attach the training workload.
// ABOUTME: The basic variant adds a single training container and no extra env.

use crate::architecture::SidecarResources;
use crate::workload::{EnvVar, WorkloadSpec};
use serde_json::{Value, json};

/// Composes the training workload into the descriptor.
pub trait TrainingStrategy: Send + Sync {
    /// Attach the training workload for `image` to the descriptor. Returns
    /// the env pairs the image build must carry.
    fn add_training_workload(
        &self,
        spec: &mut WorkloadSpec,
        image: &str,
        name: &str,
        sidecars: SidecarResources,
    ) -> Vec<EnvVar>;
}

/// Single-container training, no distribution topology.
#[derive(Debug, Default)]
pub struct BasicTrainingStrategy;

impl TrainingStrategy for BasicTrainingStrategy {
    fn add_training_workload(
        &self,
        spec: &mut WorkloadSpec,
        image: &str,
        name: &str,
        sidecars: SidecarResources,
    ) -> Vec<EnvVar> {
        let mut container = json!({ "name": name, "image": image });
        if let Some(mounts) = sidecars.volume_mounts {
            container["volumeMounts"] = Value::Array(mounts);
        }

        let containers = spec
            .rest
            .entry("containers".to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(list) = containers {
            list.push(container);
        }

        Vec::new()
    }
}
