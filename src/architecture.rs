// ABOUTME: Architecture collaborators that attach sidecar resources to a workload.
// ABOUTME: The basic variant mounts a tensorboard log volume backed by a PVC.

use crate::options::TensorboardOptions;
use crate::workload::WorkloadSpec;
use serde_json::{Value, json};

/// Volumes and mounts produced by sidecar augmentation, handed on to the
/// training strategy so the training container can share them.
#[derive(Debug, Clone, Default)]
pub struct SidecarResources {
    pub volumes: Option<Vec<Value>>,
    pub volume_mounts: Option<Vec<Value>>,
}

/// Composes sidecar resources into the workload descriptor.
pub trait Architecture: Send + Sync {
    /// Attach sidecar resources for the workload named `name` and return the
    /// volumes and mounts the training container should share.
    fn augment_with_sidecars(
        &self,
        spec: &mut WorkloadSpec,
        name: &str,
        tensorboard: &TensorboardOptions,
    ) -> SidecarResources;
}

/// Single-node architecture: one log volume backed by the tensorboard PVC.
#[derive(Debug, Default)]
pub struct BasicArchitecture;

impl Architecture for BasicArchitecture {
    fn augment_with_sidecars(
        &self,
        spec: &mut WorkloadSpec,
        name: &str,
        tensorboard: &TensorboardOptions,
    ) -> SidecarResources {
        let volume_name = format!("{name}-logs");
        let volume = json!({
            "name": volume_name,
            "persistentVolumeClaim": { "claimName": tensorboard.pvc_name },
        });
        let mount = json!({
            "name": volume_name,
            "mountPath": tensorboard.log_dir,
        });

        spec.volumes.get_or_insert_with(Vec::new).push(volume.clone());
        spec.volume_mounts
            .get_or_insert_with(Vec::new)
            .push(mount.clone());

        SidecarResources {
            volumes: Some(vec![volume]),
            volume_mounts: Some(vec![mount]),
        }
    }
}
