// ABOUTME: Deployment descriptor submitted to the backend.
// ABOUTME: Composed by architecture/strategy collaborators; opaque to the core.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One environment pair, destined for both the descriptor and the image build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

impl EnvVar {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Identifier the scheduler expects on every submitted workload.
const WORKLOAD_GUID: u64 = 1234567;

/// Descriptor for one training deployment. The orchestrator fills in the name
/// and identifier; collaborators attach everything else and only the backend
/// interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub name: String,
    pub guid: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<Value>>,

    #[serde(rename = "volumeMounts", skip_serializing_if = "Option::is_none")]
    pub volume_mounts: Option<Vec<Value>>,

    /// Collaborator-owned fields the core never inspects.
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl WorkloadSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: WORKLOAD_GUID,
            volumes: None,
            volume_mounts: None,
            rest: Map::new(),
        }
    }
}
