// ABOUTME: Execution phase detection from the process environment.
// ABOUTME: FAIRING_RUNTIME marks execution inside a deployed container.

/// Environment marker baked into every generated image. Presence means this
/// process is running inside the deployed container.
pub const RUNTIME_MARKER: &str = "FAIRING_RUNTIME";

/// Which side of the deploy boundary this process is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Developer machine: the training entry point packages and deploys.
    Authoring,
    /// Deployed container: the training entry point runs user logic.
    Runtime,
}

impl Phase {
    /// Read the runtime marker. Absence is a normal state, not an error.
    pub fn detect() -> Self {
        if std::env::var_os(RUNTIME_MARKER).is_some() {
            Phase::Runtime
        } else {
            Phase::Authoring
        }
    }

    pub fn is_runtime(self) -> bool {
        matches!(self, Phase::Runtime)
    }
}
