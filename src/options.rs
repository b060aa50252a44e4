// ABOUTME: Caller-supplied options describing the training package.
// ABOUTME: Immutable after construction; consumed by the trainer and generator.

use serde::Deserialize;
use std::path::PathBuf;

/// What to package, where it is published, and whether to publish at all.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageOptions {
    pub name: String,
    pub repository: String,

    #[serde(default)]
    pub publish: bool,

    /// User-maintained build file used verbatim instead of a generated one.
    #[serde(default)]
    pub dockerfile: Option<PathBuf>,
}

impl PackageOptions {
    pub fn new(name: impl Into<String>, repository: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repository: repository.into(),
            publish: false,
            dockerfile: None,
        }
    }

    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub fn dockerfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.dockerfile = Some(path.into());
        self
    }

    /// Tag the built package is addressed by.
    pub fn image_tag(&self) -> String {
        format!("{}/{}:latest", self.repository, self.name)
    }
}

/// Tensorboard sidecar options, forwarded untouched to the architecture
/// collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct TensorboardOptions {
    pub log_dir: String,
    pub pvc_name: String,

    #[serde(default)]
    pub public: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_tag_is_repository_name_latest() {
        let package = PackageOptions::new("mnist", "registry.example.com/team");
        assert_eq!(package.image_tag(), "registry.example.com/team/mnist:latest");
    }

    #[test]
    fn publish_defaults_off() {
        let package = PackageOptions::new("mnist", "repo");
        assert!(!package.publish);
        assert!(package.dockerfile.is_none());
    }
}
