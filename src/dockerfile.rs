// ABOUTME: Container build-instruction generation and Dockerfile writing.
// ABOUTME: Produces the fixed directive order the packaged application depends on.

use crate::error::{Error, Result};
use crate::options::PackageOptions;
use crate::phase::RUNTIME_MARKER;
use crate::workload::EnvVar;
use std::path::Path;

/// Development-mode marker: build on top of a locally published dev image.
pub const DEV_MARKER: &str = "FAIRING_DEV";

/// Registry username the dev image is published under. Required whenever the
/// dev marker is set.
pub const DEV_USERNAME_VAR: &str = "FAIRING_DEV_DOCKER_USERNAME";

const DEV_IMAGE_NAME: &str = "fairing";
const DEFAULT_BASE_IMAGE: &str = "library/python:3.6";
const DOCKERFILE_NAME: &str = "Dockerfile";

/// Interactive notebook the entry point lives in, when there is one.
#[derive(Debug, Clone)]
pub struct NotebookContext {
    pub notebook_name: String,
}

impl NotebookContext {
    pub fn new(notebook_name: impl Into<String>) -> Self {
        Self {
            notebook_name: notebook_name.into(),
        }
    }
}

/// Ordered container build specification. Purely derived data, rebuilt fresh
/// for every build invocation.
#[derive(Debug, Clone)]
pub struct BuildInstructions {
    base_image: String,
    env: Vec<EnvVar>,
    extra_steps: Vec<String>,
    entrypoint: String,
}

impl BuildInstructions {
    pub fn base_image(&self) -> &str {
        &self.base_image
    }

    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    /// Render the directives in their fixed order. Dependencies must be
    /// installed before the notebook conversion runs against /app, and env
    /// directives come after every install step.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("FROM {}", self.base_image));
        lines.push(format!("ENV {RUNTIME_MARKER} 1"));
        lines.push("COPY ./ /app/".to_string());
        lines.push("RUN pip install --no-cache -r /app/requirements.txt".to_string());
        lines.extend(self.extra_steps.iter().cloned());
        for pair in &self.env {
            lines.push(format!("ENV {} {}", pair.name, pair.value));
        }
        lines.push(format!("CMD python /app/{}", self.entrypoint));
        lines.join("\n")
    }
}

/// Strip the invocation path through the first separator only. Multi-level
/// paths keep their tail (`a/b/train.py` becomes `b/train.py`); existing
/// images were built with this behavior, so it stays.
fn truncate_invocation_path(path: &str) -> &str {
    match path.find('/') {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Default entrypoint file name, derived from this process's own invocation
/// path.
pub fn exec_file_name() -> String {
    let argv0 = std::env::args().next().unwrap_or_default();
    truncate_invocation_path(&argv0).to_string()
}

fn base_image() -> Result<String> {
    if std::env::var_os(DEV_MARKER).is_some() {
        match std::env::var(DEV_USERNAME_VAR) {
            Ok(username) => Ok(format!("{username}/{DEV_IMAGE_NAME}:latest")),
            Err(_) => Err(Error::DevUsernameMissing {
                marker: DEV_MARKER,
                username: DEV_USERNAME_VAR,
            }),
        }
    } else {
        Ok(DEFAULT_BASE_IMAGE.to_string())
    }
}

/// Generate build instructions for the current process and the given env
/// pairs. A notebook context swaps the entrypoint for the converted notebook
/// and prepends the conversion toolchain steps.
pub fn generate(env: &[EnvVar], notebook: Option<&NotebookContext>) -> Result<BuildInstructions> {
    let base_image = base_image()?;

    let mut extra_steps = Vec::new();
    let entrypoint = match notebook {
        Some(nb) => {
            extra_steps.push("RUN pip install jupyter nbconvert".to_string());
            extra_steps.push(format!(
                "RUN jupyter nbconvert --to script /app/{}",
                nb.notebook_name
            ));
            nb.notebook_name.replace(".ipynb", ".py")
        }
        None => exec_file_name(),
    };

    Ok(BuildInstructions {
        base_image,
        env: env.to_vec(),
        extra_steps,
        entrypoint,
    })
}

/// Write the build file into `dir`. A user-supplied build file is copied
/// verbatim; otherwise the generated instructions are rendered.
pub fn write_dockerfile(
    package: &PackageOptions,
    env: &[EnvVar],
    notebook: Option<&NotebookContext>,
    dir: &Path,
) -> Result<()> {
    let target = dir.join(DOCKERFILE_NAME);

    if let Some(ref custom) = package.dockerfile {
        std::fs::copy(custom, &target)?;
        return Ok(());
    }

    let instructions = generate(env, notebook)?;
    std::fs::write(&target, instructions.render())?;
    Ok(())
}
