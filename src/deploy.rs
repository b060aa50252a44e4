// ABOUTME: Deployment orchestration: compose the workload, build and publish
// ABOUTME: the image, submit to the backend, and stream logs until done.

use crate::architecture::{Architecture, BasicArchitecture, SidecarResources};
use crate::backend::DeployBackend;
use crate::build::{BuildEngine, DockerEngine, ImageBuilder};
use crate::cancel::{CancelToken, cancel_on_interrupt};
use crate::dockerfile::{self, NotebookContext};
use crate::error::{Error, Result};
use crate::options::{PackageOptions, TensorboardOptions};
use crate::strategy::{BasicTrainingStrategy, TrainingStrategy};
use crate::workload::{EnvVar, WorkloadSpec};
use futures::StreamExt;
use std::path::PathBuf;
use tracing::info;

/// Orchestrates one package's build-and-deploy pipeline.
pub struct Trainer<E: BuildEngine = DockerEngine> {
    package: PackageOptions,
    tensorboard: Option<TensorboardOptions>,
    architecture: Box<dyn Architecture>,
    strategy: Box<dyn TrainingStrategy>,
    backend: Box<dyn DeployBackend>,
    builder: ImageBuilder<E>,
    notebook: Option<NotebookContext>,
    context_dir: PathBuf,
    image: String,
}

impl Trainer<DockerEngine> {
    /// Trainer over the local Docker daemon with the basic architecture and
    /// strategy.
    pub fn new(
        package: PackageOptions,
        tensorboard: Option<TensorboardOptions>,
        backend: Box<dyn DeployBackend>,
    ) -> Self {
        Self::with_parts(
            package,
            tensorboard,
            Box::new(BasicArchitecture),
            Box::new(BasicTrainingStrategy),
            backend,
            ImageBuilder::docker(),
        )
    }
}

impl<E: BuildEngine> Trainer<E> {
    pub fn with_parts(
        package: PackageOptions,
        tensorboard: Option<TensorboardOptions>,
        architecture: Box<dyn Architecture>,
        strategy: Box<dyn TrainingStrategy>,
        backend: Box<dyn DeployBackend>,
        builder: ImageBuilder<E>,
    ) -> Self {
        let image = package.image_tag();
        Self {
            package,
            tensorboard,
            architecture,
            strategy,
            backend,
            builder,
            notebook: None,
            context_dir: PathBuf::from("."),
            image,
        }
    }

    /// Associate an interactive notebook with this deployment; its converted
    /// script becomes the container entrypoint.
    pub fn notebook(mut self, notebook: NotebookContext) -> Self {
        self.notebook = Some(notebook);
        self
    }

    /// Build-context directory the Dockerfile is written into and packaged
    /// from. Defaults to the current directory.
    pub fn context_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context_dir = dir.into();
        self
    }

    pub fn image_tag(&self) -> &str {
        &self.image
    }

    /// Compose the workload descriptor via the collaborators. Tensorboard
    /// sidecars go in first so the training container can share the volumes.
    fn compile_workload(&self) -> (WorkloadSpec, Vec<EnvVar>) {
        let mut spec = WorkloadSpec::new(&self.package.name);

        let sidecars = match &self.tensorboard {
            Some(tensorboard) => {
                self.architecture
                    .augment_with_sidecars(&mut spec, &self.package.name, tensorboard)
            }
            None => SidecarResources::default(),
        };

        let env = self.strategy.add_training_workload(
            &mut spec,
            &self.image,
            &self.package.name,
            sidecars,
        );

        (spec, env)
    }

    /// Run the full pipeline, cancelling on interrupt. Any failure aborts the
    /// remaining steps; there is no retry.
    pub async fn deploy(&self) -> Result<()> {
        let token = CancelToken::new();
        cancel_on_interrupt(token.clone());
        self.deploy_with_token(&token).await
    }

    /// Like [`Trainer::deploy`], observing an externally owned cancellation
    /// token while streaming logs.
    pub async fn deploy_with_token(&self, token: &CancelToken) -> Result<()> {
        let (spec, env) = self.compile_workload();

        dockerfile::write_dockerfile(
            &self.package,
            &env,
            self.notebook.as_ref(),
            &self.context_dir,
        )?;
        self.builder.build(&self.image, &self.context_dir).await?;

        if self.package.publish {
            self.builder.publish(&self.image).await?;
        }

        self.backend
            .run(&spec)
            .await
            .map_err(|e| Error::Deploy(e.to_string()))?;

        println!("Training(s) launched.");

        self.stream_logs(token).await
    }

    /// Stream workload logs until the stream ends or the token is cancelled.
    /// Cancellation cancels the backend workload and is not an error.
    async fn stream_logs(&self, token: &CancelToken) -> Result<()> {
        let mut lines = self
            .backend
            .logs(&self.package.name)
            .await
            .map_err(|e| Error::Deploy(e.to_string()))?;

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    info!(name = %self.package.name, "cancellation requested, stopping workload");
                    self.backend
                        .cancel(&self.package.name)
                        .await
                        .map_err(|e| Error::Deploy(e.to_string()))?;
                    return Ok(());
                }
                line = lines.next() => match line {
                    Some(Ok(line)) => info!("{line}"),
                    Some(Err(e)) => return Err(Error::Deploy(e.to_string())),
                    None => return Ok(()),
                },
            }
        }
    }
}
