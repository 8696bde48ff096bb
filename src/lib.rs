mod artifacts;
mod cleanup;
pub mod config;
mod labels;
pub mod models;
mod watcher;
mod worker;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info, warn};
use tokio::sync::Mutex;

pub use artifacts::ArtifactDirectory;
pub use cleanup::CleanupCoordinator;
pub use config::{WorkerCommand, WorkspaceConfig};
pub use labels::{LabelMap, LabelStore};
pub use models::{
    GenerationJob, JobStatus, LabelRecord, LabeledImage, PollOutcome, UploadOutcome,
};
pub use watcher::WatcherController;
pub use worker::{ProcessLauncher, UploadPipeline, WorkerError};

/// The controller-facing surface the UI layer talks to. Owns the shared
/// stores and the single watcher slot; everything filesystem-shaped it hands
/// to components comes from the injected [`WorkspaceConfig`].
pub struct AppController {
    config: WorkspaceConfig,
    labels: LabelStore,
    launcher: ProcessLauncher,
    uploads: UploadPipeline,
    cleanup: CleanupCoordinator,
    watcher: Mutex<WatcherController>,
}

impl AppController {
    pub fn new(config: WorkspaceConfig) -> Result<Self> {
        for dir in config.managed_dirs() {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create managed directory {}", dir.display()))?;
        }

        let labels = LabelStore::new(&config.labels_path);
        let launcher = ProcessLauncher::new(config.generate_worker.clone(), &config.root);
        let uploads = UploadPipeline::new(
            config.upload_worker.clone(),
            &config.staging_dir,
            &config.root,
        );
        let cleanup = CleanupCoordinator::new(labels.clone(), config.managed_dirs());

        Ok(Self {
            config,
            labels,
            launcher,
            uploads,
            cleanup,
            watcher: Mutex::new(WatcherController::new()),
        })
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Stage a user-picked image into the staging directory. Mirrors the
    /// dialog contract of the surrounding app: a missing source or a failed
    /// copy yields `None` (logged), not an error.
    pub fn stage_image(&self, source: &Path) -> Result<Option<PathBuf>> {
        if !source.exists() {
            warn!("no image selected at {}", source.display());
            return Ok(None);
        }
        match self.uploads.stage(source) {
            Ok(staged) => Ok(Some(staged)),
            Err(err) => {
                error!("failed to stage {}: {err}", source.display());
                Ok(None)
            }
        }
    }

    /// Kick off one asynchronous generation round: start watching first (so
    /// the single-job guard trips before a second worker could be spawned),
    /// then launch the worker fire-and-forget.
    pub async fn run_generation(&self) -> Result<()> {
        let mut watcher = self.watcher.lock().await;
        let job = GenerationJob::new();
        watcher
            .start_watching(
                job,
                ArtifactDirectory::new(&self.config.generated_dir, &self.config.artifact_ext),
                self.labels.clone(),
                self.config.poll_interval(),
                self.config.job_timeout(),
            )
            .await?;
        self.launcher.launch();
        Ok(())
    }

    /// Snapshot of the current generation round.
    pub async fn poll_results(&self) -> PollOutcome {
        self.watcher.lock().await.outcome()
    }

    /// Synchronous classification of one uploaded image.
    pub async fn upload_and_process(&self, input: &Path) -> Result<UploadOutcome, WorkerError> {
        self.uploads.process(input).await
    }

    /// Stop any in-flight watch (the ownership token), then reset the label
    /// document and purge the managed directories. Returns the number of
    /// entries removed.
    pub async fn clear_all(&self) -> Result<usize> {
        let mut watcher = self.watcher.lock().await;
        watcher.stop().await?;
        let removed = self.cleanup.teardown();
        info!("cleared workspace ({removed} entries removed)");
        Ok(removed)
    }
}
