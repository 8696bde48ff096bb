//! Watcher lifecycle: owns the polling task for the active generation round.

mod loop_worker;

use anyhow::{bail, Context, Result};
use log::info;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::artifacts::ArtifactDirectory;
use crate::labels::LabelStore;
use crate::models::{GenerationJob, JobStatus, PollOutcome};

use loop_worker::watch_loop;

/// At most one watch runs at a time; the active job doubles as the ownership
/// token teardown has to go through before touching shared state.
pub struct WatcherController {
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
    job: Option<GenerationJob>,
}

impl WatcherController {
    pub fn new() -> Self {
        Self {
            handle: None,
            cancel_token: None,
            job: None,
        }
    }

    /// Spawn the polling task for a new generation round. Fails if a job is
    /// still pending; a finished previous round is reaped and replaced.
    pub async fn start_watching(
        &mut self,
        job: GenerationJob,
        artifacts: ArtifactDirectory,
        store: LabelStore,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<()> {
        if let Some(active) = &self.job {
            if active.status() == JobStatus::Pending {
                bail!("a generation job is already active");
            }
        }
        self.stop().await?;

        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(watch_loop(
            job.clone(),
            artifacts,
            store,
            poll_interval,
            timeout,
            cancel_token.clone(),
        ));

        info!(
            "started watching for results of job {} (started {})",
            job.id, job.started_at
        );
        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        self.job = Some(job);
        Ok(())
    }

    /// What the current round looks like from outside.
    pub fn outcome(&self) -> PollOutcome {
        match &self.job {
            Some(job) => job.outcome(),
            None => PollOutcome::Idle,
        }
    }

    /// Cancel the polling task, wait for it to exit, and drop the job. After
    /// this returns the loop can no longer observe or mutate anything.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
        if let Some(handle) = self.handle.take() {
            handle.await.context("watch loop task failed to join")?;
        }
        self.job = None;
        Ok(())
    }
}

impl Default for WatcherController {
    fn default() -> Self {
        Self::new()
    }
}
