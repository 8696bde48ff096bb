//! Fire-and-forget launch of the generation worker.

use log::{error, info};
use std::path::PathBuf;
use tokio::process::Command;

use crate::config::WorkerCommand;

/// Starts the generation worker detached from any result channel. The worker
/// reports back only through the artifact directory and the label document;
/// the watcher is the sole way to learn whether it ever ran.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    command: WorkerCommand,
    workdir: PathBuf,
}

impl ProcessLauncher {
    pub fn new(command: WorkerCommand, workdir: impl Into<PathBuf>) -> Self {
        Self {
            command,
            workdir: workdir.into(),
        }
    }

    /// Spawn the worker and let it run. A spawn failure is logged and
    /// otherwise ignored; the caller cannot tell "never started" from "still
    /// running" here, only the watcher's deadline can.
    pub fn launch(&self) {
        let spawned = Command::new(&self.command.program)
            .args(&self.command.args)
            .current_dir(&self.workdir)
            .spawn();

        match spawned {
            Ok(child) => {
                info!(
                    "launched generation worker {} (pid {:?})",
                    self.command.program,
                    child.id()
                );
            }
            Err(err) => {
                error!(
                    "failed to launch generation worker {}: {err}",
                    self.command.program
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, path::PathBuf, time::Duration};
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("notelens-launch-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn launch_runs_worker_detached() {
        let dir = temp_dir();
        let marker = dir.join("ran.txt");
        let script = format!("printf done > '{}'", marker.display());
        let launcher = ProcessLauncher::new(WorkerCommand::new("/bin/sh", &["-c", &script]), &dir);

        launcher.launch();

        // No handle comes back; give the detached process a moment.
        for _ in 0..50 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(marker.exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn launch_failure_is_swallowed() {
        let dir = temp_dir();
        let launcher = ProcessLauncher::new(
            WorkerCommand::new("/nonexistent/notelens-worker", &[]),
            &dir,
        );
        // Must not panic or surface an error.
        launcher.launch();
        fs::remove_dir_all(&dir).ok();
    }
}
