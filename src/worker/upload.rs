//! Synchronous upload path: stage an input file, run the classification
//! worker on it, and parse the worker's terminal output as the result.

use log::{info, warn};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tokio::process::Command;

use crate::config::WorkerCommand;
use crate::models::UploadOutcome;

use super::error::WorkerError;

#[derive(Debug, Clone)]
pub struct UploadPipeline {
    command: WorkerCommand,
    staging_dir: PathBuf,
    workdir: PathBuf,
}

impl UploadPipeline {
    pub fn new(
        command: WorkerCommand,
        staging_dir: impl Into<PathBuf>,
        workdir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            command,
            staging_dir: staging_dir.into(),
            workdir: workdir.into(),
        }
    }

    /// Copy the input into the staging directory, keyed by filename. A second
    /// input with the same filename overwrites the first; staging is not
    /// content-addressed. An input that is already the staged file is returned
    /// as-is: copying a file onto itself would truncate it.
    pub fn stage(&self, input: &Path) -> Result<PathBuf, WorkerError> {
        if !input.exists() {
            return Err(WorkerError::MissingInput(input.to_path_buf()));
        }
        let file_name = input
            .file_name()
            .ok_or_else(|| WorkerError::MissingInput(input.to_path_buf()))?;

        fs::create_dir_all(&self.staging_dir).map_err(|source| WorkerError::Stage {
            path: self.staging_dir.clone(),
            source,
        })?;

        let staged = self.staging_dir.join(file_name);
        if is_same_file(input, &staged) {
            return Ok(staged);
        }
        fs::copy(input, &staged).map_err(|source| WorkerError::Stage {
            path: staged.clone(),
            source,
        })?;
        info!("staged {} at {}", input.display(), staged.display());
        Ok(staged)
    }

    /// Run one upload request end to end: stage, invoke the worker with the
    /// staged path as its final argument, wait for exit, parse the last
    /// non-empty stdout line as the result. Blocking from the caller's point
    /// of view for the duration of the worker run.
    pub async fn process(&self, input: &Path) -> Result<UploadOutcome, WorkerError> {
        let staged = self.stage(input)?;

        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg(&staged)
            .current_dir(&self.workdir)
            .output()
            .await
            .map_err(WorkerError::Launch)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                "upload worker exited with {:?}: {stderr}",
                output.status.code()
            );
            return Err(WorkerError::Process {
                code: output.status.code(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        parse_trailing_line(&stdout)
    }
}

/// Whether both paths resolve to the same existing file (symlinks and
/// relative prefixes included), in which case staging must not copy.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Everything before the last non-empty stdout line is diagnostic noise from
/// the worker; only that final line is the structured result.
fn parse_trailing_line(stdout: &str) -> Result<UploadOutcome, WorkerError> {
    let line = stdout
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| WorkerError::Parse {
            reason: "worker produced no output".into(),
            raw: stdout.to_string(),
        })?;

    let outcome: UploadOutcome =
        serde_json::from_str(line.trim()).map_err(|err| WorkerError::Parse {
            reason: err.to_string(),
            raw: stdout.to_string(),
        })?;

    outcome.check_shape().map_err(|reason| WorkerError::Parse {
        reason,
        raw: stdout.to_string(),
    })?;

    Ok(outcome)
}
