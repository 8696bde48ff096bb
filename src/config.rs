use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// An external worker invocation: program plus fixed leading arguments.
/// The upload pipeline appends the staged file path as the final argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl WorkerCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Paths and tunables for one workspace. Directories are configuration, not
/// identity: every component takes them from here instead of hard-coding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Working directory for spawned workers; relative worker output lands here.
    pub root: PathBuf,
    /// The shared label document written by the generation worker.
    pub labels_path: PathBuf,
    /// Where uploaded inputs are staged before the upload worker runs.
    pub staging_dir: PathBuf,
    /// Where the generation worker deposits artifacts; watched for completion.
    pub generated_dir: PathBuf,
    /// Artifacts picked out for display; managed (purged) but not watched.
    pub selected_dir: PathBuf,
    /// Extension the watcher filters artifact listings by.
    pub artifact_ext: String,
    pub generate_worker: WorkerCommand,
    pub upload_worker: WorkerCommand,
    pub poll_interval_ms: u64,
    pub job_timeout_secs: u64,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self::rooted_at(PathBuf::from("."))
    }
}

impl WorkspaceConfig {
    /// Standard workspace layout under `root`, matching the production app's
    /// directory tree.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let app_images = root.join("images").join("app_images");
        Self {
            labels_path: root.join("labels.json"),
            staging_dir: app_images.join("uploaded_images"),
            generated_dir: app_images.join("gen_images"),
            selected_dir: app_images.join("selected_images"),
            artifact_ext: "png".into(),
            generate_worker: WorkerCommand::new("python3", &["generate_images.py"]),
            upload_worker: WorkerCommand::new("python3", &["process_upload.py"]),
            poll_interval_ms: 500,
            job_timeout_secs: 120,
            root,
        }
    }

    /// Load from a JSON file; a missing file yields defaults, corrupt content
    /// falls back to defaults as well.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Ok(serde_json::from_str(&contents).unwrap_or_default())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }

    /// All directories whose contents are transient and owned by this app.
    pub fn managed_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.selected_dir.clone(),
            self.generated_dir.clone(),
            self.staging_dir.clone(),
        ]
    }
}
