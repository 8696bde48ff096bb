use std::{io, path::PathBuf};

/// Failures on the synchronous upload path. The watcher never sees these;
/// async-path failures degrade to a pending job that eventually times out.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    #[error("failed to stage {path}: {source}")]
    Stage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("worker process could not start: {0}")]
    Launch(#[source] io::Error),

    #[error("worker exited with status {code:?}: {stderr}")]
    Process { code: Option<i32>, stderr: String },

    #[error("could not parse worker output ({reason}); raw output: {raw}")]
    Parse { reason: String, raw: String },
}
