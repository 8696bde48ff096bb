//! Artifact directory access: the unstructured half of the worker → controller
//! channel. Workers drop image files here; membership and filename are the
//! only identity an artifact carries.

use log::warn;
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
pub struct ArtifactDirectory {
    path: PathBuf,
    ext: String,
}

impl ArtifactDirectory {
    pub fn new(path: impl Into<PathBuf>, ext: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ext: ext.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List artifact files matching the configured extension, sorted by name.
    /// A missing or unreadable directory lists as empty; the watcher reads
    /// that as "nothing produced yet".
    pub fn list(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && self.matches_ext(path))
            .collect();
        files.sort();
        files
    }

    fn matches_ext(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(&self.ext))
            .unwrap_or(false)
    }

    /// Delete every entry in the directory, regardless of extension. Failures
    /// are logged per entry and never abort the rest of the batch. Returns the
    /// number of entries removed.
    pub fn purge(&self) -> usize {
        let entries = match fs::read_dir(&self.path) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        let mut removed = 0;
        for entry in entries.filter_map(|entry| entry.ok()) {
            let path = entry.path();
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(err) => warn!("failed to delete {}: {err}", path.display()),
            }
        }
        removed
    }
}
