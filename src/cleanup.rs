//! Teardown of shared transient state: the label document and the managed
//! image directories. Runs on explicit "clear" and at controller shutdown.

use log::{error, info};
use std::path::PathBuf;

use crate::artifacts::ArtifactDirectory;
use crate::labels::LabelStore;

#[derive(Debug, Clone)]
pub struct CleanupCoordinator {
    store: LabelStore,
    dirs: Vec<PathBuf>,
}

impl CleanupCoordinator {
    pub fn new(store: LabelStore, dirs: Vec<PathBuf>) -> Self {
        Self { store, dirs }
    }

    /// Reset the label document to the empty mapping and purge every managed
    /// directory. Per-entry failures are logged and never abort the rest.
    /// Idempotent; returns the number of entries removed, so a repeat call on
    /// an already-clean workspace reports zero.
    pub fn teardown(&self) -> usize {
        if let Err(err) = self.store.clear() {
            error!("failed to reset label document: {err:#}");
        }

        let mut removed = 0;
        for dir in &self.dirs {
            let purged = ArtifactDirectory::new(dir, "").purge();
            if purged > 0 {
                info!("cleared {purged} entries from {}", dir.display());
            }
            removed += purged;
        }
        removed
    }
}
