//! The shared label document: the only structured channel from the generation
//! worker back to the controller.

use anyhow::{Context, Result};
use log::debug;
use std::{collections::BTreeMap, fs, path::PathBuf};

use crate::models::LabelRecord;

/// Filename → label record, as stored in the label document.
pub type LabelMap = BTreeMap<String, LabelRecord>;

/// JSON document store with a tolerant reader and an atomic writer.
///
/// The worker writes this file without coordination, so a read can land on a
/// partially-written or stale document. Anything that does not parse as the
/// expected mapping (missing file, empty file, the legacy empty-array form,
/// torn JSON) reads as the empty mapping; the watcher treats that as "not
/// ready yet" and retries on its next tick.
#[derive(Debug, Clone)]
pub struct LabelStore {
    path: PathBuf,
}

impl LabelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn read(&self) -> LabelMap {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) => {
                debug!("label document {} not readable: {err}", self.path.display());
                return LabelMap::new();
            }
        };

        match serde_json::from_str::<LabelMap>(&contents) {
            Ok(map) => map,
            Err(err) => {
                debug!(
                    "label document {} not a label mapping yet: {err}",
                    self.path.display()
                );
                LabelMap::new()
            }
        }
    }

    /// Serialize and replace the document atomically (write to a sibling temp
    /// file, then rename), so a concurrent reader in this process never sees a
    /// torn write.
    pub fn write(&self, map: &LabelMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create label directory {}", parent.display())
            })?;
        }

        let serialized = serde_json::to_string_pretty(map)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, serialized)
            .with_context(|| format!("failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "failed to move {} into place at {}",
                tmp_path.display(),
                self.path.display()
            )
        })
    }

    /// Reset to the empty mapping. The empty form is always `{}`; the old
    /// empty-array form is accepted on read but never written.
    pub fn clear(&self) -> Result<()> {
        self.write(&LabelMap::new())
    }
}
