//! Wire format for the synchronous upload worker's final output line.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parsed result of one upload run. `text[i]` captions `images[i]`; the worker
/// may omit `text` entirely, which only passes the shape guard when `images`
/// is empty too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub images: Vec<PathBuf>,
    #[serde(default)]
    pub text: Vec<String>,
    pub message: String,
}

impl UploadOutcome {
    /// Guard against the images/text length mismatch the contract forbids.
    pub fn check_shape(&self) -> Result<(), String> {
        if self.images.len() != self.text.len() {
            return Err(format!(
                "images/text length mismatch: {} images, {} captions",
                self.images.len(),
                self.text.len()
            ));
        }
        Ok(())
    }
}
