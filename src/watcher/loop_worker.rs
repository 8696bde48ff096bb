//! The polling loop that infers generation-worker completion.
//!
//! There is no completion signal from the worker, only side effects: artifact
//! files appearing and the label document filling in. The heuristic is that
//! both channels are non-empty at the same tick. A tick that finds anything
//! else (including unreadable or half-written state) is simply "not ready
//! yet"; failures are never fatal here.

use log::{info, warn};
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::artifacts::ArtifactDirectory;
use crate::labels::{LabelMap, LabelStore};
use crate::models::{GenerationJob, LabelRecord, LabeledImage};

use std::path::PathBuf;

pub async fn watch_loop(
    job: GenerationJob,
    artifacts: ArtifactDirectory,
    store: LabelStore,
    poll_interval: Duration,
    timeout: Duration,
    cancel_token: CancellationToken,
) {
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let deadline = Instant::now() + timeout;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if Instant::now() >= deadline {
                    if job.time_out() {
                        warn!(
                            "generation job {} timed out after {:?}; worker never filled both channels",
                            job.id, timeout
                        );
                    }
                    break;
                }

                let listing = artifacts.list();
                let labels = store.read();
                if listing.is_empty() || labels.is_empty() {
                    continue;
                }

                let pairs = correlate(listing, &labels);
                if job.complete(pairs) {
                    info!("generation job {} completed", job.id);
                }
                break;
            }
            _ = cancel_token.cancelled() => {
                info!("watch loop for job {} cancelled", job.id);
                break;
            }
        }
    }
}

/// Pair each artifact with its label record by filename. Artifacts the worker
/// never labeled get the "Unknown" record with no confidence.
pub fn correlate(listing: Vec<PathBuf>, labels: &LabelMap) -> Vec<LabeledImage> {
    listing
        .into_iter()
        .map(|path| {
            let record = path
                .file_name()
                .and_then(|name| labels.get(name.to_string_lossy().as_ref()))
                .cloned()
                .unwrap_or_else(LabelRecord::unknown);
            LabeledImage { path, record }
        })
        .collect()
}
