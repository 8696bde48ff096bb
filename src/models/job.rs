//! Generation job tracking.
//!
//! The async worker has no return channel, so completion is inferred by the
//! watcher. The job handle makes that inference explicit and bounded: a job is
//! `Pending` from launch, transitions exactly once to `Completed` (with the
//! correlated results) or `TimedOut`, and acts as the ownership token that
//! serializes teardown against an in-flight watch.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::label::LabeledImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Completed,
    TimedOut,
}

/// What a caller sees when polling for results.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// No job has been started (or the last one was cleared).
    Idle,
    Pending,
    Completed(Vec<LabeledImage>),
    TimedOut,
}

#[derive(Debug)]
struct JobState {
    status: JobStatus,
    results: Vec<LabeledImage>,
}

/// Shared handle for one generation round. Cloneable; the watcher task and the
/// controller observe the same state.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    state: Arc<Mutex<JobState>>,
}

impl GenerationJob {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            state: Arc::new(Mutex::new(JobState {
                status: JobStatus::Pending,
                results: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, JobState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn status(&self) -> JobStatus {
        self.lock().status
    }

    /// Transition to `Completed`. Returns false if the job already left
    /// `Pending`, so completion is delivered at most once.
    pub fn complete(&self, results: Vec<LabeledImage>) -> bool {
        let mut state = self.lock();
        if state.status != JobStatus::Pending {
            return false;
        }
        state.status = JobStatus::Completed;
        state.results = results;
        true
    }

    /// Transition to `TimedOut`. Same single-transition guard as `complete`.
    pub fn time_out(&self) -> bool {
        let mut state = self.lock();
        if state.status != JobStatus::Pending {
            return false;
        }
        state.status = JobStatus::TimedOut;
        true
    }

    pub fn outcome(&self) -> PollOutcome {
        let state = self.lock();
        match state.status {
            JobStatus::Pending => PollOutcome::Pending,
            JobStatus::Completed => PollOutcome::Completed(state.results.clone()),
            JobStatus::TimedOut => PollOutcome::TimedOut,
        }
    }
}

impl Default for GenerationJob {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::label::LabelRecord;
    use std::path::PathBuf;

    fn sample_results() -> Vec<LabeledImage> {
        vec![LabeledImage {
            path: PathBuf::from("image_out.png"),
            record: LabelRecord {
                label: "cat".into(),
                confidence: Some(0.92),
            },
        }]
    }

    #[test]
    fn new_job_is_pending() {
        let job = GenerationJob::new();
        assert_eq!(job.status(), JobStatus::Pending);
        assert_eq!(job.outcome(), PollOutcome::Pending);
    }

    #[test]
    fn complete_transitions_exactly_once() {
        let job = GenerationJob::new();
        assert!(job.complete(sample_results()));
        assert!(!job.complete(Vec::new()));
        match job.outcome() {
            PollOutcome::Completed(results) => assert_eq!(results, sample_results()),
            other => panic!("expected Completed, got {other:?}"),
        }
    }

    #[test]
    fn time_out_does_not_override_completion() {
        let job = GenerationJob::new();
        assert!(job.complete(sample_results()));
        assert!(!job.time_out());
        assert_eq!(job.status(), JobStatus::Completed);
    }

    #[test]
    fn complete_does_not_override_time_out() {
        let job = GenerationJob::new();
        assert!(job.time_out());
        assert!(!job.complete(sample_results()));
        assert_eq!(job.outcome(), PollOutcome::TimedOut);
    }
}
