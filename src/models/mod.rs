pub mod job;
pub mod label;
pub mod upload;

pub use job::{GenerationJob, JobStatus, PollOutcome};
pub use label::{LabelRecord, LabeledImage};
pub use upload::UploadOutcome;
