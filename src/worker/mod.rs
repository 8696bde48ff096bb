pub mod error;
pub mod launcher;
pub mod upload;

pub use error::WorkerError;
pub use launcher::ProcessLauncher;
pub use upload::UploadPipeline;
