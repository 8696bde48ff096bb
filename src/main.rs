//! Headless driver: runs one generation round (and optionally one upload)
//! against the configured workspace, then tears everything down. The desktop
//! shell consumes the same [`AppController`] surface.

use std::path::PathBuf;

use anyhow::Result;
use log::{info, warn};

use notelens::{AppController, PollOutcome, WorkspaceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => WorkspaceConfig::load(&PathBuf::from(path))?,
        None => WorkspaceConfig::default(),
    };
    let upload_input = args.next().map(PathBuf::from);

    info!("notelens starting in {}", config.root.display());
    let controller = AppController::new(config)?;

    if let Some(input) = upload_input {
        match controller.stage_image(&input)? {
            Some(staged) => {
                let outcome = controller.upload_and_process(&staged).await?;
                println!("{}", outcome.message);
                for (image, caption) in outcome.images.iter().zip(&outcome.text) {
                    println!("  {caption}: {}", image.display());
                }
            }
            None => warn!("nothing staged for {}; skipping upload", input.display()),
        }
    }

    controller.run_generation().await?;

    let poll_interval = controller.config().poll_interval();
    loop {
        match controller.poll_results().await {
            PollOutcome::Pending => tokio::time::sleep(poll_interval).await,
            PollOutcome::Completed(pairs) => {
                for pair in &pairs {
                    match pair.record.confidence {
                        Some(confidence) => println!(
                            "{}: {} ({:.1}%)",
                            pair.file_name(),
                            pair.record.label,
                            confidence * 100.0
                        ),
                        None => println!("{}: {}", pair.file_name(), pair.record.label),
                    }
                }
                break;
            }
            PollOutcome::TimedOut => {
                warn!("generation worker produced no results before the deadline");
                break;
            }
            PollOutcome::Idle => break,
        }
    }

    controller.clear_all().await?;
    Ok(())
}
