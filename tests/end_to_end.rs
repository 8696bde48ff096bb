//! End-to-end orchestration scenarios with shell-script worker doubles.

use std::{fs, path::PathBuf, time::Duration};

use uuid::Uuid;

use notelens::{AppController, PollOutcome, WorkerCommand, WorkspaceConfig};

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("notelens-e2e-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).unwrap();
    root
}

fn fast_config(root: &PathBuf) -> WorkspaceConfig {
    let mut config = WorkspaceConfig::rooted_at(root);
    config.poll_interval_ms = 10;
    config.job_timeout_secs = 10;
    config
}

async fn poll_until_settled(controller: &AppController) -> PollOutcome {
    for _ in 0..500 {
        match controller.poll_results().await {
            PollOutcome::Pending => tokio::time::sleep(Duration::from_millis(10)).await,
            settled => return settled,
        }
    }
    panic!("generation round never settled");
}

#[tokio::test]
async fn generation_round_reports_one_correlated_pair() {
    let root = temp_root();
    let mut config = fast_config(&root);

    // Worker double: deposits one artifact, then publishes its label.
    let labels_json = r#"{"image_out.png": {"label": "cat", "confidence": 0.92}}"#;
    let script = format!(
        ": > '{gen}/image_out.png' && printf '%s' '{labels_json}' > '{labels}'",
        gen = config.generated_dir.display(),
        labels = config.labels_path.display(),
    );
    config.generate_worker = WorkerCommand::new("/bin/sh", &["-c", &script]);

    let controller = AppController::new(config).unwrap();

    // Stage the user's input the way the upload dialog would.
    let source = root.join("cat.jpg");
    fs::write(&source, b"jpeg bytes").unwrap();
    let staged = controller.stage_image(&source).unwrap();
    assert!(staged.is_some());

    controller.run_generation().await.unwrap();

    match poll_until_settled(&controller).await {
        PollOutcome::Completed(pairs) => {
            assert_eq!(pairs.len(), 1);
            assert_eq!(pairs[0].file_name(), "image_out.png");
            assert_eq!(pairs[0].record.label, "cat");
            assert_eq!(pairs[0].record.confidence, Some(0.92));
        }
        other => panic!("expected Completed, got {other:?}"),
    }

    // Clearing afterwards empties every channel and is idempotent.
    let removed = controller.clear_all().await.unwrap();
    assert!(removed >= 2); // artifact + staged upload
    assert_eq!(controller.clear_all().await.unwrap(), 0);
    assert_eq!(
        fs::read_dir(&controller.config().generated_dir).unwrap().count(),
        0
    );
    assert_eq!(
        fs::read_dir(&controller.config().staging_dir).unwrap().count(),
        0
    );
    assert_eq!(
        fs::read_to_string(&controller.config().labels_path)
            .unwrap()
            .trim(),
        "{}"
    );

    fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn unlabeled_artifacts_fall_back_to_unknown() {
    let root = temp_root();
    let mut config = fast_config(&root);

    let labels_json = r#"{"image_a.png": {"label": "A4", "confidence": 0.8}}"#;
    let script = format!(
        ": > '{gen}/image_a.png' && : > '{gen}/image_b.png' && printf '%s' '{labels_json}' > '{labels}'",
        gen = config.generated_dir.display(),
        labels = config.labels_path.display(),
    );
    config.generate_worker = WorkerCommand::new("/bin/sh", &["-c", &script]);

    let controller = AppController::new(config).unwrap();
    controller.run_generation().await.unwrap();

    match poll_until_settled(&controller).await {
        PollOutcome::Completed(pairs) => {
            assert_eq!(pairs.len(), 2);
            assert_eq!(pairs[0].record.label, "A4");
            assert_eq!(pairs[1].record.label, "Unknown");
            assert!(pairs[1].record.confidence.is_none());
        }
        other => panic!("expected Completed, got {other:?}"),
    }

    controller.clear_all().await.unwrap();
    fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn worker_that_never_reports_times_out() {
    let root = temp_root();
    let mut config = fast_config(&root);
    config.job_timeout_secs = 1;
    config.generate_worker = WorkerCommand::new("/bin/sh", &["-c", "true"]);

    let controller = AppController::new(config).unwrap();
    controller.run_generation().await.unwrap();

    assert_eq!(poll_until_settled(&controller).await, PollOutcome::TimedOut);

    // A timed-out round does not block the next one.
    controller.run_generation().await.unwrap();
    controller.clear_all().await.unwrap();
    fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn upload_round_trip_through_worker_stdout() {
    let root = temp_root();
    let mut config = fast_config(&root);

    // Upload worker double: logs diagnostics, then prints the result record.
    let result_line = r#"{"images": ["out/input.png", "out/binary.png"], "text": ["Input Image", "Binary Image"], "message": "Prediction: G5"}"#;
    let script = format!("printf 'Image was successfully read.\\n%s\\n' '{result_line}'");
    config.upload_worker = WorkerCommand::new("/bin/sh", &["-c", &script]);

    let controller = AppController::new(config).unwrap();

    let source = root.join("cat.jpg");
    fs::write(&source, b"jpeg bytes").unwrap();
    let staged = controller.stage_image(&source).unwrap().unwrap();

    let outcome = controller.upload_and_process(&staged).await.unwrap();
    assert_eq!(outcome.message, "Prediction: G5");
    assert_eq!(outcome.images.len(), 2);
    assert_eq!(outcome.text[1], "Binary Image");

    fs::remove_dir_all(&root).ok();
}

#[tokio::test]
async fn uploading_a_staged_path_hands_the_worker_the_original_bytes() {
    let root = temp_root();
    let mut config = fast_config(&root);

    // Upload worker double: echoes the byte count of the file it was handed,
    // so a truncated input would be caught here.
    let script = r#"printf '{"images": [], "text": [], "message": "%s bytes"}\n' "$(wc -c < "$1")""#;
    config.upload_worker = WorkerCommand::new("/bin/sh", &["-c", script, "sh"]);

    let controller = AppController::new(config).unwrap();

    let source = root.join("cat.jpg");
    fs::write(&source, b"jpeg bytes").unwrap();
    let staged = controller.stage_image(&source).unwrap().unwrap();

    // The documented flow: stage first, then upload the staged path.
    let outcome = controller.upload_and_process(&staged).await.unwrap();
    assert_eq!(outcome.message, "10 bytes");
    assert_eq!(fs::read(&staged).unwrap(), b"jpeg bytes");

    fs::remove_dir_all(&root).ok();
}
