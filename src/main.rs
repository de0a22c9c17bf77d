/// Command-line front end for the annotation core.
///
/// Usage: crop-annotator <image> <detections.json> [drop-index ...]
///
/// Loads the photo, replays the recorded detector output, drops the listed
/// detections (indices into the detector result), prints overlay and labels
/// as JSON on stdout and saves the deduplicated crops.

use crop_annotator::{
    run_detection, save_crops, AnnotationSession, AppError, Completion, Config, DirectoryStore,
    RecordedDetector,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Args {
    image_path: String,
    detections_path: String,
    drop: Vec<usize>,
}

fn parse_args() -> Result<Args, AppError> {
    let mut args = std::env::args().skip(1);
    let usage = || AppError::Config("usage: crop-annotator <image> <detections.json> [drop-index ...]".to_string());

    let image_path = args.next().ok_or_else(usage)?;
    let detections_path = args.next().ok_or_else(usage)?;
    let drop = args
        .map(|a| {
            a.parse::<usize>()
                .map_err(|_| AppError::Config(format!("Invalid detection index: {a}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Args {
        image_path,
        detections_path,
        drop,
    })
}

fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the JSON result.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()
        .map_err(|e| AppError::Internal(format!("Failed to build runtime: {e}")))?;

    runtime.block_on(async_main(config, args))
}

async fn async_main(config: Config, args: Args) -> Result<(), AppError> {
    info!(
        image = %args.image_path,
        detections = %args.detections_path,
        output = %config.output_dir.display(),
        crop_canvas = ?config.crop_canvas,
        "Starting annotation run"
    );

    let mut session = AnnotationSession::new(config.session());
    let generation = session.begin_acquisition();

    let bytes = std::fs::read(&args.image_path)?;
    let Some(image) = session.load(generation, &bytes)? else {
        return Err(AppError::Internal("Acquisition superseded".to_string()));
    };

    let detector = Arc::new(RecordedDetector::from_json(&std::fs::read(&args.detections_path)?)?);
    let pending = run_detection(detector, image, generation).await;
    if let Completion::Stale = session.complete(pending) {
        warn!("Detection result arrived for a superseded image");
    }

    // Resolve indices first; removal shifts positions.
    let to_drop: Vec<_> = args
        .drop
        .iter()
        .filter_map(|&i| session.detections().get(i).map(|d| d.id()))
        .collect();
    for id in to_drop {
        session.remove(id);
    }

    let store = Arc::new(DirectoryStore::new(&config.output_dir)?);
    let report = save_crops(store, session.crops()).await;

    let saved: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(location) => json!({ "detection": o.detection, "location": location }),
            Err(e) => json!({ "detection": o.detection, "error": e.to_string() }),
        })
        .collect();

    let (width, height) = session
        .image()
        .map(|img| (img.width(), img.height()))
        .unwrap_or_default();

    let output = json!({
        "image": { "width": width, "height": height },
        "overlay": session.overlay(config.display_size),
        "labels": session
            .labels()
            .into_iter()
            .map(|(id, label)| json!({ "detection": id, "label": label }))
            .collect::<Vec<_>>(),
        "crops": saved,
    });

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| AppError::Internal(format!("Failed to render output: {e}")))?;
    println!("{rendered}");

    if !report.all_saved() {
        return Err(AppError::Persistence(format!(
            "{} of {} crops failed to save",
            report.failed(),
            report.outcomes.len()
        )));
    }

    Ok(())
}
