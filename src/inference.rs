/// Detector boundary: running the model off the state thread and tagging
/// its result with the acquisition it belongs to.

use crate::detection::{Generation, RawDetection};
use crate::error::AppError;
use crate::preprocess::Image;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Anything that turns an upright image into detector records.
pub trait Detector: Send + Sync + 'static {
    fn detect(&self, image: &Image) -> Result<Vec<RawDetection>, AppError>;
}

impl<F> Detector for F
where
    F: Fn(&Image) -> Result<Vec<RawDetection>, AppError> + Send + Sync + 'static,
{
    fn detect(&self, image: &Image) -> Result<Vec<RawDetection>, AppError> {
        self(image)
    }
}

/// A finished detector run, not yet checked for staleness.
#[derive(Debug)]
pub struct PendingResult {
    pub generation: Generation,
    pub outcome: Result<Vec<RawDetection>, AppError>,
}

/// Run `detector` on the blocking pool; inference is CPU-bound.
pub fn spawn_detection<D>(
    detector: Arc<D>,
    image: Arc<Image>,
    generation: Generation,
) -> JoinHandle<PendingResult>
where
    D: Detector + ?Sized,
{
    tokio::task::spawn_blocking(move || PendingResult {
        generation,
        outcome: detector.detect(&image),
    })
}

/// Like [`spawn_detection`], folding a panicked or cancelled task into a
/// detector error so the caller always gets a result to complete.
pub async fn run_detection<D>(
    detector: Arc<D>,
    image: Arc<Image>,
    generation: Generation,
) -> PendingResult
where
    D: Detector + ?Sized,
{
    match spawn_detection(detector, image, generation).await {
        Ok(pending) => pending,
        Err(e) => PendingResult {
            generation,
            outcome: Err(AppError::Detector(format!("Detector task failed: {e}"))),
        },
    }
}

/// Replays a detector result recorded as JSON (an array of records).
#[derive(Debug, Clone, Default)]
pub struct RecordedDetector {
    detections: Vec<RawDetection>,
}

impl RecordedDetector {
    pub fn new(detections: Vec<RawDetection>) -> Self {
        Self { detections }
    }

    pub fn from_json(data: &[u8]) -> Result<Self, AppError> {
        let detections = serde_json::from_slice(data)
            .map_err(|e| AppError::Detector(format!("Invalid detections JSON: {e}")))?;
        Ok(Self { detections })
    }
}

impl Detector for RecordedDetector {
    fn detect(&self, _image: &Image) -> Result<Vec<RawDetection>, AppError> {
        Ok(self.detections.clone())
    }
}
