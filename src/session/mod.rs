/// Annotation session: the single owner of image, live detections, labels and crops.
///
/// Every state change goes through acquisition, `reset` or `remove`, and each
/// one ends in a resync, so the published crops and the label map always
/// describe exactly the live detections.

pub mod labels;
pub mod working_set;

pub use labels::LabelMap;
pub use working_set::WorkingSet;

use crate::config::SessionConfig;
use crate::dedup::dedupe_by;
use crate::detection::{assign_ids, Detection, DetectionId, Generation, RawDetection};
use crate::error::AppError;
use crate::geometry::{to_display_rect, to_pixel_rect, PixelRect, Size};
use crate::inference::PendingResult;
use crate::preprocess::{crop, decode_image, resize_to, Image};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Caption position relative to the box's top-left corner on screen.
const CAPTION_OFFSET: (f64, f64) = (20.0, 10.0);

/// A published crop and the first detection that produced its pixels.
#[derive(Debug, Clone)]
pub struct Crop {
    pub detection: DetectionId,
    pub image: Image,
}

/// What happened to a detector result handed to [`AnnotationSession::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied { detections: usize },
    /// A newer acquisition superseded the result; nothing changed.
    Stale,
}

/// One box to draw over the displayed photo.
#[derive(Debug, Clone, Serialize)]
pub struct OverlayBox {
    pub id: DetectionId,
    pub rect: PixelRect,
    pub label: String,
    pub caption_anchor: [f64; 2],
}

#[derive(Debug, Default)]
pub struct AnnotationSession {
    config: SessionConfig,
    generation: Generation,
    image: Option<Arc<Image>>,
    /// What crops are cut from: the upright image, or its canvas-sized copy.
    crop_source: Option<Arc<Image>>,
    working_set: WorkingSet,
    labels: LabelMap,
    crops: Vec<Crop>,
}

impl AnnotationSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Start acquiring a new photo: clears everything derived from the
    /// previous one and returns the token its results must carry.
    pub fn begin_acquisition(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.clear_state();
        debug!(generation = %self.generation, "Acquisition started");
        self.generation
    }

    /// The user backed out of the picker; stay in the "no image" state.
    pub fn cancel_acquisition(&mut self, generation: Generation) {
        if self.is_current(generation) {
            self.clear();
        }
    }

    /// Decode and attach acquired bytes.
    ///
    /// Undecodable data is reported and leaves the session empty. Returns the
    /// attached image to hand to the detector, or `None` if `generation` is
    /// no longer current.
    pub fn load(
        &mut self,
        generation: Generation,
        data: &[u8],
    ) -> Result<Option<Arc<Image>>, AppError> {
        if !self.is_current(generation) {
            debug!(%generation, "Dropping bytes for superseded acquisition");
            return Ok(None);
        }
        let image = decode_image(data)?;
        self.attach_image(generation, image)
    }

    /// Attach an already decoded upright image.
    pub fn attach_image(
        &mut self,
        generation: Generation,
        image: Image,
    ) -> Result<Option<Arc<Image>>, AppError> {
        if !self.is_current(generation) {
            debug!(%generation, "Dropping image for superseded acquisition");
            return Ok(None);
        }

        let image = Arc::new(image);
        let crop_source = match self.config.crop_canvas {
            Some((w, h)) => Arc::new(resize_to(&image, w, h)?),
            None => image.clone(),
        };

        debug!(
            %generation,
            width = image.width(),
            height = image.height(),
            orientation = ?image.orientation(),
            "Image attached"
        );

        // Derived state belongs to the image it was cut from; it stays empty
        // until this image's detector result arrives.
        if self.image.is_some() {
            debug!(%generation, "Replacing attached image, dropping its detections");
        }
        self.working_set.reset(Vec::new());
        self.labels.clear();
        self.crops.clear();
        self.image = Some(image.clone());
        self.crop_source = Some(crop_source);
        Ok(Some(image))
    }

    /// Apply a finished detector run if it still belongs to the current photo.
    ///
    /// A failed run counts as "no detections".
    pub fn complete(&mut self, pending: PendingResult) -> Completion {
        if !self.is_current(pending.generation) || self.image.is_none() {
            debug!(
                result = %pending.generation,
                current = %self.generation,
                "Discarding stale detection result"
            );
            return Completion::Stale;
        }

        let raw = match pending.outcome {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Detector failed, showing no detections");
                Vec::new()
            }
        };

        self.apply_detections(raw)
    }

    fn apply_detections(&mut self, raw: Vec<RawDetection>) -> Completion {
        let detections = assign_ids(self.generation, raw);
        let count = detections.len();
        self.reset(detections);

        info!(
            generation = %self.generation,
            detections = count,
            crops = self.crops.len(),
            "Detection result applied"
        );
        Completion::Applied { detections: count }
    }

    /// Replace the live detections and reseed every label from its top candidate.
    pub fn reset(&mut self, detections: Vec<Detection>) {
        self.working_set.reset(detections);
        self.labels.reseed(self.working_set.current());
        self.resync();
    }

    /// Discard one detection. Unknown ids are a no-op and return false.
    pub fn remove(&mut self, id: DetectionId) -> bool {
        if !self.working_set.remove(id) {
            return false;
        }
        self.resync();
        true
    }

    /// The "Reset" action: forget the photo and anything still in flight.
    pub fn clear(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.clear_state();
        self.generation
    }

    fn clear_state(&mut self) {
        self.image = None;
        self.crop_source = None;
        self.working_set.reset(Vec::new());
        self.labels.clear();
        self.crops.clear();
    }

    fn resync(&mut self) {
        let candidates: Vec<Crop> = match &self.crop_source {
            Some(source) => {
                let target = source.size();
                self.working_set
                    .current()
                    .iter()
                    .filter_map(|d| {
                        let rect = to_pixel_rect(d.bbox(), target);
                        match crop(source, &rect) {
                            Some(image) => Some(Crop {
                                detection: d.id(),
                                image,
                            }),
                            None => {
                                debug!(id = %d.id(), ?rect, "Skipping detection outside the frame");
                                None
                            }
                        }
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        let cropped = candidates.len();
        self.crops = dedupe_by(candidates, |c| &c.image);
        self.labels.prune(&self.working_set);

        debug!(
            live = self.working_set.len(),
            cropped,
            published = self.crops.len(),
            "Derived state resynced"
        );
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_deref()
    }

    pub fn detections(&self) -> &[Detection] {
        self.working_set.current()
    }

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    pub fn crop_images(&self) -> Vec<Image> {
        self.crops.iter().map(|c| c.image.clone()).collect()
    }

    pub fn label(&self, id: DetectionId) -> &str {
        self.labels.get(id)
    }

    /// Edit a live detection's label. Returns true if the text changed.
    pub fn set_label(&mut self, id: DetectionId, text: &str) -> bool {
        self.labels.set(id, text)
    }

    pub fn label_map(&self) -> &LabelMap {
        &self.labels
    }

    /// Current labels in display order.
    pub fn labels(&self) -> Vec<(DetectionId, String)> {
        self.working_set
            .current()
            .iter()
            .map(|d| (d.id(), self.labels.get(d.id()).to_string()))
            .collect()
    }

    /// Boxes for a canvas showing the photo aspect-fit and centered.
    pub fn overlay(&self, canvas: Size) -> Vec<OverlayBox> {
        let Some(image) = &self.image else {
            return Vec::new();
        };
        let image_size = image.size();

        self.working_set
            .current()
            .iter()
            .map(|d| {
                let rect = to_display_rect(d.bbox(), image_size, canvas);
                OverlayBox {
                    id: d.id(),
                    rect,
                    label: self.labels.get(d.id()).to_string(),
                    caption_anchor: [rect.x + CAPTION_OFFSET.0, rect.y + CAPTION_OFFSET.1],
                }
            })
            .collect()
    }
}
