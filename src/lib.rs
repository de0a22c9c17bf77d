//! Detection annotation and cropping core.
//!
//! Takes a photo and a detector's normalized, bottom-left-origin boxes and
//! keeps three things consistent while the user works:
//!
//! - pixel rectangles for display and for cropping ([`geometry`]);
//! - the published, content-deduplicated crops ([`preprocess`], [`dedup`]);
//! - per-detection editable labels ([`session`]).
//!
//! [`AnnotationSession`] owns all mutable state. Detector runs happen off
//! that state ([`inference`]) and are applied only if they still belong to
//! the latest acquisition. Saving goes through [`persist`].

pub mod config;
pub mod dedup;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod hash;
pub mod inference;
pub mod persist;
pub mod preprocess;
pub mod session;

pub use config::{Config, SessionConfig};
pub use dedup::dedupe;
pub use detection::{Detection, DetectionId, Generation, LabelCandidate, RawDetection, UNKNOWN_LABEL};
pub use error::AppError;
pub use geometry::{to_display_rect, to_pixel_rect, NormalizedBox, Orientation, PixelRect, Size};
pub use inference::{run_detection, spawn_detection, Detector, PendingResult, RecordedDetector};
pub use persist::{save_crops, DirectoryStore, MediaStore, SaveOutcome, SaveReport};
pub use preprocess::{crop, decode_image, Image};
pub use session::{AnnotationSession, Completion, Crop, OverlayBox};
