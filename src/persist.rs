/// Saving published crops to a media store.
///
/// Each crop is stored independently; one failure is logged and reported
/// but never stops the rest of the batch.

use crate::detection::DetectionId;
use crate::error::AppError;
use crate::preprocess::Image;
use crate::session::Crop;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Destination for saved crops. Returns where the image ended up.
pub trait MediaStore: Send + Sync + 'static {
    fn store(&self, image: &Image) -> Result<String, AppError>;
}

/// Writes each crop as `<uuid>.png` under a directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            AppError::Persistence(format!("Failed to create {}: {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl MediaStore for DirectoryStore {
    fn store(&self, image: &Image) -> Result<String, AppError> {
        let path = self.root.join(format!("{}.png", Uuid::new_v4()));
        image
            .pixels()
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| AppError::Persistence(format!("Failed to write {}: {e}", path.display())))?;
        Ok(path.display().to_string())
    }
}

#[derive(Debug)]
pub struct SaveOutcome {
    pub detection: DetectionId,
    pub result: Result<String, AppError>,
}

/// Per-crop results, in the order the crops were given.
#[derive(Debug, Default)]
pub struct SaveReport {
    pub outcomes: Vec<SaveOutcome>,
}

impl SaveReport {
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.saved()
    }

    pub fn all_saved(&self) -> bool {
        self.failed() == 0
    }

    pub fn locations(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(String::as_str))
            .collect()
    }
}

/// Store every crop, each on the blocking pool, and report each outcome.
pub async fn save_crops<S>(store: Arc<S>, crops: &[Crop]) -> SaveReport
where
    S: MediaStore + ?Sized,
{
    let mut handles = Vec::with_capacity(crops.len());

    for crop in crops {
        let store = store.clone();
        let image = crop.image.clone();
        handles.push(tokio::task::spawn_blocking(move || store.store(&image)));
    }

    let results = futures::future::join_all(handles).await;

    let outcomes = crops
        .iter()
        .zip(results)
        .map(|(crop, joined)| {
            let result = joined.map_err(AppError::from).and_then(|r| r);
            if let Err(e) = &result {
                warn!(id = %crop.detection, error = %e, "Failed to save crop");
            }
            SaveOutcome {
                detection: crop.detection,
                result,
            }
        })
        .collect();

    let report = SaveReport { outcomes };
    info!(saved = report.saved(), failed = report.failed(), "Crop batch stored");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::Generation;
    use crate::geometry::Orientation;
    use image::{Rgba, RgbaImage};

    fn crop(index: usize, width: u32) -> Crop {
        Crop {
            detection: DetectionId {
                generation: Generation::default().next(),
                index,
            },
            image: Image::from_upright(
                RgbaImage::from_pixel(width, 3, Rgba([index as u8, 0, 0, 255])),
                Orientation::Up,
            ),
        }
    }

    /// Refuses narrow images.
    struct PickyStore;

    impl MediaStore for PickyStore {
        fn store(&self, image: &Image) -> Result<String, AppError> {
            if image.width() < 3 {
                return Err(AppError::Persistence("too small".to_string()));
            }
            Ok(format!("mem://{}", image.width()))
        }
    }

    #[tokio::test]
    async fn failure_does_not_abort_batch() {
        let crops = vec![crop(0, 4), crop(1, 2), crop(2, 5)];
        let report = save_crops(Arc::new(PickyStore), &crops).await;

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.saved(), 2);
        assert_eq!(report.failed(), 1);
        assert!(!report.all_saved());
        assert!(matches!(report.outcomes[1].result, Err(AppError::Persistence(_))));
        assert_eq!(report.outcomes[1].detection.index, 1);
        assert_eq!(report.locations(), vec!["mem://4", "mem://5"]);
    }

    #[tokio::test]
    async fn directory_store_writes_pngs() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DirectoryStore::new(dir.path().join("out")).unwrap());
        let crops = vec![crop(0, 4), crop(1, 6)];

        let report = save_crops(store.clone(), &crops).await;
        assert!(report.all_saved());

        for (location, original) in report.locations().iter().zip(&crops) {
            let reloaded = image::open(location).unwrap().to_rgba8();
            assert_eq!(&reloaded, original.image.pixels());
        }
        assert_eq!(std::fs::read_dir(store.root()).unwrap().count(), 2);
    }

    #[tokio::test]
    async fn empty_batch_is_trivially_saved() {
        let report = save_crops(Arc::new(PickyStore), &[]).await;
        assert!(report.all_saved());
        assert!(report.outcomes.is_empty());
    }
}
