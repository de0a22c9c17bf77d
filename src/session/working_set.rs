/// Live detections for the current photo.

use crate::detection::{Detection, DetectionId};

/// Ordered detections still on screen.
///
/// Replaced wholesale by [`WorkingSet::reset`]; otherwise it only shrinks.
#[derive(Debug, Default, Clone)]
pub struct WorkingSet {
    detections: Vec<Detection>,
}

impl WorkingSet {
    pub fn reset(&mut self, detections: Vec<Detection>) {
        self.detections = detections;
    }

    /// Remove the detection with `id`. Returns false if it was not present.
    pub fn remove(&mut self, id: DetectionId) -> bool {
        match self.detections.iter().position(|d| d.id() == id) {
            Some(pos) => {
                // `remove`, not `swap_remove`: order is part of the contract.
                self.detections.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> &[Detection] {
        &self.detections
    }

    pub fn contains(&self, id: DetectionId) -> bool {
        self.detections.iter().any(|d| d.id() == id)
    }

    pub fn get(&self, id: DetectionId) -> Option<&Detection> {
        self.detections.iter().find(|d| d.id() == id)
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}
