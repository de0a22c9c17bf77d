/// User-editable labels keyed by detection.

use super::working_set::WorkingSet;
use crate::detection::{Detection, DetectionId, UNKNOWN_LABEL};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Default, Clone)]
pub struct LabelMap {
    entries: HashMap<DetectionId, String>,
}

impl LabelMap {
    /// Discard every entry and seed one per detection from its top label.
    pub fn reseed(&mut self, detections: &[Detection]) {
        self.entries = detections
            .iter()
            .map(|d| (d.id(), d.top_label().to_string()))
            .collect();
    }

    /// Drop entries for detections no longer live. Surviving edits stay.
    pub fn prune(&mut self, live: &WorkingSet) {
        self.entries.retain(|id, _| live.contains(*id));
    }

    pub fn get(&self, id: DetectionId) -> &str {
        self.entries
            .get(&id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Overwrite the label for `id`. Returns true only if the text changed.
    ///
    /// Entries are never created here; editing an id that is not live is
    /// ignored.
    pub fn set(&mut self, id: DetectionId, text: &str) -> bool {
        match self.entries.get_mut(&id) {
            Some(current) if *current == text => false,
            Some(current) => {
                *current = text.to_string();
                true
            }
            None => {
                warn!(%id, "Ignoring label edit for detection that is not live");
                false
            }
        }
    }

    pub fn contains(&self, id: DetectionId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{assign_ids, Generation, LabelCandidate, RawDetection};
    use crate::geometry::NormalizedBox;

    fn detections(labels: &[Option<&str>]) -> Vec<Detection> {
        let raw = labels
            .iter()
            .map(|l| RawDetection {
                bbox: NormalizedBox::new(0.0, 0.0, 0.5, 0.5),
                labels: l
                    .map(|t| vec![LabelCandidate { text: t.to_string(), confidence: 0.7 }])
                    .unwrap_or_default(),
            })
            .collect();
        assign_ids(Generation::default().next(), raw)
    }

    #[test]
    fn reseed_uses_top_labels() {
        let dets = detections(&[Some("cup"), None]);
        let mut labels = LabelMap::default();
        labels.reseed(&dets);

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get(dets[0].id()), "cup");
        assert_eq!(labels.get(dets[1].id()), UNKNOWN_LABEL);
    }

    #[test]
    fn set_reports_changes_only() {
        let dets = detections(&[Some("cup")]);
        let mut labels = LabelMap::default();
        labels.reseed(&dets);

        assert!(!labels.set(dets[0].id(), "cup"));
        assert!(labels.set(dets[0].id(), "mug"));
        assert_eq!(labels.get(dets[0].id()), "mug");
    }

    #[test]
    fn set_never_creates_entries() {
        let dets = detections(&[Some("cup")]);
        let mut labels = LabelMap::default();
        assert!(!labels.set(dets[0].id(), "mug"));
        assert!(labels.is_empty());
        assert_eq!(labels.get(dets[0].id()), UNKNOWN_LABEL);
    }

    #[test]
    fn prune_keeps_surviving_edits() {
        let dets = detections(&[Some("a"), Some("b"), Some("c")]);
        let mut labels = LabelMap::default();
        labels.reseed(&dets);
        labels.set(dets[2].id(), "edited");

        let mut live = WorkingSet::default();
        live.reset(dets.clone());
        live.remove(dets[0].id());
        labels.prune(&live);

        assert!(!labels.contains(dets[0].id()));
        assert_eq!(labels.get(dets[1].id()), "b");
        assert_eq!(labels.get(dets[2].id()), "edited");
    }
}
