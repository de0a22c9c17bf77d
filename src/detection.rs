/// Detector output and per-detection identity.

use crate::geometry::NormalizedBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown when a detection carries no candidates.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Acquisition counter. Every new photo (or a reset) starts a new generation;
/// results tagged with an older one are stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of one detection: the generation it came from and its
/// position in that detector result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DetectionId {
    pub generation: Generation,
    pub index: usize,
}

impl fmt::Display for DetectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}-{}", self.generation, self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCandidate {
    #[serde(alias = "identifier")]
    pub text: String,
    pub confidence: f32,
}

/// One record as the detector reports it, before identity is assigned.
///
/// Candidates are expected in descending confidence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    #[serde(alias = "boundingBox", alias = "bounding_box")]
    pub bbox: NormalizedBox,
    #[serde(default)]
    pub labels: Vec<LabelCandidate>,
}

/// A detection admitted to a session. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    id: DetectionId,
    bbox: NormalizedBox,
    labels: Vec<LabelCandidate>,
}

impl Detection {
    pub fn new(id: DetectionId, bbox: NormalizedBox, labels: Vec<LabelCandidate>) -> Self {
        Self { id, bbox, labels }
    }

    pub fn id(&self) -> DetectionId {
        self.id
    }

    pub fn bbox(&self) -> &NormalizedBox {
        &self.bbox
    }

    pub fn labels(&self) -> &[LabelCandidate] {
        &self.labels
    }

    /// First candidate's text, or [`UNKNOWN_LABEL`].
    pub fn top_label(&self) -> &str {
        self.labels
            .first()
            .map(|c| c.text.as_str())
            .unwrap_or(UNKNOWN_LABEL)
    }
}

/// Give each raw record an id scoped to `generation`, preserving order.
pub fn assign_ids(generation: Generation, raw: Vec<RawDetection>) -> Vec<Detection> {
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| {
            let id = DetectionId {
                generation,
                index: i,
            };
            Detection::new(id, r.bbox, r.labels)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(label: Option<&str>) -> RawDetection {
        RawDetection {
            bbox: NormalizedBox::new(0.1, 0.1, 0.2, 0.2),
            labels: label
                .map(|l| {
                    vec![
                        LabelCandidate { text: l.to_string(), confidence: 0.9 },
                        LabelCandidate { text: "other".to_string(), confidence: 0.1 },
                    ]
                })
                .unwrap_or_default(),
        }
    }

    #[test]
    fn top_label_falls_back_to_unknown() {
        let dets = assign_ids(Generation::default().next(), vec![raw(Some("cat")), raw(None)]);
        assert_eq!(dets[0].top_label(), "cat");
        assert_eq!(dets[1].top_label(), UNKNOWN_LABEL);
    }

    #[test]
    fn ids_are_unique_and_generation_scoped() {
        let g1 = Generation::default().next();
        let g2 = g1.next();
        let a = assign_ids(g1, vec![raw(None), raw(None)]);
        let b = assign_ids(g2, vec![raw(None)]);
        assert_ne!(a[0].id(), a[1].id());
        assert_ne!(a[0].id(), b[0].id());
        assert_eq!(a[1].id().to_string(), "g1-1");
    }

    #[test]
    fn index_is_the_position_in_the_result() {
        let dets = assign_ids(Generation::default(), vec![raw(None); 300]);
        for (i, d) in dets.iter().enumerate() {
            assert_eq!(d.id().index, i);
        }
    }

    #[test]
    fn parses_detector_json() {
        let json = r#"[
            {"boundingBox": {"x": 0.1, "y": 0.2, "width": 0.3, "height": 0.4},
             "labels": [{"identifier": "dog", "confidence": 0.8}]},
            {"bbox": {"x": 0.0, "y": 0.0, "width": 1.0, "height": 1.0}}
        ]"#;
        let parsed: Vec<RawDetection> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].labels[0].text, "dog");
        assert!(parsed[1].labels.is_empty());
    }
}
