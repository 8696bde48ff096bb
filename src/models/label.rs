//! Label-related data models.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A classification result for one artifact, keyed externally by filename in
/// the label document. The generation worker writes `label` and `confidence`;
/// artifacts it never classified get the `unknown()` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl LabelRecord {
    /// Default record for an artifact with no entry in the label document.
    pub fn unknown() -> Self {
        Self {
            label: "Unknown".into(),
            confidence: None,
        }
    }
}

/// An artifact correlated with its label record by filename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledImage {
    pub path: PathBuf,
    pub record: LabelRecord,
}

impl LabeledImage {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_record_has_no_confidence() {
        let record = LabelRecord::unknown();
        assert_eq!(record.label, "Unknown");
        assert!(record.confidence.is_none());
    }

    #[test]
    fn record_round_trips_through_json() {
        let record = LabelRecord {
            label: "A4".into(),
            confidence: Some(0.92),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: LabelRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn missing_confidence_deserializes_as_none() {
        let record: LabelRecord = serde_json::from_str(r#"{"label": "C5"}"#).unwrap();
        assert_eq!(record.label, "C5");
        assert!(record.confidence.is_none());
    }
}
