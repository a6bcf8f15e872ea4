use serde::{Deserialize, Serialize};

/// Frame-count lower bound given to a freshly added input.
pub const DEFAULT_MIN_FRAME_COUNT: i64 = 0;
/// Frame-count upper bound given to a freshly added input.
pub const DEFAULT_MAX_FRAME_COUNT: i64 = 1_000_000;
/// Duration lower bound given to a freshly added input. In simple mode this is the
/// fixed display time of the input.
pub const DEFAULT_MIN_DURATION_SECONDS: f64 = 1.0;
/// Duration upper bound given to a freshly added input.
pub const DEFAULT_MAX_DURATION_SECONDS: f64 = 5.0;
/// Output width of a placeholder record.
pub const DEFAULT_OUTPUT_WIDTH: i64 = 256;
/// Output height of a placeholder record.
pub const DEFAULT_OUTPUT_HEIGHT: i64 = 256;

/// A sequence configuration as held by the backend.
///
/// One record produces one output stream by cycling through its ordered inputs.
/// The backend vocabulary (`sequence_id`, `output_topic`, ...) is accepted as an
/// alias when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceRecord {
    /// Unique identifier of the record.
    #[serde(alias = "sequence_id")]
    pub id: String,
    /// Whether the backend is actively producing the output.
    #[serde(default)]
    pub enabled: bool,
    /// Key of the produced output stream.
    #[serde(alias = "output_topic")]
    pub output_key: String,
    #[serde(alias = "output_img_width_pixels")]
    pub output_width: i64,
    #[serde(alias = "output_img_height_pixels")]
    pub output_height: i64,
    /// Ordered inputs. Position is the only identity an entry has.
    #[serde(default)]
    pub inputs: Vec<InputEntry>,
}

/// One source-to-timing binding inside a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEntry {
    #[serde(alias = "topic")]
    pub source_key: String,
    pub min_frame_count: i64,
    pub max_frame_count: i64,
    #[serde(alias = "min_duration_s")]
    pub min_duration_seconds: f64,
    #[serde(alias = "max_duration_s")]
    pub max_duration_seconds: f64,
}

impl InputEntry {
    /// Builds an entry for `source_key` using the simple fixed-duration defaults.
    pub fn with_defaults(source_key: impl Into<String>) -> Self {
        Self {
            source_key: source_key.into(),
            min_frame_count: DEFAULT_MIN_FRAME_COUNT,
            max_frame_count: DEFAULT_MAX_FRAME_COUNT,
            min_duration_seconds: DEFAULT_MIN_DURATION_SECONDS,
            max_duration_seconds: DEFAULT_MAX_DURATION_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_field_names() {
        let payload = r#"{
            "sequence_id": "front",
            "enabled": true,
            "output_topic": "/cam/front_seq",
            "output_img_width_pixels": 640,
            "output_img_height_pixels": 480,
            "inputs": [
                {"topic": "/cam/a", "min_frame_count": 0, "max_frame_count": 10,
                 "min_duration_s": 1.0, "max_duration_s": 2.5}
            ]
        }"#;

        let record: SequenceRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.id, "front");
        assert_eq!(record.output_key, "/cam/front_seq");
        assert_eq!(record.output_width, 640);
        assert_eq!(record.inputs[0].source_key, "/cam/a");
        assert_eq!(record.inputs[0].max_duration_seconds, 2.5);
    }

    #[test]
    fn missing_inputs_default_to_empty() {
        let payload = "id: solo\noutput_key: out\noutput_width: 10\noutput_height: 20\n";
        let record: SequenceRecord = serde_yaml::from_str(payload).unwrap();
        assert!(record.inputs.is_empty());
        assert!(!record.enabled);
    }

    #[test]
    fn defaults_describe_fixed_duration_scheme() {
        let entry = InputEntry::with_defaults("/cam/a");
        assert_eq!(entry.min_frame_count, 0);
        assert_eq!(entry.max_frame_count, 1_000_000);
        assert!(entry.max_duration_seconds > entry.min_duration_seconds);
    }
}
