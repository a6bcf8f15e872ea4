//! Locally edited copies of sequence records.
//!
//! A draft keeps numeric fields as the text the user typed. Nothing is coerced
//! until [`DraftRecord::coerce`] runs at apply time, so half-typed values such as
//! `"6."` or `""` can live in a draft without being rejected mid-edit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{DraftField, InputField};
use crate::record::{DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, InputEntry, SequenceRecord};

/// Target type of a numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Integer,
    Float,
}

impl std::fmt::Display for NumberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberKind::Integer => f.write_str("an integer"),
            NumberKind::Float => f.write_str("a finite number"),
        }
    }
}

/// Raised when raw text cannot be read as the requested number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{raw}' is not {expected}")]
pub struct CoercionError {
    pub raw: String,
    pub expected: NumberKind,
}

/// Coercion failure pinned to the draft field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}{}: {source}", .input_index.map(|index| format!(" of input {index}")).unwrap_or_default())]
pub struct DraftCoercionError {
    pub field: DraftField,
    /// Position of the offending input, for input fields.
    pub input_index: Option<usize>,
    #[source]
    pub source: CoercionError,
}

/// Numeric text as edited by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawValue(String);

impl RawValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn from_int(value: i64) -> Self {
        Self(value.to_string())
    }

    /// Renders floats with a fractional part (`5.0`, `1.25`) so whole numbers still
    /// read as durations.
    pub fn from_float(value: f64) -> Self {
        Self(format!("{value:?}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the text as an integer. Whole-valued decimals such as `"256.0"` are
    /// accepted; anything with a fractional part is not.
    pub fn to_int(&self) -> Result<i64, CoercionError> {
        let text = self.0.trim();
        if let Ok(value) = text.parse::<i64>() {
            return Ok(value);
        }
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 => Ok(value as i64),
            _ => Err(self.error(NumberKind::Integer)),
        }
    }

    /// Reads the text as a finite float. `NaN` and infinities are rejected.
    pub fn to_float(&self) -> Result<f64, CoercionError> {
        match self.0.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(self.error(NumberKind::Float)),
        }
    }

    /// Returns `true` when the text reads as exactly `value`.
    pub fn is_int(&self, value: i64) -> bool {
        self.to_int().is_ok_and(|parsed| parsed == value)
    }

    /// Returns `true` when the text reads as exactly `value`.
    pub fn is_float(&self, value: f64) -> bool {
        self.to_float().is_ok_and(|parsed| parsed == value)
    }

    fn error(&self, expected: NumberKind) -> CoercionError {
        CoercionError {
            raw: self.0.clone(),
            expected,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Editable copy of an [`InputEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftInput {
    pub source_key: String,
    pub min_frame_count: RawValue,
    pub max_frame_count: RawValue,
    pub min_duration_seconds: RawValue,
    pub max_duration_seconds: RawValue,
}

impl DraftInput {
    /// Draft for a newly added input with the fixed-duration defaults.
    pub fn with_defaults(source_key: impl Into<String>) -> Self {
        Self::from(&InputEntry::with_defaults(source_key))
    }

    pub fn field(&self, field: InputField) -> &RawValue {
        match field {
            InputField::MinFrameCount => &self.min_frame_count,
            InputField::MaxFrameCount => &self.max_frame_count,
            InputField::MinDurationSeconds => &self.min_duration_seconds,
            InputField::MaxDurationSeconds => &self.max_duration_seconds,
        }
    }

    pub fn field_mut(&mut self, field: InputField) -> &mut RawValue {
        match field {
            InputField::MinFrameCount => &mut self.min_frame_count,
            InputField::MaxFrameCount => &mut self.max_frame_count,
            InputField::MinDurationSeconds => &mut self.min_duration_seconds,
            InputField::MaxDurationSeconds => &mut self.max_duration_seconds,
        }
    }

    fn coerce(&self, index: usize) -> Result<InputEntry, DraftCoercionError> {
        let int = |field: InputField| {
            self.field(field).to_int().map_err(|source| DraftCoercionError {
                field: field.into(),
                input_index: Some(index),
                source,
            })
        };
        let float = |field: InputField| {
            self.field(field).to_float().map_err(|source| DraftCoercionError {
                field: field.into(),
                input_index: Some(index),
                source,
            })
        };
        Ok(InputEntry {
            source_key: self.source_key.clone(),
            min_frame_count: int(InputField::MinFrameCount)?,
            max_frame_count: int(InputField::MaxFrameCount)?,
            min_duration_seconds: float(InputField::MinDurationSeconds)?,
            max_duration_seconds: float(InputField::MaxDurationSeconds)?,
        })
    }
}

impl From<&InputEntry> for DraftInput {
    fn from(entry: &InputEntry) -> Self {
        Self {
            source_key: entry.source_key.clone(),
            min_frame_count: RawValue::from_int(entry.min_frame_count),
            max_frame_count: RawValue::from_int(entry.max_frame_count),
            min_duration_seconds: RawValue::from_float(entry.min_duration_seconds),
            max_duration_seconds: RawValue::from_float(entry.max_duration_seconds),
        }
    }
}

/// Editable copy of a [`SequenceRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub id: String,
    pub enabled: bool,
    pub output_key: String,
    pub output_width: RawValue,
    pub output_height: RawValue,
    pub inputs: Vec<DraftInput>,
}

impl DraftRecord {
    /// Synthesizes the placeholder record used by "new": `new_sequence_<n>` writing
    /// to `new_output_img_<n>`, enabled, 256x256, no inputs.
    pub fn placeholder(counter: u64) -> Self {
        Self {
            id: format!("new_sequence_{counter}"),
            enabled: true,
            output_key: format!("new_output_img_{counter}"),
            output_width: RawValue::from_int(DEFAULT_OUTPUT_WIDTH),
            output_height: RawValue::from_int(DEFAULT_OUTPUT_HEIGHT),
            inputs: Vec::new(),
        }
    }

    /// Converts the draft into a typed record, failing on the first field whose
    /// text does not coerce.
    pub fn coerce(&self) -> Result<SequenceRecord, DraftCoercionError> {
        let output_width = self.output_width.to_int().map_err(|source| DraftCoercionError {
            field: DraftField::OutputWidth,
            input_index: None,
            source,
        })?;
        let output_height = self.output_height.to_int().map_err(|source| DraftCoercionError {
            field: DraftField::OutputHeight,
            input_index: None,
            source,
        })?;
        let inputs = self
            .inputs
            .iter()
            .enumerate()
            .map(|(index, input)| input.coerce(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SequenceRecord {
            id: self.id.clone(),
            enabled: self.enabled,
            output_key: self.output_key.clone(),
            output_width,
            output_height,
            inputs,
        })
    }
}

impl From<&SequenceRecord> for DraftRecord {
    fn from(record: &SequenceRecord) -> Self {
        Self {
            id: record.id.clone(),
            enabled: record.enabled,
            output_key: record.output_key.clone(),
            output_width: RawValue::from_int(record.output_width),
            output_height: RawValue::from_int(record.output_height),
            inputs: record.inputs.iter().map(DraftInput::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> SequenceRecord {
        SequenceRecord {
            id: "s1".into(),
            enabled: true,
            output_key: "/seq/out".into(),
            output_width: 320,
            output_height: 240,
            inputs: vec![InputEntry::with_defaults("/cam/a")],
        }
    }

    #[test]
    fn floats_render_with_fraction() {
        assert_eq!(RawValue::from_float(5.0).as_str(), "5.0");
        assert_eq!(RawValue::from_float(1.25).as_str(), "1.25");
    }

    #[test]
    fn integer_coercion_accepts_whole_decimals_only() {
        assert_eq!(RawValue::new(" 42 ").to_int(), Ok(42));
        assert_eq!(RawValue::new("256.0").to_int(), Ok(256));
        let error = RawValue::new("12.5").to_int().unwrap_err();
        assert_eq!(error.expected, NumberKind::Integer);
        assert!(RawValue::new("abc").to_int().is_err());
    }

    #[test]
    fn float_coercion_rejects_non_finite_text() {
        assert_eq!(RawValue::new("6").to_float(), Ok(6.0));
        assert!(RawValue::new("NaN").to_float().is_err());
        assert!(RawValue::new("inf").to_float().is_err());
        assert!(RawValue::new("").to_float().is_err());
    }

    #[test]
    fn draft_from_record_coerces_back_to_the_same_record() {
        let original = record();
        let draft = DraftRecord::from(&original);
        assert_eq!(draft.output_width.as_str(), "320");
        assert_eq!(draft.inputs[0].min_duration_seconds.as_str(), "1.0");
        assert_eq!(draft.coerce().unwrap(), original);
    }

    #[test]
    fn coercion_error_names_the_input_field() {
        let mut draft = DraftRecord::from(&record());
        draft.inputs[0].max_frame_count = RawValue::new("lots");

        let error = draft.coerce().unwrap_err();
        assert_eq!(error.field, DraftField::Input(InputField::MaxFrameCount));
        assert_eq!(error.input_index, Some(0));
        assert_eq!(error.to_string(), "invalid max_frame_count of input 0: 'lots' is not an integer");
    }

    #[test]
    fn placeholder_uses_counter_in_id_and_output() {
        let draft = DraftRecord::placeholder(3);
        assert_eq!(draft.id, "new_sequence_3");
        assert_eq!(draft.output_key, "new_output_img_3");
        assert!(draft.enabled);
        assert!(draft.inputs.is_empty());
    }
}
