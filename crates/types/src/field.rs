use serde::{Deserialize, Serialize};

/// Numeric fields of a single input entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    MinFrameCount,
    MaxFrameCount,
    MinDurationSeconds,
    MaxDurationSeconds,
}

impl InputField {
    /// Every input field, in display order.
    pub const ALL: [InputField; 4] = [
        InputField::MinDurationSeconds,
        InputField::MaxDurationSeconds,
        InputField::MinFrameCount,
        InputField::MaxFrameCount,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InputField::MinFrameCount => "min_frame_count",
            InputField::MaxFrameCount => "max_frame_count",
            InputField::MinDurationSeconds => "min_duration_seconds",
            InputField::MaxDurationSeconds => "max_duration_seconds",
        }
    }
}

/// Any field of a draft that the presentation layer may flag as modified.
///
/// Input fields are tracked without an index: the flag means "some input field of
/// this kind changed", which is what the editor highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Id,
    Enabled,
    OutputKey,
    OutputWidth,
    OutputHeight,
    Inputs,
    Input(InputField),
}

impl From<InputField> for DraftField {
    fn from(field: InputField) -> Self {
        DraftField::Input(field)
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DraftField::Id => "id",
            DraftField::Enabled => "enabled",
            DraftField::OutputKey => "output_key",
            DraftField::OutputWidth => "output_width",
            DraftField::OutputHeight => "output_height",
            DraftField::Inputs => "inputs",
            DraftField::Input(field) => field.as_str(),
        };
        f.write_str(name)
    }
}
