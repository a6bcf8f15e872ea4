//! Commands accepted by the edit session.

use sequencer_types::{DraftField, InputField};
use serde::{Deserialize, Serialize};

/// A field-level edit of the draft.
///
/// Numeric values are carried as the raw text the user typed; they are only
/// coerced when the draft is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditCommand {
    SetEnabled { value: bool },
    SetOutputKey { value: String },
    SetOutputWidth { value: String },
    SetOutputHeight { value: String },
    /// Edits a timing field of the selected input.
    SetInputField { field: InputField, value: String },
    /// Renames a record that has not been applied yet.
    SetId { value: String },
}

impl EditCommand {
    /// The draft field this command writes.
    pub fn field(&self) -> DraftField {
        match self {
            EditCommand::SetEnabled { .. } => DraftField::Enabled,
            EditCommand::SetOutputKey { .. } => DraftField::OutputKey,
            EditCommand::SetOutputWidth { .. } => DraftField::OutputWidth,
            EditCommand::SetOutputHeight { .. } => DraftField::OutputHeight,
            EditCommand::SetInputField { field, .. } => DraftField::Input(*field),
            EditCommand::SetId { .. } => DraftField::Id,
        }
    }
}

/// Every user-facing session operation, as one serializable event.
///
/// Scripts replayed by the CLI and events queued to the driver use this form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    Select { id: String },
    Edit { command: EditCommand },
    /// Selects a row of the displayed input list (row 0 is the sentinel).
    SelectInput { row: usize },
    /// Adds an input for `key`, which must be one of the offered candidates.
    AddInput { key: String },
    DeleteInput,
    ToggleAdvancedMode,
    CreateNew,
    DeleteSelected,
    Apply,
    Cancel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_actions() {
        let script = r#"
- action: select
  id: front
- action: select_input
  row: 1
- action: edit
  command:
    command: set_input_field
    field: min_duration_seconds
    value: "6.0"
- action: add_input
  key: /cam/b
- action: apply
"#;
        let actions: Vec<SessionAction> = serde_yaml::from_str(script).unwrap();
        assert_eq!(actions.len(), 5);
        assert_eq!(
            actions[2],
            SessionAction::Edit {
                command: EditCommand::SetInputField {
                    field: InputField::MinDurationSeconds,
                    value: "6.0".into()
                }
            }
        );
        assert_eq!(actions[4], SessionAction::Apply);
    }

    #[test]
    fn command_reports_its_field() {
        let command = EditCommand::SetInputField {
            field: InputField::MaxFrameCount,
            value: "10".into(),
        };
        assert_eq!(command.field(), DraftField::Input(InputField::MaxFrameCount));
        assert_eq!(EditCommand::SetId { value: "x".into() }.field(), DraftField::Id);
    }
}
