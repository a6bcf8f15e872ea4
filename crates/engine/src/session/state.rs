//! Read-only session state handed to the presentation layer.

use std::collections::BTreeSet;
use std::sync::Arc;

use sequencer_types::{DraftField, DraftInput, DraftRecord, InputField};
use serde::Serialize;

use crate::labels::SENTINEL_LABEL;

/// Coarse phase of the session, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No record selected.
    Empty,
    /// A record is selected and matches the backend.
    Viewing,
    /// The selected record carries unsaved edits (always the case for a new record).
    Editing,
}

/// Snapshot of an edit session.
///
/// Cloning is cheap: the draft is shared until the session edits it again, at
/// which point the session copies it first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditSessionState {
    /// Working copy of the selected record.
    pub draft: Option<Arc<DraftRecord>>,
    /// The draft differs from what the backend last confirmed.
    pub is_dirty: bool,
    /// The draft was created locally and has never been applied.
    pub is_new_record: bool,
    /// Selected position in `draft.inputs`.
    pub selected_input_index: Option<usize>,
    /// Sentinel label followed by one label per input.
    pub input_labels: Vec<String>,
    /// Expose every input timing field instead of the fixed duration only.
    pub advanced_input_config_enabled: bool,
    /// Fields edited since the draft was last loaded or applied.
    pub dirty_fields: BTreeSet<DraftField>,
    /// At least one remote collection has been received.
    pub connected: bool,
}

impl Default for EditSessionState {
    fn default() -> Self {
        Self {
            draft: None,
            is_dirty: false,
            is_new_record: false,
            selected_input_index: None,
            input_labels: vec![SENTINEL_LABEL.to_string()],
            advanced_input_config_enabled: false,
            dirty_fields: BTreeSet::new(),
            connected: false,
        }
    }
}

impl EditSessionState {
    pub fn phase(&self) -> SessionPhase {
        match (&self.draft, self.is_dirty) {
            (None, _) => SessionPhase::Empty,
            (Some(_), false) => SessionPhase::Viewing,
            (Some(_), true) => SessionPhase::Editing,
        }
    }

    /// The selected input of the draft.
    pub fn selected_input(&self) -> Option<&DraftInput> {
        let index = self.selected_input_index?;
        self.draft.as_ref()?.inputs.get(index)
    }

    /// Row of the displayed input list that should be highlighted.
    pub fn selected_row(&self) -> usize {
        self.selected_input_index.map_or(0, |index| index + 1)
    }

    /// Whether the presentation layer should flag `field` as modified.
    pub fn is_field_dirty(&self, field: DraftField) -> bool {
        self.dirty_fields.contains(&field)
    }

    /// Input fields open for direct editing in the current mode.
    pub fn exposed_input_fields(&self) -> &'static [InputField] {
        if self.advanced_input_config_enabled {
            &InputField::ALL
        } else {
            &[InputField::MinDurationSeconds]
        }
    }

    /// Whether edits to `field` are refused in the current mode. Any field not in
    /// [`Self::exposed_input_fields`] is locked.
    pub fn is_input_field_locked(&self, field: InputField) -> bool {
        !self.exposed_input_fields().contains(&field)
    }

    /// What the media preview should show.
    pub fn preview_target(&self) -> PreviewTarget {
        let Some(draft) = &self.draft else {
            return PreviewTarget::idle();
        };
        if let Some(input) = self.selected_input() {
            return PreviewTarget {
                key: Some(input.source_key.clone()),
                title: format!("{}(input): {}", draft.id, input.source_key),
            };
        }
        if !self.is_new_record && (draft.enabled || self.is_dirty) {
            return PreviewTarget {
                key: Some(draft.output_key.clone()),
                title: format!("{}(output): {}", draft.id, draft.output_key),
            };
        }
        PreviewTarget::idle()
    }
}

/// Stream the preview widget should display, with its caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewTarget {
    pub key: Option<String>,
    pub title: String,
}

impl PreviewTarget {
    fn idle() -> Self {
        Self {
            key: None,
            title: "Sequence deselected/disabled".to_string(),
        }
    }
}
