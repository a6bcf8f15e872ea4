//! The edit session: selection, draft lifecycle and apply/cancel.
//!
//! [`EditSession`] is a plain synchronous value. Every transition runs to
//! completion and hands back the [`RemoteRequest`]s it produced; dispatching them
//! is the caller's job (see [`crate::SessionDriver`]). Transitions that are not
//! valid in the current state leave the session untouched and are only logged.

mod command;
mod state;

use std::collections::BTreeSet;
use std::sync::Arc;

use regex::Regex;
use sequencer_types::{DraftField, DraftInput, DraftRecord, InputField, RawValue, SequenceRecord};
use sequencer_util::{SequencerSettings, SettingsError};
use tracing::{debug, info, warn};

pub use command::{EditCommand, SessionAction};
pub use state::{EditSessionState, PreviewTarget, SessionPhase};

use crate::candidates::{Candidate, offer_candidates};
use crate::errors::SessionError;
use crate::inputs::{ListEdit, SubInputListEditor};
use crate::labels::{LabelingService, SENTINEL_LABEL, label_inputs};
use crate::reconcile::reconcile;
use crate::remote::RemoteRequest;

const RECORD_FIELDS: [DraftField; 4] = [
    DraftField::Id,
    DraftField::OutputKey,
    DraftField::OutputWidth,
    DraftField::OutputHeight,
];

/// Edit session over one remote sequence collection.
pub struct EditSession {
    state: EditSessionState,
    remote: Vec<SequenceRecord>,
    source_keys: Vec<String>,
    candidate_filter: Option<Regex>,
    labeler: Arc<dyn LabelingService>,
    next_placeholder: u64,
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("state", &self.state)
            .field("remote", &self.remote.len())
            .field("source_keys", &self.source_keys.len())
            .field("next_placeholder", &self.next_placeholder)
            .finish_non_exhaustive()
    }
}

impl EditSession {
    pub fn new(labeler: Arc<dyn LabelingService>) -> Self {
        Self {
            state: EditSessionState::default(),
            remote: Vec::new(),
            source_keys: Vec::new(),
            candidate_filter: None,
            labeler,
            next_placeholder: 0,
        }
    }

    /// Builds a session configured from user settings.
    pub fn with_settings(labeler: Arc<dyn LabelingService>, settings: &SequencerSettings) -> Result<Self, SettingsError> {
        let mut session = Self::new(labeler);
        session.state.advanced_input_config_enabled = settings.advanced_input_config;
        session.candidate_filter = settings.candidate_filter()?;
        Ok(session)
    }

    pub fn state(&self) -> &EditSessionState {
        &self.state
    }

    /// A detached copy of the current state for the presentation layer.
    pub fn snapshot(&self) -> EditSessionState {
        self.state.clone()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// The collection last received from the backend.
    pub fn remote_collection(&self) -> &[SequenceRecord] {
        &self.remote
    }

    /// Ids of the remote collection in backend order.
    pub fn sequence_ids(&self) -> Vec<&str> {
        self.remote.iter().map(|record| record.id.as_str()).collect()
    }

    pub fn preview_target(&self) -> PreviewTarget {
        self.state.preview_target()
    }

    /// Replaces the set of source keys offered when adding inputs.
    pub fn set_source_keys(&mut self, keys: Vec<String>) {
        self.source_keys = keys;
    }

    pub fn set_candidate_filter(&mut self, filter: Option<Regex>) {
        self.candidate_filter = filter;
    }

    /// Feeds a freshly received remote collection through the reconciler.
    pub fn on_remote_collection(&mut self, collection: Vec<SequenceRecord>) {
        self.state.connected = true;
        let next = reconcile(&collection, self.state.draft.as_ref(), self.state.is_dirty);
        let replaced = match (&next, &self.state.draft) {
            (Some(next), Some(current)) => !Arc::ptr_eq(next, current),
            _ => false,
        };
        if replaced && let Some(draft) = next {
            info!(id = %draft.id, "selected sequence changed remotely; adopting remote record");
            self.state.input_labels = label_inputs(self.labeler.as_ref(), &draft.inputs);
            if self.state.selected_input_index.is_some_and(|index| index >= draft.inputs.len()) {
                self.state.selected_input_index = None;
            }
            self.state.draft = Some(draft);
        }
        self.remote = collection;
    }

    /// Loads the remote record `id` into a fresh draft.
    pub fn select(&mut self, id: &str) {
        if self.phase() == SessionPhase::Editing {
            debug!(id, "ignoring select while the draft has unsaved edits");
            return;
        }
        let Some(record) = self.remote.iter().find(|record| record.id == id) else {
            debug!(id, "ignoring select of unknown sequence");
            return;
        };
        let draft = DraftRecord::from(record);
        self.state.input_labels = label_inputs(self.labeler.as_ref(), &draft.inputs);
        self.state.draft = Some(Arc::new(draft));
        self.state.is_dirty = false;
        self.state.is_new_record = false;
        self.state.selected_input_index = None;
        self.state.dirty_fields.clear();
        debug!(id, "selected sequence");
    }

    /// Applies a field edit to the draft.
    pub fn edit(&mut self, command: EditCommand) {
        if let Some(reason) = self.edit_rejection(&command) {
            debug!(?command, reason, "ignoring edit");
            return;
        }
        let field = command.field();
        let advanced = self.state.advanced_input_config_enabled;
        let selected = self.state.selected_input_index;
        let Some(draft) = self.state.draft.as_mut().map(Arc::make_mut) else {
            return;
        };

        let mut corrected_max = false;
        match command {
            EditCommand::SetEnabled { value } => draft.enabled = value,
            EditCommand::SetOutputKey { value } => draft.output_key = value,
            EditCommand::SetOutputWidth { value } => draft.output_width = RawValue::new(value),
            EditCommand::SetOutputHeight { value } => draft.output_height = RawValue::new(value),
            EditCommand::SetId { value } => draft.id = value,
            EditCommand::SetInputField { field, value } => {
                let Some(input) = selected.and_then(|index| draft.inputs.get_mut(index)) else {
                    return;
                };
                *input.field_mut(field) = RawValue::new(value);
                if !advanced
                    && field == InputField::MinDurationSeconds
                    && let Some(max) = corrected_max_duration(input)
                {
                    debug!(max = max.as_str(), "raising max duration above the fixed duration");
                    input.max_duration_seconds = max;
                    corrected_max = true;
                }
            }
        }

        self.state.is_dirty = true;
        self.state.dirty_fields.insert(field);
        if corrected_max {
            self.state
                .dirty_fields
                .insert(DraftField::Input(InputField::MaxDurationSeconds));
        }
    }

    fn edit_rejection(&self, command: &EditCommand) -> Option<&'static str> {
        let Some(draft) = &self.state.draft else {
            return Some("no sequence selected");
        };
        match command {
            EditCommand::SetId { .. } if !self.state.is_new_record => Some("id of an existing sequence is fixed"),
            EditCommand::SetId { value } if self.is_remote_id(value) => Some("id already used by another sequence"),
            EditCommand::SetInputField { field, .. } => {
                if !self.state.selected_input_index.is_some_and(|index| index < draft.inputs.len()) {
                    Some("no input selected")
                } else if self.state.is_input_field_locked(*field) {
                    Some("field is locked in simple mode")
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Selects a row of the displayed input list; row 0 is the sentinel.
    pub fn select_input(&mut self, row: usize) -> Option<usize> {
        match self.input_editor() {
            Some(mut editor) => editor.select_by_sentinel_index(row),
            None => {
                debug!(row, "ignoring input selection without a sequence");
                None
            }
        }
    }

    /// Picker entries for adding an input to the draft.
    pub fn candidates(&self) -> Vec<Candidate> {
        let own_output = self.state.draft.as_ref().map(|draft| draft.output_key.as_str());
        offer_candidates(
            &self.source_keys,
            self.candidate_filter.as_ref(),
            own_output,
            self.labeler.as_ref(),
        )
    }

    /// Adds an input for `key`, which must be one of the offered candidates.
    pub fn add_input(&mut self, key: &str) -> ListEdit {
        let candidate = self
            .candidates()
            .into_iter()
            .find(|candidate| !candidate.is_cancel() && candidate.key == key);
        match candidate {
            Some(candidate) => self.insert_input(&candidate.key, &candidate.label),
            None => {
                debug!(key, "ignoring input that is not an offered candidate");
                ListEdit::Ignored
            }
        }
    }

    /// Inserts an input after the selected one, labeled `display_label`.
    pub fn insert_input(&mut self, source_key: &str, display_label: &str) -> ListEdit {
        let edit = match self.input_editor() {
            Some(mut editor) => editor.insert(source_key, display_label),
            None => ListEdit::Ignored,
        };
        if edit.is_applied() {
            self.state.is_dirty = true;
            self.state.dirty_fields.insert(DraftField::Inputs);
            self.state
                .dirty_fields
                .extend(InputField::ALL.into_iter().map(DraftField::Input));
        } else {
            debug!(source_key, "ignoring input insert");
        }
        edit
    }

    /// Removes the selected input.
    pub fn delete_input(&mut self) -> ListEdit {
        let edit = match self.input_editor() {
            Some(mut editor) => editor.delete(),
            None => ListEdit::Ignored,
        };
        if edit.is_applied() {
            self.state.is_dirty = true;
            self.state.dirty_fields.insert(DraftField::Inputs);
        } else {
            debug!("ignoring input delete without a selected input");
        }
        edit
    }

    fn input_editor(&mut self) -> Option<SubInputListEditor<'_>> {
        let draft = self.state.draft.as_mut()?;
        Some(SubInputListEditor::new(
            draft,
            &mut self.state.input_labels,
            &mut self.state.selected_input_index,
        ))
    }

    pub fn toggle_advanced_mode(&mut self) {
        self.state.advanced_input_config_enabled = !self.state.advanced_input_config_enabled;
        debug!(advanced = self.state.advanced_input_config_enabled, "toggled input configuration mode");
    }

    /// Starts a new, never-applied record with placeholder names.
    ///
    /// Placeholder numbers are never reused within a session and skip ids already
    /// present in the remote collection.
    pub fn create_new(&mut self) {
        let draft = loop {
            let candidate = DraftRecord::placeholder(self.next_placeholder);
            self.next_placeholder += 1;
            if !self.is_remote_id(&candidate.id) {
                break candidate;
            }
        };
        info!(id = %draft.id, "creating new sequence");
        self.state.draft = Some(Arc::new(draft));
        self.state.is_dirty = true;
        self.state.is_new_record = true;
        self.state.selected_input_index = None;
        self.state.input_labels = vec![SENTINEL_LABEL.to_string()];
        self.state.dirty_fields = RECORD_FIELDS.into_iter().collect::<BTreeSet<_>>();
    }

    /// Drops the selected record. Records known to the backend are deleted there
    /// too; the local state clears immediately either way.
    pub fn delete_selected(&mut self) -> Vec<RemoteRequest> {
        let Some(draft) = &self.state.draft else {
            debug!("ignoring delete without a selected sequence");
            return Vec::new();
        };
        let requests = if self.state.is_new_record {
            Vec::new()
        } else {
            vec![RemoteRequest::Delete(draft.id.clone())]
        };
        info!(id = %draft.id, remote = !requests.is_empty(), "deleting sequence");
        self.clear_selection();
        requests
    }

    /// Discards the draft and any unsaved edits.
    pub fn cancel(&mut self) {
        if self.state.draft.is_none() {
            debug!("ignoring cancel without a selected sequence");
            return;
        }
        self.clear_selection();
    }

    /// Coerces the draft and sends it to the backend.
    ///
    /// On a malformed number the draft is kept as-is, still dirty, and nothing is
    /// sent.
    pub fn apply(&mut self) -> Result<Vec<RemoteRequest>, SessionError> {
        if !self.state.is_dirty {
            debug!("ignoring apply without unsaved edits");
            return Ok(Vec::new());
        }
        let Some(draft) = &self.state.draft else {
            return Ok(Vec::new());
        };
        if self.state.is_new_record && self.is_remote_id(&draft.id) {
            warn!(id = %draft.id, "new sequence id appeared remotely; draft rejected");
            return Err(SessionError::IdTaken { id: draft.id.clone() });
        }
        let record = draft.coerce().map_err(|error| {
            warn!(id = %draft.id, error = %error, "draft rejected");
            SessionError::from(error)
        })?;

        info!(id = %record.id, inputs = record.inputs.len(), new = self.state.is_new_record, "applying sequence");
        self.state.draft = Some(Arc::new(DraftRecord::from(&record)));
        self.state.is_dirty = false;
        self.state.is_new_record = false;
        self.state.selected_input_index = None;
        self.state.dirty_fields.clear();
        Ok(vec![RemoteRequest::Upsert(record), RemoteRequest::Refresh])
    }

    /// Runs one user action and returns the remote requests it produced.
    pub fn perform(&mut self, action: SessionAction) -> Result<Vec<RemoteRequest>, SessionError> {
        match action {
            SessionAction::Select { id } => self.select(&id),
            SessionAction::Edit { command } => self.edit(command),
            SessionAction::SelectInput { row } => {
                self.select_input(row);
            }
            SessionAction::AddInput { key } => {
                let _ = self.add_input(&key);
            }
            SessionAction::DeleteInput => {
                let _ = self.delete_input();
            }
            SessionAction::ToggleAdvancedMode => self.toggle_advanced_mode(),
            SessionAction::CreateNew => self.create_new(),
            SessionAction::DeleteSelected => return Ok(self.delete_selected()),
            SessionAction::Apply => return self.apply(),
            SessionAction::Cancel => self.cancel(),
        }
        Ok(Vec::new())
    }

    fn is_remote_id(&self, id: &str) -> bool {
        self.remote.iter().any(|record| record.id == id)
    }

    fn clear_selection(&mut self) {
        self.state.draft = None;
        self.state.is_dirty = false;
        self.state.is_new_record = false;
        self.state.selected_input_index = None;
        self.state.input_labels = vec![SENTINEL_LABEL.to_string()];
        self.state.dirty_fields.clear();
    }
}

/// New max duration when the fixed duration caught up with it, one second above.
fn corrected_max_duration(input: &DraftInput) -> Option<RawValue> {
    let min = input.min_duration_seconds.to_float().ok()?;
    match input.max_duration_seconds.to_float() {
        Ok(max) if max > min => None,
        _ => Some(RawValue::from_float(min + 1.0)),
    }
}
