//! Editing of a draft's ordered input list.
//!
//! The presentation layer shows the inputs with an extra sentinel row on top
//! ("nothing selected", also the insertion point for the head of the list). The
//! editor keeps the input entries and that offset label list in lockstep:
//! `labels[i + 1]` always names `inputs[i]`.

use std::sync::Arc;

use sequencer_types::{DraftInput, DraftRecord};

/// Outcome of a structural edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum ListEdit {
    /// The list changed; `selected` is the new input selection.
    Applied { selected: Option<usize> },
    /// The request was not valid in the current state and nothing changed.
    Ignored,
}

impl ListEdit {
    pub fn is_applied(self) -> bool {
        matches!(self, ListEdit::Applied { .. })
    }
}

/// Borrowed view over the pieces of session state an input edit touches.
///
/// The draft is copied on write: selecting rows never detaches it from snapshots
/// that share it, structural edits do.
pub struct SubInputListEditor<'a> {
    draft: &'a mut Arc<DraftRecord>,
    labels: &'a mut Vec<String>,
    selected: &'a mut Option<usize>,
}

impl<'a> SubInputListEditor<'a> {
    pub fn new(draft: &'a mut Arc<DraftRecord>, labels: &'a mut Vec<String>, selected: &'a mut Option<usize>) -> Self {
        debug_assert_eq!(labels.len(), draft.inputs.len() + 1, "input labels out of step with inputs");
        Self { draft, labels, selected }
    }

    /// Maps a row of the displayed list (sentinel at 0) to an input selection.
    ///
    /// Rows past the end of the list are ignored.
    pub fn select_by_sentinel_index(&mut self, row: usize) -> Option<usize> {
        if row == 0 {
            *self.selected = None;
        } else if row <= self.draft.inputs.len() {
            *self.selected = Some(row - 1);
        }
        *self.selected
    }

    /// Inserts a default-timed input for `source_key` right after the selected
    /// input, or at the head of the list when nothing is selected. The new input
    /// becomes the selection.
    ///
    /// An empty key is the "cancel" choice of the candidate list and is ignored.
    pub fn insert(&mut self, source_key: &str, display_label: &str) -> ListEdit {
        if source_key.trim().is_empty() {
            return ListEdit::Ignored;
        }
        let inputs = &mut Arc::make_mut(self.draft).inputs;
        let position = self.selected.map_or(0, |index| index + 1).min(inputs.len());
        inputs.insert(position, DraftInput::with_defaults(source_key));
        self.labels.insert(position + 1, display_label.to_string());
        *self.selected = Some(position);
        ListEdit::Applied {
            selected: *self.selected,
        }
    }

    /// Removes the selected input.
    ///
    /// The selection stays on the same slot (now holding the next input), moves up
    /// when the last input was removed, and clears when the list becomes empty.
    pub fn delete(&mut self) -> ListEdit {
        let Some(index) = *self.selected else {
            return ListEdit::Ignored;
        };
        if index >= self.draft.inputs.len() {
            return ListEdit::Ignored;
        }
        let inputs = &mut Arc::make_mut(self.draft).inputs;
        inputs.remove(index);
        self.labels.remove(index + 1);

        *self.selected = if inputs.is_empty() {
            None
        } else if index >= inputs.len() {
            Some(inputs.len() - 1)
        } else {
            Some(index)
        };
        ListEdit::Applied {
            selected: *self.selected,
        }
    }
}
