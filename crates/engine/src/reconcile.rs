//! Draft reconciliation against remote snapshots.
//!
//! The backend streams the whole collection continuously. A clean draft should
//! follow it; a dirty draft must never be overwritten. Because every snapshot is
//! freshly deserialized, comparison is field by field rather than by identity, and
//! an unchanged record keeps the existing draft allocation so observers comparing
//! pointers see no churn.

use std::sync::Arc;

use sequencer_types::{DraftInput, DraftRecord, InputEntry, SequenceRecord};

/// Decides which draft the session should hold after observing `remote`.
///
/// Returns `draft` untouched when there is no draft, when it carries unsaved edits,
/// or when its record is absent from the snapshot. Otherwise the whole remote
/// record replaces the draft as soon as any compared field differs.
pub fn reconcile(remote: &[SequenceRecord], draft: Option<&Arc<DraftRecord>>, is_dirty: bool) -> Option<Arc<DraftRecord>> {
    let current = draft?;
    if is_dirty {
        return Some(Arc::clone(current));
    }
    match remote.iter().find(|record| record.id == current.id) {
        Some(record) if diverges(current, record) => Some(Arc::new(DraftRecord::from(record))),
        _ => Some(Arc::clone(current)),
    }
}

/// Returns `true` when any reconciled field of `draft` differs from `remote`.
pub fn diverges(draft: &DraftRecord, remote: &SequenceRecord) -> bool {
    if draft.enabled != remote.enabled
        || draft.output_key != remote.output_key
        || !draft.output_width.is_int(remote.output_width)
        || !draft.output_height.is_int(remote.output_height)
        || draft.inputs.len() != remote.inputs.len()
    {
        return true;
    }
    draft
        .inputs
        .iter()
        .zip(&remote.inputs)
        .any(|(local, remote)| input_diverges(local, remote))
}

fn input_diverges(local: &DraftInput, remote: &InputEntry) -> bool {
    local.source_key != remote.source_key
        || !local.min_frame_count.is_int(remote.min_frame_count)
        || !local.max_frame_count.is_int(remote.max_frame_count)
        || !local.min_duration_seconds.is_float(remote.min_duration_seconds)
        || !local.max_duration_seconds.is_float(remote.max_duration_seconds)
}
