//! Error types surfaced by the edit session.

use sequencer_types::{DraftCoercionError, DraftField};
use thiserror::Error;

/// Errors returned by session transitions.
///
/// Transitions that are merely invalid for the current state are ignored rather
/// than reported; only a draft that cannot be applied produces an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A numeric field holds text that does not coerce. The draft is kept as-is.
    #[error("cannot apply draft: {0}")]
    InvalidNumber(#[from] DraftCoercionError),

    /// A new record would be stored under an id the backend already holds.
    #[error("cannot apply draft: a sequence named '{id}' already exists")]
    IdTaken { id: String },
}

impl SessionError {
    /// The field the presentation layer should point the user at.
    pub fn field(&self) -> DraftField {
        match self {
            SessionError::InvalidNumber(error) => error.field,
            SessionError::IdTaken { .. } => DraftField::Id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequencer_types::{DraftRecord, RawValue};

    #[test]
    fn wraps_coercion_failures() {
        let mut draft = DraftRecord::placeholder(0);
        draft.output_width = RawValue::new("wide");

        let error: SessionError = draft.coerce().unwrap_err().into();
        assert_eq!(error.field(), DraftField::OutputWidth);
        assert!(error.to_string().starts_with("cannot apply draft: invalid output_width"));
    }

    #[test]
    fn taken_id_points_at_the_id_field() {
        let error = SessionError::IdTaken { id: "front".into() };
        assert_eq!(error.field(), DraftField::Id);
        assert_eq!(error.to_string(), "cannot apply draft: a sequence named 'front' already exists");
    }
}
