//! # Sequencer Types
//!
//! Shared data definitions for the sequencer workspace.
//!
//! - [`SequenceRecord`] / [`InputEntry`]: the authoritative, typed shape of a
//!   sequence as published by the backend.
//! - [`DraftRecord`] / [`DraftInput`]: the locally edited copy of a record. Numeric
//!   fields are kept as [`RawValue`] text until the draft is applied.
//! - [`DraftField`] / [`InputField`]: names of the editable fields, used for dirty
//!   tracking and field-level commands.

mod draft;
mod field;
mod record;

pub use draft::{CoercionError, DraftCoercionError, DraftInput, DraftRecord, NumberKind, RawValue};
pub use field::{DraftField, InputField};
pub use record::{
    DEFAULT_MAX_DURATION_SECONDS, DEFAULT_MAX_FRAME_COUNT, DEFAULT_MIN_DURATION_SECONDS, DEFAULT_MIN_FRAME_COUNT,
    DEFAULT_OUTPUT_HEIGHT, DEFAULT_OUTPUT_WIDTH, InputEntry, SequenceRecord,
};
