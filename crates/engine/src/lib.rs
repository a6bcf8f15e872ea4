//! # Sequencer Engine
//!
//! Edit sessions over a live collection of sequence records. A record combines an
//! ordered list of input streams into one output stream; the authoritative
//! collection lives in a backend that keeps pushing fresh snapshots while the
//! user edits a local draft of one record.
//!
//! ## Key Features
//!
//! - **Reconciliation**: clean drafts follow remote changes, dirty drafts are never
//!   overwritten
//! - **Input list editing**: insert/delete with a sentinel "none selected" row and
//!   labels kept in step with the entries
//! - **Apply/cancel**: raw text edits are coerced on apply and sent as requests
//! - **Candidate offering**: pattern-filtered source keys, never the record's own
//!   output
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use sequencer_engine::{EditCommand, EditSession, RemoteRequest, ShortUniqueLabeler};
//! use sequencer_types::{InputEntry, SequenceRecord};
//!
//! let mut session = EditSession::new(Arc::new(ShortUniqueLabeler));
//! session.on_remote_collection(vec![SequenceRecord {
//!     id: "front".into(),
//!     enabled: true,
//!     output_key: "/seq/front".into(),
//!     output_width: 256,
//!     output_height: 256,
//!     inputs: vec![InputEntry::with_defaults("/cam/front/raw")],
//! }]);
//!
//! session.select("front");
//! session.edit(EditCommand::SetOutputWidth { value: "512".into() });
//! let requests = session.apply()?;
//! assert!(matches!(&requests[0], RemoteRequest::Upsert(record) if record.output_width == 512));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`reconcile`**: draft-versus-snapshot comparison
//! - **`inputs`**: the input list editor
//! - **`candidates`** / **`labels`**: picker entries and the labeling seam
//! - **`session`**: the synchronous state machine
//! - **`remote`**: backend trait plus in-memory and JSON file sources
//! - **`driver`**: Tokio event loop connecting a session to a source

pub mod candidates;
pub mod driver;
pub mod errors;
pub mod inputs;
pub mod labels;
pub mod reconcile;
pub mod remote;
pub mod session;

pub use candidates::{Candidate, offer_candidates};
pub use driver::{SessionDriver, SessionEvent};
pub use errors::SessionError;
pub use inputs::{ListEdit, SubInputListEditor};
pub use labels::{LabelingService, SENTINEL_LABEL, ShortUniqueLabeler, label_inputs};
pub use reconcile::{diverges, reconcile};
pub use remote::{InMemoryCollectionSource, JsonFileCollectionSource, RemoteCollectionSource, RemoteError, RemoteRequest};
pub use session::{EditCommand, EditSession, EditSessionState, PreviewTarget, SessionAction, SessionPhase};
