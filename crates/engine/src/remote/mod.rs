//! Remote collection sources.
//!
//! The authoritative sequence collection lives behind [`RemoteCollectionSource`].
//! The session never talks to it directly: transitions return [`RemoteRequest`]s
//! and the driver dispatches them.
//!
//! Modules:
//! - `memory`: in-process source keyed by id, used by tests and embedders
//! - `file`: JSON file-backed source used by the CLI

mod file;
mod memory;

pub use file::JsonFileCollectionSource;
pub use memory::InMemoryCollectionSource;

use sequencer_types::SequenceRecord;
use thiserror::Error;

/// Access to the authoritative collection of sequence records.
#[async_trait::async_trait]
pub trait RemoteCollectionSource: Send + Sync {
    /// The latest known collection, in backend order.
    async fn collection(&self) -> Result<Vec<SequenceRecord>, RemoteError>;

    /// Creates or replaces the record with the same id.
    async fn upsert(&self, record: SequenceRecord) -> Result<(), RemoteError>;

    /// Removes the record with `id`. Unknown ids are not an error.
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;

    /// Forces the source to re-fetch its collection from the backend.
    async fn refresh(&self) -> Result<(), RemoteError>;
}

/// Outbound request produced by a session transition.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteRequest {
    Upsert(SequenceRecord),
    Delete(String),
    Refresh,
}

/// Errors raised by remote sources.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("collection I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("collection serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("remote unavailable: {message}")]
    Unavailable { message: String },
}

impl RemoteError {
    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }
}
