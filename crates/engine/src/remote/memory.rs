use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use sequencer_types::SequenceRecord;
use tokio::sync::Mutex;

use super::{RemoteCollectionSource, RemoteError};

/// In-process collection keyed by record id, preserving insertion order.
///
/// Mutations can be made to fail with [`InMemoryCollectionSource::set_offline`]
/// to exercise the session's optimistic transitions.
#[derive(Debug, Default)]
pub struct InMemoryCollectionSource {
    records: Mutex<IndexMap<String, SequenceRecord>>,
    offline: AtomicBool,
}

impl InMemoryCollectionSource {
    pub fn new(records: impl IntoIterator<Item = SequenceRecord>) -> Self {
        Self {
            records: Mutex::new(records.into_iter().map(|record| (record.id.clone(), record)).collect()),
            offline: AtomicBool::new(false),
        }
    }

    /// Makes every following upsert/delete fail until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Replaces the whole collection, as another actor editing the backend would.
    pub async fn replace_all(&self, records: impl IntoIterator<Item = SequenceRecord>) {
        let mut guard = self.records.lock().await;
        *guard = records.into_iter().map(|record| (record.id.clone(), record)).collect();
    }

    fn ensure_online(&self) -> Result<(), RemoteError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::unavailable("in-memory source is offline"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteCollectionSource for InMemoryCollectionSource {
    async fn collection(&self) -> Result<Vec<SequenceRecord>, RemoteError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }

    async fn upsert(&self, record: SequenceRecord) -> Result<(), RemoteError> {
        self.ensure_online()?;
        self.records.lock().await.insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.ensure_online()?;
        self.records.lock().await.shift_remove(id);
        Ok(())
    }

    async fn refresh(&self) -> Result<(), RemoteError> {
        Ok(())
    }
}
