use std::path::{Path, PathBuf};

use sequencer_types::SequenceRecord;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use super::{RemoteCollectionSource, RemoteError};

/// Collection persisted as a pretty-printed JSON array.
///
/// Writes go straight to the file. Reads are served from the snapshot taken at
/// construction or by the last [`refresh`](RemoteCollectionSource::refresh), the
/// same way a polled backend lags behind its own writes.
#[derive(Debug)]
pub struct JsonFileCollectionSource {
    path: PathBuf,
    snapshot: Mutex<Vec<SequenceRecord>>,
}

impl JsonFileCollectionSource {
    /// Opens the collection at `path`. A missing file is an empty collection.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RemoteError> {
        let path = path.into();
        let snapshot = load_collection(&path).await?;
        Ok(Self {
            path,
            snapshot: Mutex::new(snapshot),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the file through `change`. An unparsable file is an error here, so
    /// records that failed to load are never overwritten.
    async fn modify(&self, change: impl FnOnce(&mut Vec<SequenceRecord>)) -> Result<(), RemoteError> {
        let mut records = read_collection(&self.path).await?;
        change(&mut records);
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&records)?).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteCollectionSource for JsonFileCollectionSource {
    async fn collection(&self) -> Result<Vec<SequenceRecord>, RemoteError> {
        Ok(self.snapshot.lock().await.clone())
    }

    async fn upsert(&self, record: SequenceRecord) -> Result<(), RemoteError> {
        self.modify(|records| match records.iter_mut().find(|existing| existing.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.modify(|records| records.retain(|record| record.id != id)).await
    }

    async fn refresh(&self) -> Result<(), RemoteError> {
        let records = load_collection(&self.path).await?;
        *self.snapshot.lock().await = records;
        Ok(())
    }
}

async fn read_collection(path: &Path) -> Result<Vec<SequenceRecord>, RemoteError> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(error) => Err(RemoteError::Io(error)),
    }
}

async fn load_collection(path: &Path) -> Result<Vec<SequenceRecord>, RemoteError> {
    match read_collection(path).await {
        Err(RemoteError::Serialization(error)) => {
            warn!(path = %path.display(), error = %error, "Failed to parse collection file; treating as empty");
            Ok(Vec::new())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequencer_types::InputEntry;
    use tempfile::tempdir;

    fn record(id: &str) -> SequenceRecord {
        SequenceRecord {
            id: id.into(),
            enabled: true,
            output_key: format!("/seq/{id}"),
            output_width: 128,
            output_height: 96,
            inputs: vec![InputEntry::with_defaults("/cam/a")],
        }
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let source = JsonFileCollectionSource::open(dir.path().join("sequences.json")).await.unwrap();
        assert!(source.collection().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_become_visible_after_refresh() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sequences.json");
        let source = JsonFileCollectionSource::open(&path).await.unwrap();

        source.upsert(record("a")).await.unwrap();
        assert!(source.collection().await.unwrap().is_empty());

        source.refresh().await.unwrap();
        assert_eq!(source.collection().await.unwrap(), vec![record("a")]);

        let reopened = JsonFileCollectionSource::open(&path).await.unwrap();
        assert_eq!(reopened.collection().await.unwrap(), vec![record("a")]);
    }

    #[tokio::test]
    async fn upsert_replaces_and_delete_removes() {
        let dir = tempdir().unwrap();
        let source = JsonFileCollectionSource::open(dir.path().join("sequences.json")).await.unwrap();
        source.upsert(record("a")).await.unwrap();
        source.upsert(record("b")).await.unwrap();

        let mut changed = record("a");
        changed.output_width = 1024;
        source.upsert(changed.clone()).await.unwrap();
        source.delete("b").await.unwrap();
        source.refresh().await.unwrap();

        assert_eq!(source.collection().await.unwrap(), vec![changed]);
    }

    #[tokio::test]
    async fn unparsable_file_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sequences.json");
        std::fs::write(&path, "{ not json").unwrap();

        let source = JsonFileCollectionSource::open(&path).await.unwrap();
        assert!(source.collection().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_to_unparsable_file_fail_and_leave_it_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sequences.json");
        let corrupt = r#"[{"id": "keep", "enabled": true}, {"id": "broken""#;
        std::fs::write(&path, corrupt).unwrap();
        let source = JsonFileCollectionSource::open(&path).await.unwrap();

        let upsert = source.upsert(record("new")).await;
        let delete = source.delete("keep").await;

        assert!(matches!(upsert, Err(RemoteError::Serialization(_))));
        assert!(matches!(delete, Err(RemoteError::Serialization(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), corrupt);
    }
}
