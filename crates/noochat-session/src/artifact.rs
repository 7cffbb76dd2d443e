use async_trait::async_trait;
use noochat_core::ChatResult;
use std::path::PathBuf;

/// Storage for the single most-recent analysis result.
///
/// The record is an opaque JSON blob produced by an unrelated subsystem; the
/// engine never interprets it, only shuttles it to and from durable storage.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Overwrites the stored record with `value`.
    async fn save_latest(&self, value: &serde_json::Value) -> ChatResult<()>;
    /// Returns the stored record, or `None` if nothing has been saved yet.
    async fn load_latest(&self) -> ChatResult<Option<serde_json::Value>>;
    /// Removes the stored record if present.
    async fn clear(&self) -> ChatResult<()>;
}

/// File-based artifact store: one `latest.json` under a data directory.
pub struct FileArtifactStore {
    dir: PathBuf,
}

impl FileArtifactStore {
    /// Creates the store, creating the data directory if needed.
    pub async fn new(dir: PathBuf) -> ChatResult<Self> {
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    fn record_path(&self) -> PathBuf {
        self.dir.join("latest.json")
    }
}

#[async_trait]
impl ArtifactStore for FileArtifactStore {
    async fn save_latest(&self, value: &serde_json::Value) -> ChatResult<()> {
        let json = serde_json::to_string_pretty(value)?;
        tokio::fs::write(self.record_path(), json).await?;
        Ok(())
    }

    async fn load_latest(&self) -> ChatResult<Option<serde_json::Value>> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = tokio::fs::read_to_string(path).await?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    async fn clear(&self) -> ChatResult<()> {
        let path = self.record_path();
        if path.exists() {
            tokio::fs::remove_file(path).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let tmp = TempDir::new().unwrap();
        let store = FileArtifactStore::new(tmp.path().to_path_buf())
            .await
            .unwrap();

        store
            .save_latest(&serde_json::json!({"score": 1}))
            .await
            .unwrap();
        store
            .save_latest(&serde_json::json!({"score": 2}))
            .await
            .unwrap();

        let loaded = store.load_latest().await.unwrap().unwrap();
        assert_eq!(loaded["score"], 2);
    }

    #[tokio::test]
    async fn load_returns_none_when_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FileArtifactStore::new(tmp.path().to_path_buf())
            .await
            .unwrap();
        assert!(store.load_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_removes_record() {
        let tmp = TempDir::new().unwrap();
        let store = FileArtifactStore::new(tmp.path().to_path_buf())
            .await
            .unwrap();

        store
            .save_latest(&serde_json::json!({"summary": "ok"}))
            .await
            .unwrap();
        store.clear().await.unwrap();
        assert!(store.load_latest().await.unwrap().is_none());

        // Clearing an already-empty store is a no-op.
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn persists_across_store_instances() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();

        {
            let store = FileArtifactStore::new(dir.clone()).await.unwrap();
            store
                .save_latest(&serde_json::json!({"analysis": "persist me"}))
                .await
                .unwrap();
        }
        {
            let store = FileArtifactStore::new(dir).await.unwrap();
            let loaded = store.load_latest().await.unwrap().unwrap();
            assert_eq!(loaded["analysis"], "persist me");
        }
    }
}
