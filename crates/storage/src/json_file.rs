//! Results kept as a single JSON array on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use training_core::model::QuizResult;
use training_core::time::Clock;

use crate::repository::{
    QuizResultRecord, ResultId, ResultRepository, Storage, StorageError, StoredResult, ser,
};

fn io(e: std::io::Error) -> StorageError {
    StorageError::Io(e.to_string())
}

/// File-backed repository. A missing file is an empty store.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// crash mid-write never leaves a truncated array behind.
#[derive(Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
    clock: Clock,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
            clock: Clock::default(),
        }
    }

    /// Source of `storedAt` for appended records.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<QuizResultRecord>, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(ser),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(io(e)),
        }
    }

    async fn write_records(&self, records: &[QuizResultRecord]) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(records).map_err(ser)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(io)?;
            }
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, bytes).await.map_err(io)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io)
    }
}

#[async_trait]
impl ResultRepository for JsonFileRepository {
    async fn append_result(&self, result: &QuizResult) -> Result<ResultId, StorageError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        let id = records.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        records.push(QuizResultRecord::from_result(id, result, self.clock.now()));
        self.write_records(&records).await?;
        Ok(id)
    }

    async fn list_results(&self) -> Result<Vec<StoredResult>, StorageError> {
        let _guard = self.lock.lock().await;
        self.read_records()
            .await?
            .into_iter()
            .map(QuizResultRecord::into_stored)
            .collect()
    }

    /// Removes the file whatever it holds. An unreadable store reports 0 removed.
    async fn clear_results(&self) -> Result<u64, StorageError> {
        let _guard = self.lock.lock().await;
        let removed = match self.read_records().await {
            Ok(records) => records.len() as u64,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "clearing unreadable result file"
                );
                0
            }
        };
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(removed),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(io(e)),
        }
    }
}

impl Storage {
    /// Build a `Storage` backed by a JSON file at `path`.
    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>, clock: Clock) -> Self {
        let results: Arc<dyn ResultRepository> =
            Arc::new(JsonFileRepository::new(path).with_clock(clock));
        Self { results }
    }
}
