use std::path::PathBuf;

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use crate::ProbeResult;

use super::{validate, RecordId, Store, StoreError, StoredRecord};

const KIND: &str = "file";

/// Appends each result as a JSON line to a file.
#[derive(Debug)]
pub struct FileStore {
    name: String,
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl Store for FileStore {
    fn kind(&self) -> &str {
        KIND
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn insert(&self, result: &ProbeResult) -> Result<RecordId, StoreError> {
        validate(result)?;

        let record = StoredRecord::new(result);
        let mut line =
            serde_json::to_string(&record).map_err(|e| StoreError::Validation(e.to_string()))?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                StoreError::Connection(format!(
                    "failed to open {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        log::debug!(
            "[{} / {}] - added {} to {}",
            KIND,
            self.name,
            record.id,
            self.path.display()
        );
        Ok(record.id)
    }
}
