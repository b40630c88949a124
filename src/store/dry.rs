use async_trait::async_trait;

use crate::ProbeResult;

use super::{validate, RecordId, Store, StoreError, StoredRecord};

const KIND: &str = "log";

/// Dry store: writes the document to the log instead of persisting it.
#[derive(Debug)]
pub struct LogStore {
    name: String,
}

impl LogStore {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl Store for LogStore {
    fn kind(&self) -> &str {
        KIND
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn insert(&self, result: &ProbeResult) -> Result<RecordId, StoreError> {
        validate(result)?;

        let record = StoredRecord::new(result);
        let doc =
            serde_json::to_string(&record).map_err(|e| StoreError::Validation(e.to_string()))?;
        log::info!("[{} / {} / dry_insert] - {}", KIND, self.name, doc);

        Ok(record.id)
    }
}
