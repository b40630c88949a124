use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

mod config;
pub use config::*;
mod file;
pub use file::*;
mod dry;
pub use dry::*;

use crate::ProbeResult;

pub type RecordId = Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection failure: {0}")]
    Connection(String),
    #[error("record validation failed: {0}")]
    Validation(String),
}

/// Persists probe results and reports the id each one was stored under.
#[async_trait]
pub trait Store: Send + Sync {
    fn kind(&self) -> &str;
    fn name(&self) -> &str;
    async fn insert(&self, result: &ProbeResult) -> Result<RecordId, StoreError>;
}

/// The document written for one result: the record plus its `_id`.
#[derive(Serialize)]
pub(crate) struct StoredRecord<'a> {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub result: &'a ProbeResult,
}

impl<'a> StoredRecord<'a> {
    pub fn new(result: &'a ProbeResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            result,
        }
    }
}

/// Checks a record against the results schema before it is stored.
pub fn validate(result: &ProbeResult) -> Result<(), StoreError> {
    if result.container_id.trim().is_empty() {
        return Err(StoreError::Validation(
            "container_id must not be empty".to_string(),
        ));
    }

    let present = result.present();
    if !result.gateway_check && !present.is_empty() {
        return Err(StoreError::Validation(format!(
            "gateway_check is false but {} is present",
            present[0].field()
        )));
    }

    for resource in present {
        if let Some(data) = result.get(resource) {
            if !(data.is_object() || data.is_array()) {
                return Err(StoreError::Validation(format!(
                    "{} must be a structured document",
                    resource.field()
                )));
            }
        }
    }

    Ok(())
}
