use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{FileStore, LogStore, Store};

/// The `store` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Appends one JSON document per line to `path`.
    File {
        path: String,
        #[serde(default = "default_name")]
        name: String,
    },
    /// Only logs what would be stored.
    Log {
        #[serde(default = "default_name")]
        name: String,
    },
}

fn default_name() -> String {
    "results".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Log {
            name: default_name(),
        }
    }
}

impl StoreConfig {
    pub fn build(&self) -> Arc<dyn Store> {
        match self {
            StoreConfig::File { path, name } => Arc::new(FileStore::new(name, path)),
            StoreConfig::Log { name } => Arc::new(LogStore::new(name)),
        }
    }
}
