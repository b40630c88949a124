use std::sync::Arc;

use crate::{LogStore, Store, StoreConfig};

/// Builds the configured store, or a dry one when `dry` is set.
pub fn config_store(conf: &StoreConfig, dry: bool) -> Arc<dyn Store> {
    let store: Arc<dyn Store> = if dry {
        Arc::new(LogStore::new("dry"))
    } else {
        conf.build()
    };

    let mode = if dry { "Dry" } else { "Live" };
    log::info!(
        "Store [{}] - [{}] is running on {} mode!",
        store.kind(),
        store.name(),
        mode,
    );
    store
}
