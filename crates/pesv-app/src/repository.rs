//! Repository adapters for persistence layer

use std::path::PathBuf;

use pesv_infra::persistence::JsonStore;
use pesv_types::Result;

use crate::config::Config;

/// Open the JSON store at the configured data directory
pub fn open_store(config: &Config) -> Result<JsonStore> {
    let data_dir = config.data_dir()?;
    JsonStore::open(data_dir)
}

/// Open the JSON store at a custom directory
pub fn open_store_at(data_dir: PathBuf) -> Result<JsonStore> {
    JsonStore::open(data_dir)
}
