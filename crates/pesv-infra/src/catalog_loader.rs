//! Reference catalog loader from TOML
//!
//! ```toml
//! [[missions]]
//! id = 1
//! name = "Transporte de carga"
//!
//! [[sizes]]
//! id = 1
//! name = "Básico"
//!
//! [[criteria]]
//! id = 1
//! mission_id = 1
//! size_id = 1
//! vehicles = { min = 0, max = 10 }
//! drivers = { min = 0, max = -1 }   # -1: no upper limit
//!
//! [[ciius]]
//! code = "4923"
//! name = "Transporte de carga por carretera"
//! ```

use std::fs;
use std::path::Path;

use pesv_domain::model::Catalog;
use pesv_types::{ConfigError, Error, Result};

/// Load a catalog from a TOML file
pub fn load_catalog_from_file(path: &Path) -> Result<Catalog> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(ConfigError::ParseError(format!(
            "Failed to read catalog file {}: {}",
            path.display(),
            e
        )))
    })?;

    load_catalog_from_str(&content)
}

/// Load a catalog from a TOML string
pub fn load_catalog_from_str(toml_content: &str) -> Result<Catalog> {
    let catalog: Catalog = toml::from_str(toml_content).map_err(|e| {
        Error::Config(ConfigError::ParseError(format!(
            "Failed to parse catalog TOML: {}",
            e
        )))
    })?;

    let dupes = catalog.duplicate_ids();
    if !dupes.is_empty() {
        return Err(Error::Config(ConfigError::ParseError(format!(
            "Duplicate ids in catalog: {}",
            dupes.join(", ")
        ))));
    }

    tracing::debug!(
        missions = catalog.missions.len(),
        sizes = catalog.sizes.len(),
        criteria = catalog.criteria.len(),
        ciius = catalog.ciius.len(),
        "loaded catalog"
    );
    Ok(catalog)
}
