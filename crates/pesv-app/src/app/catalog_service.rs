//! Catalog Service - Reference Data Maintenance
//!
//! Imports the TOML catalog into the store and checks the configured size
//! criteria for gaps in consistency.

use std::path::Path;

use pesv_domain::model::Catalog;
use pesv_domain::repository::CatalogRepository;
use pesv_domain::service::{check_criteria, CriteriaIssue};
use pesv_infra::catalog_loader::load_catalog_from_file;
use pesv_types::Result;
use serde::Serialize;

/// Result of a catalog import
#[derive(Debug, Clone, Serialize)]
pub struct CatalogImport {
    pub missions: usize,
    pub segments: usize,
    pub sizes: usize,
    pub criteria: usize,
    pub vehicle_questions: usize,
    pub driver_questions: usize,
    pub ciius: usize,
    /// Defects found in the imported criteria; the import is kept regardless
    pub issues: Vec<CriteriaIssue>,
}

impl CatalogImport {
    fn new(catalog: &Catalog, issues: Vec<CriteriaIssue>) -> Self {
        Self {
            missions: catalog.missions.len(),
            segments: catalog.segments.len(),
            sizes: catalog.sizes.len(),
            criteria: catalog.criteria.len(),
            vehicle_questions: catalog.vehicle_questions.len(),
            driver_questions: catalog.driver_questions.len(),
            ciius: catalog.ciius.len(),
            issues,
        }
    }
}

/// Replace the store's reference tables with a TOML catalog
pub fn import_catalog<S: CatalogRepository>(store: &S, path: &Path) -> Result<CatalogImport> {
    // Step 1: Load and validate ids
    let catalog = load_catalog_from_file(path)?;

    // Step 2: Check criteria before replacing
    let issues = check_criteria(&catalog);
    for issue in &issues {
        tracing::warn!(%issue, "imported size criteria defect");
    }

    // Step 3: Replace
    let summary = CatalogImport::new(&catalog, issues);
    store.replace_catalog(catalog)?;
    tracing::info!(
        path = %path.display(),
        criteria = summary.criteria,
        issues = summary.issues.len(),
        "catalog imported"
    );
    Ok(summary)
}

/// Check the stored size criteria
pub fn check_catalog<S: CatalogRepository>(store: &S) -> Result<(Catalog, Vec<CriteriaIssue>)> {
    let catalog = store.catalog()?;
    let issues = check_criteria(&catalog);
    Ok((catalog, issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pesv_infra::persistence::JsonStore;
    use std::fs;
    use tempfile::tempdir;

    const CATALOG: &str = r#"
[[missions]]
id = 1
name = "Carga"

[[sizes]]
id = 1
name = "Básico"

[[sizes]]
id = 2
name = "Avanzado"

[[criteria]]
id = 1
mission_id = 1
size_id = 1
vehicles = { min = 0, max = 10 }
drivers = { min = 0, max = 19 }

[[criteria]]
id = 2
mission_id = 1
size_id = 2
vehicles = { min = 5, max = -1 }
drivers = { min = 0, max = -1 }

[[vehicle_questions]]
id = 1
name = "Livianos"

[[ciius]]
code = "4923"
name = "Transporte de carga por carretera"
"#;

    #[test]
    fn test_import_replaces_catalog_and_reports_overlap() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        fs::write(&path, CATALOG).unwrap();

        let store = JsonStore::in_memory();
        let summary = import_catalog(&store, &path).unwrap();
        assert_eq!(summary.sizes, 2);
        assert_eq!(summary.criteria, 2);
        assert_eq!(summary.ciius, 1);
        assert_eq!(summary.issues.len(), 1);

        let (catalog, issues) = check_catalog(&store).unwrap();
        assert_eq!(catalog.vehicle_questions.len(), 1);
        assert_eq!(issues, summary.issues);
    }

    #[test]
    fn test_missing_file_leaves_store_untouched() {
        let dir = tempdir().unwrap();
        let store = JsonStore::in_memory();
        assert!(import_catalog(&store, &dir.path().join("nope.toml")).is_err());
        assert!(store.catalog().unwrap().criteria.is_empty());
    }
}
