//! File-based store implementing every repository trait

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use pesv_domain::model::{Catalog, Company, CompanyDraft, DriverAnswer, FleetAnswer};
use pesv_domain::repository::{
    AnswerRepository, CatalogRepository, CompanyRepository, UnitOfWork,
};
use pesv_types::{CompanyId, Error, Result, StoreError};

use super::dataset::Dataset;
use super::transaction::JsonStoreTransaction;

/// JSON document store
///
/// Every write goes to a temporary file that is renamed over the store
/// file, so a failed write leaves the previous document intact. The
/// in-memory copy is replaced only after the file write succeeded.
///
/// The store does not lock the file: two processes writing the same store
/// race, and the last rename wins.
pub struct JsonStore {
    store_path: Option<PathBuf>,
    data: RefCell<Dataset>,
}

impl JsonStore {
    pub const FILE_NAME: &'static str = "pesv.json";

    /// Create or load a store in a directory
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join(Self::FILE_NAME);

        let data: Dataset = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).map_err(|e| {
                StoreError::Corrupted(format!("{}: {}", store_path.display(), e))
            })?
        } else {
            Dataset::default()
        };

        tracing::debug!(path = %store_path.display(), "opened store");

        Ok(Self {
            store_path: Some(store_path),
            data: RefCell::new(data),
        })
    }

    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self::from_dataset(Dataset::default())
    }

    pub fn from_dataset(data: Dataset) -> Self {
        Self {
            store_path: None,
            data: RefCell::new(data),
        }
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&Dataset) -> T) -> T {
        f(&self.data.borrow())
    }

    pub(crate) fn snapshot(&self) -> Dataset {
        self.data.borrow().clone()
    }

    /// Persist a new version of the document and make it current
    pub(crate) fn write(&self, next: Dataset) -> Result<()> {
        if let Some(path) = &self.store_path {
            persist(path, &next)?;
        }
        *self.data.borrow_mut() = next;
        Ok(())
    }
}

fn persist(path: &Path, data: &Dataset) -> Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let commit_failed = |e: std::io::Error| {
        Error::from(StoreError::CommitFailed(format!("{}: {}", path.display(), e)))
    };

    let file = File::create(&tmp_path).map_err(commit_failed)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush().map_err(commit_failed)?;
    drop(writer);
    fs::rename(&tmp_path, path).map_err(commit_failed)?;
    Ok(())
}

impl CatalogRepository for JsonStore {
    fn catalog(&self) -> Result<Catalog> {
        Ok(self.read(|d| d.catalog.clone()))
    }

    fn replace_catalog(&self, catalog: Catalog) -> Result<()> {
        let mut next = self.snapshot();
        next.catalog = catalog;
        self.write(next)
    }
}

impl CompanyRepository for JsonStore {
    fn insert(&self, draft: CompanyDraft, now: DateTime<Utc>) -> Result<Company> {
        let mut next = self.snapshot();
        next.company_seq += 1;
        let company = draft.into_company(CompanyId(next.company_seq), now);
        next.companies.insert(company.id, company.clone());
        self.write(next)?;
        Ok(company)
    }

    fn update(&self, company: &Company) -> Result<()> {
        let mut next = self.snapshot();
        match next.companies.get_mut(&company.id) {
            Some(existing) => *existing = company.clone(),
            None => return Err(Error::NotFound(format!("company {}", company.id))),
        }
        self.write(next)
    }

    fn find_by_id(&self, id: CompanyId) -> Result<Option<Company>> {
        Ok(self.read(|d| d.companies.get(&id).cloned()))
    }

    fn find_all(&self) -> Result<Vec<Company>> {
        Ok(self.read(|d| d.companies.values().cloned().collect()))
    }
}

impl AnswerRepository for JsonStore {
    fn fleet_answers(&self, company: CompanyId) -> Result<Vec<FleetAnswer>> {
        Ok(self.read(|d| d.fleet_answers_of(company)))
    }

    fn driver_answers(&self, company: CompanyId) -> Result<Vec<DriverAnswer>> {
        Ok(self.read(|d| d.driver_answers_of(company)))
    }
}

impl UnitOfWork for JsonStore {
    type Transaction<'a> = JsonStoreTransaction<'a>;

    fn begin(&self) -> Result<JsonStoreTransaction<'_>> {
        Ok(JsonStoreTransaction::new(self, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pesv_domain::model::{CountRange, Mission, SizeCriterion, VehicleQuestion};
    use pesv_types::{CriterionId, MissionId, SizeId, VehicleQuestionId};
    use tempfile::tempdir;

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = JsonStore::in_memory();
        let a = store.insert(CompanyDraft::new("A", "1"), Utc::now()).unwrap();
        let b = store.insert(CompanyDraft::new("B", "2"), Utc::now()).unwrap();
        assert_eq!(a.id, CompanyId(1));
        assert_eq!(b.id, CompanyId(2));
        assert_eq!(store.find_all().unwrap().len(), 2);
        assert_eq!(store.find_by_nit("2").unwrap().map(|c| c.id), Some(CompanyId(2)));
    }

    #[test]
    fn test_update_unknown_company_fails() {
        let store = JsonStore::in_memory();
        let ghost = CompanyDraft::new("Ghost", "0").into_company(CompanyId(9), Utc::now());
        assert!(matches!(store.update(&ghost), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_reopen_reads_back_written_data() {
        let dir = tempdir().unwrap();
        {
            let store = JsonStore::open(dir.path().to_path_buf()).unwrap();
            store
                .replace_catalog(Catalog {
                    missions: vec![Mission { id: MissionId(1), name: "Carga".to_string() }],
                    vehicle_questions: vec![VehicleQuestion {
                        id: VehicleQuestionId(1),
                        name: "Camiones".to_string(),
                    }],
                    ..Default::default()
                })
                .unwrap();
            store.insert(CompanyDraft::new("Acme", "900"), Utc::now()).unwrap();
        }

        let store = JsonStore::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.find_mission(MissionId(1)).unwrap().unwrap().name, "Carga");
        assert_eq!(store.vehicle_questions().unwrap().len(), 1);
        assert_eq!(store.find_by_name("Acme").unwrap().unwrap().nit, "900");
        assert!(!dir.path().join("pesv.json.tmp").exists());
    }

    #[test]
    fn test_reopen_keeps_huge_criterion_bounds() {
        let dir = tempdir().unwrap();
        let criterion = SizeCriterion {
            id: CriterionId(1),
            mission_id: MissionId(1),
            size_id: SizeId(1),
            vehicles: CountRange::bounded(0, u64::MAX),
            drivers: CountRange::at_least(0),
        };
        {
            let store = JsonStore::open(dir.path().to_path_buf()).unwrap();
            let catalog = Catalog { criteria: vec![criterion.clone()], ..Default::default() };
            store.replace_catalog(catalog).unwrap();
        }

        let store = JsonStore::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(store.catalog().unwrap().criteria, vec![criterion]);
    }

    #[test]
    fn test_corrupted_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(JsonStore::FILE_NAME), "{not json").unwrap();
        let result = JsonStore::open(dir.path().to_path_buf());
        assert!(matches!(result, Err(Error::Store(StoreError::Corrupted(_)))));
    }
}
