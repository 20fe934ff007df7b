//! Company Service - Company Registration and Maintenance
//!
//! - Create a company with unique name and NIT
//! - Read, list and partially update companies
//! - Soft delete (rows are kept with `deleted_at` set)
//!
//! A sized company whose mission changes is classified again from its
//! stored answers. The update is refused when the new mission has no
//! single matching criterion, so `size_id` never points at a size of
//! another mission.

use chrono::Utc;
use pesv_domain::model::{Company, CompanyDraft, CompanyPatch};
use pesv_domain::repository::{
    CatalogRepository, CompanyRepository, SizingTransaction, UnitOfWork,
};
use pesv_domain::service::{classify, compute_totals, ClassificationError};
use pesv_types::{CompanyId, Error, MissionId, SegmentId};
use thiserror::Error;

/// Errors specific to the company service
#[derive(Debug, Error)]
pub enum CompanyServiceError {
    #[error("A company with NIT {0} already exists")]
    NitAlreadyExists(String),

    #[error("A company named {0} already exists")]
    NameAlreadyExists(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Mission {0} not found")]
    MissionNotFound(MissionId),

    #[error("Segment {0} not found")]
    SegmentNotFound(SegmentId),

    #[error("CIIU code {0} not found")]
    CiiuNotFound(String),

    #[error("Mission change rejected: {0}")]
    Reclassification(#[source] ClassificationError),

    #[error("Company {0} not found")]
    CompanyNotFound(CompanyId),

    #[error("Store error: {0}")]
    Store(#[from] Error),
}

type ServiceResult<T> = std::result::Result<T, CompanyServiceError>;

/// Register a new company
pub fn create_company<S>(store: &S, draft: CompanyDraft) -> ServiceResult<Company>
where
    S: CatalogRepository + CompanyRepository,
{
    let draft = draft.normalized();

    // Step 1: Field checks
    require_text("name", &draft.name)?;
    require_text("nit", &draft.nit)?;
    check_email(draft.email.as_deref())?;

    // Step 2: References and uniqueness
    check_references(store, draft.mission_id, draft.segment_id)?;
    check_ciius(store, &draft.ciius)?;
    check_unique(store, None, Some(&draft.name), Some(&draft.nit))?;

    // Step 3: Insert
    let company = store.insert(draft, Utc::now())?;
    tracing::info!(company = %company.id, nit = %company.nit, "company created");
    Ok(company)
}

/// Fetch a company that has not been deleted
pub fn get_company<S: CompanyRepository>(store: &S, id: CompanyId) -> ServiceResult<Company> {
    store
        .find_by_id(id)?
        .filter(|c| !c.is_deleted())
        .ok_or(CompanyServiceError::CompanyNotFound(id))
}

/// All companies ordered by id
pub fn list_companies<S: CompanyRepository>(
    store: &S,
    include_deleted: bool,
) -> ServiceResult<Vec<Company>> {
    let mut companies: Vec<Company> = store
        .find_all()?
        .into_iter()
        .filter(|c| include_deleted || !c.is_deleted())
        .collect();
    companies.sort_by_key(|c| c.id);
    Ok(companies)
}

/// Apply a partial update
pub fn update_company<S>(
    store: &S,
    id: CompanyId,
    mut patch: CompanyPatch,
) -> ServiceResult<Company>
where
    S: CatalogRepository + CompanyRepository + UnitOfWork,
{
    let mut company = get_company(store, id)?;
    if patch.is_empty() {
        return Ok(company);
    }
    patch.name = patch.name.map(|n| n.trim().to_string());
    patch.nit = patch.nit.map(|n| n.trim().to_string());

    if let Some(name) = &patch.name {
        require_text("name", name)?;
    }
    if let Some(nit) = &patch.nit {
        require_text("nit", nit)?;
    }
    check_email(patch.email.as_deref())?;
    check_references(store, patch.mission_id, patch.segment_id)?;
    if let Some(codes) = &patch.ciius {
        check_ciius(store, codes)?;
    }
    check_unique(store, Some(id), patch.name.as_deref(), patch.nit.as_deref())?;

    let previous_mission = company.mission_id;
    company.apply_patch(patch, Utc::now());

    let mut tx = store.begin()?;
    if company.mission_id != previous_mission && company.size_id.is_some() {
        resize_for_mission(store, &tx, &mut company)?;
    }
    tx.stage_company(company.clone())?;
    tx.commit()?;

    tracing::info!(company = %id, "company updated");
    Ok(company)
}

/// Classify a sized company again under its new mission
fn resize_for_mission<S, T>(store: &S, tx: &T, company: &mut Company) -> ServiceResult<()>
where
    S: CatalogRepository,
    T: SizingTransaction,
{
    let Some(mission) = company.mission_id else {
        return Ok(());
    };
    let totals = compute_totals(
        tx.fleet_answers(company.id)?.iter().map(|row| &row.counts),
        tx.driver_answers(company.id)?.iter().map(|row| row.quantity),
    );

    match classify(&store.criteria_for_mission(mission)?, mission, totals) {
        Ok(classification) => {
            tracing::info!(
                company = %company.id,
                mission = %mission,
                size = %classification.size_id,
                "company resized after mission change"
            );
            let now = company.updated_at;
            company.mark_sized(classification.size_id, now);
            Ok(())
        }
        Err(err) => {
            tracing::warn!(company = %company.id, error = %err, "mission change rejected");
            Err(CompanyServiceError::Reclassification(err))
        }
    }
}

/// Mark a company as deleted
pub fn delete_company<S: CompanyRepository>(store: &S, id: CompanyId) -> ServiceResult<Company> {
    let mut company = get_company(store, id)?;
    let now = Utc::now();
    company.deleted_at = Some(now);
    company.updated_at = now;
    store.update(&company)?;
    tracing::info!(company = %id, "company deleted");
    Ok(company)
}

fn require_text(field: &'static str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(CompanyServiceError::InvalidField {
            field,
            reason: "must not be blank".to_string(),
        });
    }
    Ok(())
}

fn check_email(email: Option<&str>) -> ServiceResult<()> {
    match email {
        Some(email) if !email.trim().is_empty() && !email.contains('@') => {
            Err(CompanyServiceError::InvalidField {
                field: "email",
                reason: format!("'{}' is not an email address", email),
            })
        }
        _ => Ok(()),
    }
}

fn check_references<S: CatalogRepository>(
    store: &S,
    mission: Option<MissionId>,
    segment: Option<SegmentId>,
) -> ServiceResult<()> {
    if let Some(mission) = mission {
        if store.find_mission(mission)?.is_none() {
            return Err(CompanyServiceError::MissionNotFound(mission));
        }
    }
    if let Some(segment) = segment {
        if store.find_segment(segment)?.is_none() {
            return Err(CompanyServiceError::SegmentNotFound(segment));
        }
    }
    Ok(())
}

fn check_ciius<S: CatalogRepository>(store: &S, codes: &[String]) -> ServiceResult<()> {
    if codes.is_empty() {
        return Ok(());
    }
    let catalog = store.catalog()?;
    match codes.iter().map(|c| c.trim()).find(|c| catalog.ciiu(c).is_none()) {
        Some(unknown) => Err(CompanyServiceError::CiiuNotFound(unknown.to_string())),
        None => Ok(()),
    }
}

/// Name and NIT are unique across all rows, deleted ones included
fn check_unique<S: CompanyRepository>(
    store: &S,
    own_id: Option<CompanyId>,
    name: Option<&str>,
    nit: Option<&str>,
) -> ServiceResult<()> {
    let others = |c: &Company| Some(c.id) != own_id;

    if let Some(nit) = nit.map(str::trim) {
        if store.find_by_nit(nit)?.filter(others).is_some() {
            return Err(CompanyServiceError::NitAlreadyExists(nit.to_string()));
        }
    }
    if let Some(name) = name.map(str::trim) {
        if store.find_by_name(name)?.filter(others).is_some() {
            return Err(CompanyServiceError::NameAlreadyExists(name.to_string()));
        }
    }
    Ok(())
}
