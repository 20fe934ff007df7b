//! Query Service - Access Stored Data
//!
//! Read-only access to:
//! - Reference tables (missions, segments, sizes, criteria, questions, CIIU codes)
//! - A company's stored answers and totals
//! - Ad-hoc classification of arbitrary counts

use pesv_domain::model::{
    Ciiu, CompanySize, DriverAnswer, DriverQuestion, FleetAnswer, Mission, Segment,
    SizeCriterion, VehicleQuestion,
};
use pesv_domain::repository::{AnswerRepository, CatalogRepository, CompanyRepository};
use pesv_domain::service::{
    classify, compute_totals, Classification, ClassificationError, SizingTotals,
};
use pesv_types::{CompanyId, Error, MissionId};
use thiserror::Error;

/// Errors specific to the query service
#[derive(Debug, Error)]
pub enum QueryServiceError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error("Store error: {0}")]
    Store(#[from] Error),
}

type QueryResult<T> = std::result::Result<T, QueryServiceError>;

// ============================================================================
// Catalog Queries
// ============================================================================

pub fn list_missions<S: CatalogRepository>(store: &S) -> QueryResult<Vec<Mission>> {
    Ok(store.catalog()?.missions)
}

pub fn list_segments<S: CatalogRepository>(store: &S) -> QueryResult<Vec<Segment>> {
    Ok(store.catalog()?.segments)
}

pub fn list_sizes<S: CatalogRepository>(store: &S) -> QueryResult<Vec<CompanySize>> {
    Ok(store.catalog()?.sizes)
}

/// Size criteria configured for a mission
pub fn criteria_for_mission<S: CatalogRepository>(
    store: &S,
    mission: MissionId,
) -> QueryResult<Vec<SizeCriterion>> {
    require_mission(store, mission)?;
    Ok(store.criteria_for_mission(mission)?)
}

pub fn list_vehicle_questions<S: CatalogRepository>(
    store: &S,
) -> QueryResult<Vec<VehicleQuestion>> {
    Ok(store.vehicle_questions()?)
}

pub fn list_driver_questions<S: CatalogRepository>(
    store: &S,
) -> QueryResult<Vec<DriverQuestion>> {
    Ok(store.driver_questions()?)
}

/// CIIU entries whose code contains `fragment`; all of them without one
pub fn find_ciius<S: CatalogRepository>(
    store: &S,
    fragment: Option<&str>,
) -> QueryResult<Vec<Ciiu>> {
    Ok(store.find_ciius(fragment.unwrap_or(""))?)
}

// ============================================================================
// Answer Queries
// ============================================================================

/// Stored fleet answers of a company
pub fn fleet_answers<S>(store: &S, company: CompanyId) -> QueryResult<Vec<FleetAnswer>>
where
    S: CompanyRepository + AnswerRepository,
{
    require_company(store, company)?;
    Ok(AnswerRepository::fleet_answers(store, company)?)
}

/// Stored driver answers of a company
pub fn driver_answers<S>(store: &S, company: CompanyId) -> QueryResult<Vec<DriverAnswer>>
where
    S: CompanyRepository + AnswerRepository,
{
    require_company(store, company)?;
    Ok(AnswerRepository::driver_answers(store, company)?)
}

/// Totals over a company's stored answers
pub fn company_totals<S>(store: &S, company: CompanyId) -> QueryResult<SizingTotals>
where
    S: CompanyRepository + AnswerRepository,
{
    let fleets = fleet_answers(store, company)?;
    let drivers = driver_answers(store, company)?;
    Ok(compute_totals(
        fleets.iter().map(|row| &row.counts),
        drivers.iter().map(|row| row.quantity),
    ))
}

// ============================================================================
// Classification
// ============================================================================

/// Classify counts without touching any company
pub fn classify_counts<S: CatalogRepository>(
    store: &S,
    mission: MissionId,
    totals: SizingTotals,
) -> QueryResult<(Classification, CompanySize)> {
    require_mission(store, mission)?;
    let criteria = store.criteria_for_mission(mission)?;
    let classification = classify(&criteria, mission, totals)?;
    let size = store
        .find_size(classification.size_id)?
        .ok_or_else(|| QueryServiceError::NotFound(format!("size {}", classification.size_id)))?;
    Ok((classification, size))
}

fn require_mission<S: CatalogRepository>(store: &S, mission: MissionId) -> QueryResult<()> {
    match store.find_mission(mission)? {
        Some(_) => Ok(()),
        None => Err(QueryServiceError::NotFound(format!("mission {}", mission))),
    }
}

fn require_company<S: CompanyRepository>(store: &S, company: CompanyId) -> QueryResult<()> {
    match store.find_by_id(company)? {
        Some(c) if !c.is_deleted() => Ok(()),
        _ => Err(QueryServiceError::NotFound(format!("company {}", company))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pesv_domain::model::{Catalog, CompanyDraft, CountRange, FleetCounts};
    use pesv_domain::repository::{SizingTransaction, UnitOfWork};
    use pesv_infra::persistence::JsonStore;
    use pesv_types::{CriterionId, DriverQuestionId, SizeId, VehicleQuestionId};

    fn store() -> JsonStore {
        let store = JsonStore::in_memory();
        store
            .replace_catalog(Catalog {
                missions: vec![Mission { id: MissionId(1), name: "Carga".to_string() }],
                sizes: vec![CompanySize {
                    id: SizeId(1),
                    name: "Básico".to_string(),
                    description: String::new(),
                }],
                criteria: vec![SizeCriterion {
                    id: CriterionId(1),
                    mission_id: MissionId(1),
                    size_id: SizeId(1),
                    vehicles: CountRange::bounded(0, 10),
                    drivers: CountRange::at_least(0),
                }],
                ciius: vec![
                    Ciiu { code: "4921".to_string(), name: "Pasajeros".to_string() },
                    Ciiu { code: "4923".to_string(), name: "Carga".to_string() },
                    Ciiu { code: "5210".to_string(), name: "Depósito".to_string() },
                ],
                ..Default::default()
            })
            .unwrap();
        store
    }

    #[test]
    fn test_find_ciius_by_code_fragment() {
        let store = store();
        assert_eq!(find_ciius(&store, None).unwrap().len(), 3);
        let carriers = find_ciius(&store, Some("492")).unwrap();
        assert_eq!(carriers.len(), 2);
        assert_eq!(carriers[1].name, "Carga");
        assert!(find_ciius(&store, Some("77")).unwrap().is_empty());
    }

    #[test]
    fn test_criteria_of_unknown_mission() {
        let store = store();
        assert_eq!(criteria_for_mission(&store, MissionId(1)).unwrap().len(), 1);
        assert!(matches!(
            criteria_for_mission(&store, MissionId(9)),
            Err(QueryServiceError::NotFound(_))
        ));
    }

    #[test]
    fn test_classify_counts() {
        let store = store();
        let totals = SizingTotals { vehicles: 4, drivers: 100 };
        let (classification, size) = classify_counts(&store, MissionId(1), totals).unwrap();
        assert_eq!(classification.size_id, SizeId(1));
        assert_eq!(size.name, "Básico");

        let err = classify_counts(&store, MissionId(1), SizingTotals { vehicles: 11, drivers: 0 })
            .unwrap_err();
        assert!(matches!(
            err,
            QueryServiceError::Classification(ClassificationError::NotFound { .. })
        ));
    }

    #[test]
    fn test_company_totals_from_stored_answers() {
        let store = store();
        let company = store.insert(CompanyDraft::new("Acme", "900"), Utc::now()).unwrap();
        let mut tx = store.begin().unwrap();
        tx.upsert_fleet_answer(
            company.id,
            VehicleQuestionId(1),
            FleetCounts { owned: 2, renting: 1, ..Default::default() },
        )
        .unwrap();
        tx.upsert_driver_answer(company.id, DriverQuestionId(1), 6).unwrap();
        tx.commit().unwrap();

        let totals = company_totals(&store, company.id).unwrap();
        assert_eq!(totals, SizingTotals { vehicles: 3, drivers: 6 });
        assert!(company_totals(&store, CompanyId(77)).is_err());
    }
}
