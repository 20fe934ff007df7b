//! Sizing Service - Core Use Case for Company Size Classification
//!
//! This service orchestrates one questionnaire submission:
//! 1. Resolve the company and its mission
//! 2. Validate vehicle and driver answers against the catalog
//! 3. Upsert the valid answers inside one transaction
//! 4. Total the company's answers (stored rows plus this submission)
//! 5. Classify the totals against the mission's size criteria
//! 6. Stage the size and diagnosis step when classification succeeded
//! 7. Commit
//!
//! Answers are committed even when classification fails. The company's
//! size and step only change together with a successful classification.

use chrono::Utc;
use pesv_domain::model::{DiagnosisStep, DriverAnswerInput, VehicleAnswerInput};
use pesv_domain::repository::{
    CatalogRepository, CompanyRepository, SizingTransaction, UnitOfWork,
};
use pesv_domain::service::{
    classify, compute_totals, validate_driver_answers, validate_vehicle_answers, Classification,
    ClassificationError, RecordError, SizingTotals,
};
use pesv_infra::answer_payload::AnswerPayload;
use pesv_types::{CompanyId, Error, SizeId};
use serde::Serialize;
use thiserror::Error;

/// Errors that stop a submission before anything is written
#[derive(Debug, Error)]
pub enum SizingError {
    #[error("Company {0} not found")]
    CompanyNotFound(CompanyId),

    #[error("Company {0} has no mission assigned")]
    MissionNotAssigned(CompanyId),

    #[error("Store error: {0}")]
    Store(#[from] Error),
}

/// Answers submitted for one company
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSubmission {
    pub company_id: CompanyId,
    pub vehicles: Vec<VehicleAnswerInput>,
    pub drivers: Vec<DriverAnswerInput>,
}

impl AnswerSubmission {
    pub fn new(company_id: CompanyId) -> Self {
        Self {
            company_id,
            vehicles: Vec::new(),
            drivers: Vec::new(),
        }
    }

    pub fn with_vehicles(mut self, vehicles: Vec<VehicleAnswerInput>) -> Self {
        self.vehicles = vehicles;
        self
    }

    pub fn with_drivers(mut self, drivers: Vec<DriverAnswerInput>) -> Self {
        self.drivers = drivers;
        self
    }

    /// Build from a client payload; an explicit company id wins over the payload's
    pub fn from_payload(
        payload: AnswerPayload,
        company_id: Option<CompanyId>,
    ) -> std::result::Result<Self, Error> {
        let company_id = company_id.or(payload.company_id).ok_or_else(|| {
            Error::InvalidInput("answer payload does not name a company".to_string())
        })?;
        Ok(Self {
            company_id,
            vehicles: payload.vehicles,
            drivers: payload.drivers,
        })
    }
}

/// Classification result of a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SizingOutcome {
    Sized(Classification),
    Failed(ClassificationError),
}

/// Everything a caller needs to answer a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizingReport {
    pub company_id: CompanyId,
    pub totals: SizingTotals,
    pub outcome: SizingOutcome,
    /// Company size after the submission (unchanged if classification failed)
    pub size_id: Option<SizeId>,
    pub diagnosis_step: DiagnosisStep,
    pub vehicles_saved: usize,
    pub drivers_saved: usize,
    pub vehicle_errors: Vec<RecordError>,
    pub driver_errors: Vec<RecordError>,
}

impl SizingReport {
    pub fn is_sized(&self) -> bool {
        matches!(self.outcome, SizingOutcome::Sized(_))
    }

    pub fn has_record_errors(&self) -> bool {
        !self.vehicle_errors.is_empty() || !self.driver_errors.is_empty()
    }

    pub fn classification_error(&self) -> Option<&ClassificationError> {
        match &self.outcome {
            SizingOutcome::Failed(err) => Some(err),
            SizingOutcome::Sized(_) => None,
        }
    }
}

/// Main entry point: save a company's answers and size the company
pub fn submit_answers<S>(
    store: &S,
    submission: &AnswerSubmission,
) -> std::result::Result<SizingReport, SizingError>
where
    S: CatalogRepository + CompanyRepository + UnitOfWork,
{
    let company_id = submission.company_id;
    tracing::info!(
        company = %company_id,
        vehicles = submission.vehicles.len(),
        drivers = submission.drivers.len(),
        "sizing submission received"
    );

    // Step 1: Resolve company and mission before any write
    let mut company = store
        .find_by_id(company_id)?
        .filter(|c| !c.is_deleted())
        .ok_or(SizingError::CompanyNotFound(company_id))?;
    let mission = company
        .mission_id
        .ok_or(SizingError::MissionNotAssigned(company_id))?;

    // Step 2: Validate answers
    let catalog = store.catalog()?;
    let vehicles = validate_vehicle_answers(&submission.vehicles, |q| {
        catalog.has_vehicle_question(q)
    });
    let drivers = validate_driver_answers(&submission.drivers, |q| catalog.has_driver_question(q));

    // Step 3: Upsert valid answers
    let mut tx = store.begin()?;
    for answer in &vehicles.accepted {
        tx.upsert_fleet_answer(company_id, answer.question_id, answer.counts)?;
    }
    for answer in &drivers.accepted {
        tx.upsert_driver_answer(company_id, answer.question_id, answer.quantity)?;
    }

    // Step 4: Totals over stored rows merged with this submission
    let fleet_rows = tx.fleet_answers(company_id)?;
    let driver_rows = tx.driver_answers(company_id)?;
    let totals = compute_totals(
        fleet_rows.iter().map(|row| &row.counts),
        driver_rows.iter().map(|row| row.quantity),
    );

    // Step 5: Classify
    let outcome = match classify(&catalog.criteria_for_mission(mission), mission, totals) {
        Ok(classification) => {
            // Step 6: Size and step change only with a resolved size
            company.mark_sized(classification.size_id, Utc::now());
            tx.stage_company(company.clone())?;
            SizingOutcome::Sized(classification)
        }
        Err(err) => {
            tracing::warn!(company = %company_id, error = %err, "size classification failed");
            SizingOutcome::Failed(err)
        }
    };

    // Step 7: Commit
    tx.commit()?;

    let report = SizingReport {
        company_id,
        totals,
        outcome,
        size_id: company.size_id,
        diagnosis_step: company.diagnosis_step,
        vehicles_saved: vehicles.accepted.len(),
        drivers_saved: drivers.accepted.len(),
        vehicle_errors: vehicles.rejected,
        driver_errors: drivers.rejected,
    };

    tracing::info!(
        company = %company_id,
        total_vehicles = totals.vehicles,
        total_drivers = totals.drivers,
        sized = report.is_sized(),
        rejected = report.vehicle_errors.len() + report.driver_errors.len(),
        "sizing submission processed"
    );

    Ok(report)
}
