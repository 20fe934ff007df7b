//! Answer aggregation: record validation and vehicle/driver totals

use pesv_types::{DriverQuestionId, VehicleQuestionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::{CountInput, DriverAnswerInput, FleetCounts, VehicleAnswerInput};

/// Aggregate counts a size classification is computed from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingTotals {
    pub vehicles: u64,
    pub drivers: u64,
}

impl fmt::Display for SizingTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vehicles, {} drivers", self.vehicles, self.drivers)
    }
}

/// A single field-level problem in an answer record
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldIssue {
    #[error("{field} must be zero or greater (got {value})")]
    NegativeCount { field: String, value: i64 },

    #[error("{field} must be a whole number (got {value})")]
    InvalidCount { field: String, value: String },

    #[error("question is required")]
    MissingQuestion,

    #[error("question {id} does not exist")]
    UnknownQuestion { id: u64 },
}

/// Every problem found in one answer record of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordError {
    /// Position of the record in the submitted batch
    pub index: usize,
    pub question_id: Option<u64>,
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let issues: Vec<String> = self.issues.iter().map(|i| i.to_string()).collect();
        match self.question_id {
            Some(q) => write!(f, "record {} (question {}): {}", self.index, q, issues.join("; ")),
            None => write!(f, "record {}: {}", self.index, issues.join("; ")),
        }
    }
}

impl std::error::Error for RecordError {}

/// Vehicle answer that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidVehicleAnswer {
    pub question_id: VehicleQuestionId,
    pub counts: FleetCounts,
}

/// Driver answer that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidDriverAnswer {
    pub question_id: DriverQuestionId,
    pub quantity: u64,
}

/// Outcome of validating a batch: accepted records plus the rejected ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T> {
    pub accepted: Vec<T>,
    pub rejected: Vec<RecordError>,
}

impl<T> Default for Validated<T> {
    fn default() -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

fn non_negative(field: &str, value: &CountInput, issues: &mut Vec<FieldIssue>) -> u64 {
    match value {
        CountInput::Number(n) if *n >= 0 => *n as u64,
        CountInput::Number(n) => {
            issues.push(FieldIssue::NegativeCount {
                field: field.to_string(),
                value: *n,
            });
            0
        }
        CountInput::Invalid(raw) => {
            issues.push(FieldIssue::InvalidCount {
                field: field.to_string(),
                value: raw.clone(),
            });
            0
        }
    }
}

fn check_question(
    question_id: Option<u64>,
    question_exists: &impl Fn(u64) -> bool,
    issues: &mut Vec<FieldIssue>,
) -> Option<u64> {
    match question_id {
        None => {
            issues.push(FieldIssue::MissingQuestion);
            None
        }
        Some(id) if !question_exists(id) => {
            issues.push(FieldIssue::UnknownQuestion { id });
            None
        }
        Some(id) => Some(id),
    }
}

/// Validate vehicle answers, collecting every failing record
///
/// `question_exists` decides whether a question id names a known vehicle
/// category; pass `|_| true` to skip the lookup.
pub fn validate_vehicle_answers(
    inputs: &[VehicleAnswerInput],
    question_exists: impl Fn(VehicleQuestionId) -> bool,
) -> Validated<ValidVehicleAnswer> {
    let exists = |id: u64| question_exists(VehicleQuestionId(id));
    let mut out = Validated::default();

    for (index, input) in inputs.iter().enumerate() {
        let mut issues = Vec::new();
        let question = check_question(input.question_id, &exists, &mut issues);
        let [owned, third_party, arrended, contractors, intermediation, leasing, renting] = input
            .fields()
            .map(|(field, value)| non_negative(field, value, &mut issues));

        match question {
            Some(id) if issues.is_empty() => out.accepted.push(ValidVehicleAnswer {
                question_id: VehicleQuestionId(id),
                counts: FleetCounts {
                    owned,
                    third_party,
                    arrended,
                    contractors,
                    intermediation,
                    leasing,
                    renting,
                },
            }),
            _ => {
                tracing::debug!(index, question = ?input.question_id, "rejected vehicle answer");
                out.rejected.push(RecordError {
                    index,
                    question_id: input.question_id,
                    issues,
                });
            }
        }
    }

    out
}

/// Validate driver answers, collecting every failing record
pub fn validate_driver_answers(
    inputs: &[DriverAnswerInput],
    question_exists: impl Fn(DriverQuestionId) -> bool,
) -> Validated<ValidDriverAnswer> {
    let exists = |id: u64| question_exists(DriverQuestionId(id));
    let mut out = Validated::default();

    for (index, input) in inputs.iter().enumerate() {
        let mut issues = Vec::new();
        let question = check_question(input.question_id, &exists, &mut issues);
        let quantity = non_negative("quantity", &input.quantity, &mut issues);

        match question {
            Some(id) if issues.is_empty() => out.accepted.push(ValidDriverAnswer {
                question_id: DriverQuestionId(id),
                quantity,
            }),
            _ => {
                tracing::debug!(index, question = ?input.question_id, "rejected driver answer");
                out.rejected.push(RecordError {
                    index,
                    question_id: input.question_id,
                    issues,
                });
            }
        }
    }

    out
}

/// Sum of all seven ownership counts over every fleet record
pub fn total_vehicles<'a>(counts: impl IntoIterator<Item = &'a FleetCounts>) -> u64 {
    counts
        .into_iter()
        .fold(0u64, |acc, c| acc.saturating_add(c.total()))
}

/// Sum of the driver quantities
pub fn total_drivers(quantities: impl IntoIterator<Item = u64>) -> u64 {
    quantities
        .into_iter()
        .fold(0u64, |acc, q| acc.saturating_add(q))
}

/// Totals over fleet counts and driver quantities
///
/// Every caller that sizes a company totals through here, whether the rows
/// come from a validated batch or from the store.
pub fn compute_totals<'a>(
    fleets: impl IntoIterator<Item = &'a FleetCounts>,
    drivers: impl IntoIterator<Item = u64>,
) -> SizingTotals {
    SizingTotals {
        vehicles: total_vehicles(fleets),
        drivers: total_drivers(drivers),
    }
}
