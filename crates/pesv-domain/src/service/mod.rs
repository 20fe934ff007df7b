//! Domain services

pub mod aggregator;
pub mod classifier;
pub mod criteria_check;

pub use aggregator::{
    compute_totals, total_drivers, total_vehicles, validate_driver_answers,
    validate_vehicle_answers, FieldIssue, RecordError, SizingTotals, ValidDriverAnswer,
    ValidVehicleAnswer, Validated,
};
pub use classifier::{classify, Classification, ClassificationError};
pub use criteria_check::{check_criteria, generate_criteria_report, CriteriaIssue};
