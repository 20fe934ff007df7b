//! Domain model types

pub mod answer;
pub mod catalog;
pub mod company;
pub mod criterion;

pub use answer::{
    AnswerKey, CountInput, DriverAnswer, DriverAnswerInput, FleetAnswer, FleetCounts,
    VehicleAnswerInput,
};
pub use catalog::{
    Catalog, Ciiu, CompanySize, DriverQuestion, Mission, Segment, VehicleQuestion,
};
pub use company::{Company, CompanyDraft, CompanyPatch, DiagnosisStep};
pub use criterion::{CountRange, SizeCriterion, UpperBound};
