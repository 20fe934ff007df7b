//! Application Layer
//!
//! This module orchestrates between the CLI and the domain/infrastructure
//! layers.
//!
//! The app layer contains:
//! - `sizing_service`: Core use case, answer submission and size classification
//! - `company_service`: Company registration and maintenance
//! - `catalog_service`: Reference catalog import and checks
//! - `query_service`: Query stored data (catalog, answers, ad-hoc sizing)

pub mod catalog_service;
pub mod company_service;
pub mod query_service;
pub mod sizing_service;

// Re-export main types for convenience
pub use catalog_service::{check_catalog, import_catalog, CatalogImport};
pub use company_service::{
    create_company, delete_company, get_company, list_companies, update_company,
    CompanyServiceError,
};
pub use query_service::QueryServiceError;
pub use sizing_service::{
    submit_answers, AnswerSubmission, SizingError, SizingOutcome, SizingReport,
};
