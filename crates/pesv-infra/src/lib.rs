//! Infrastructure layer - persistence implementations, loaders

pub mod answer_payload;
pub mod catalog_loader;
pub mod persistence;
