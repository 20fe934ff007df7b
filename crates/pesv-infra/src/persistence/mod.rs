//! Persistence implementations
//!
//! A single JSON document holds every table. `JsonStore` implements the
//! domain repository traits over it and hands out sizing transactions that
//! stage writes until commit.

mod dataset;
mod json_store;
mod transaction;

pub use dataset::Dataset;
pub use json_store::JsonStore;
pub use transaction::JsonStoreTransaction;
