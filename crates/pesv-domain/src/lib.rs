//! PESV domain layer
//!
//! Models, the company sizing services and the repository traits the
//! infrastructure layer implements.

pub mod model;
pub mod repository;
pub mod service;
