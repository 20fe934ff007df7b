//! Application service layer - use cases, config, logging

pub mod app;
pub mod config;
pub mod logging;
pub mod repository;
