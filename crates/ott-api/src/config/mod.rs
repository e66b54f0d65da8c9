//! Configuration module for the OTT API server.
//!
//! This module provides configuration loading from environment variables
//! using the `envy` crate for type-safe environment variable parsing.

mod app;
mod database;

pub use app::{AppConfig, Environment, DEVELOPMENT_JWT_SECRET};
pub use database::DatabaseConfig;
