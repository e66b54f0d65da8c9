//! Database models for the OTT API.
//!
//! This module contains SQLx-compatible model definitions
//! for all database tables.

pub mod account;
pub mod category;
pub mod content;

pub use account::*;
pub use category::*;
pub use content::*;
