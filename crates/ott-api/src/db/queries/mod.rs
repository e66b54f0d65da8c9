//! Database queries for the OTT API.
//!
//! This module contains database query functions organized by domain.

pub mod account;
pub mod category;
pub mod content;
