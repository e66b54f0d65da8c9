//! Service layer for the OTT API.
//!
//! Services encapsulate business logic and coordinate
//! between handlers and database queries.

pub mod category;
pub mod content;

pub use category::CategoryService;
pub use content::ContentService;
