//! Authentication: bearer token verification and account resolution.
//!
//! The pipeline for a protected route is
//! [`authenticate`] -> [`crate::gate::enforce`] -> handler. Authentication
//! only establishes *who* is calling; the access gate decides whether they
//! may proceed.

pub mod context;
pub mod extract;
pub mod middleware;
pub mod store;
pub mod token;

pub use context::{Credential, RequestContext};
pub use extract::{CurrentAccount, MaybeAccount};
pub use middleware::{authenticate, optional_authenticate};
pub use store::{AccountStore, PgAccountStore};
pub use token::{bearer_token, AuthError, Claims, TokenIssuer, TokenVerifier};
