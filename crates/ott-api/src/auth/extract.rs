//! Extractors for reading the caller inside handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;

use super::RequestContext;
use crate::db::models::Account;
use crate::gate::{require_account, Denial};

fn context(parts: &Parts) -> RequestContext {
    parts
        .extensions
        .get::<RequestContext>()
        .cloned()
        .unwrap_or_else(RequestContext::anonymous)
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(context(parts))
    }
}

/// The resolved account; rejects with the presence denial when anonymous.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

impl<S> FromRequestParts<S> for CurrentAccount
where
    S: Send + Sync,
{
    type Rejection = Denial;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ctx = context(parts);
        require_account(&ctx).cloned().map(CurrentAccount)
    }
}

/// The resolved account, if any.
#[derive(Debug, Clone)]
pub struct MaybeAccount(pub Option<Account>);

impl<S> FromRequestParts<S> for MaybeAccount
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAccount(context(parts).account().cloned()))
    }
}
