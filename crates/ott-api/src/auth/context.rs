//! Request-scoped authentication context.

use axum::http::HeaderMap;
use uuid::Uuid;

use super::store::AccountStore;
use super::token::{bearer_token, AuthError, Claims, TokenVerifier};
use crate::db::models::Account;
use crate::error::AppResult;

/// What became of the request's bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// No usable `Authorization: Bearer` header
    Absent,
    /// Signature or structure check failed
    Invalid,
    /// Signature valid but past expiry
    Expired,
    /// Token verified but its subject names no account
    Unresolved(Claims),
    /// Token verified and the account was loaded
    Verified(Claims),
}

/// Immutable per-request view of who is calling.
///
/// Holds at most one resolved account; `None` means anonymous.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    credential: Credential,
    account: Option<Account>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::unresolved(Credential::Absent)
    }

    /// A context with no account and the given credential outcome.
    pub fn unresolved(credential: Credential) -> Self {
        Self {
            credential,
            account: None,
        }
    }

    pub fn authenticated(claims: Claims, account: Account) -> Self {
        Self {
            credential: Credential::Verified(claims),
            account: Some(account),
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.account.is_none()
    }

    /// Verify the request's bearer token and load its account.
    ///
    /// Credential problems are recorded in the context rather than returned;
    /// only account store failures are errors.
    pub async fn resolve(
        headers: &HeaderMap,
        verifier: &TokenVerifier,
        store: &dyn AccountStore,
    ) -> AppResult<Self> {
        let Some(token) = bearer_token(headers) else {
            return Ok(Self::anonymous());
        };

        let claims = match verifier.verify(token) {
            Ok(claims) => claims,
            Err(AuthError::ExpiredCredential) => {
                return Ok(Self::unresolved(Credential::Expired));
            }
            Err(_) => return Ok(Self::unresolved(Credential::Invalid)),
        };

        let Ok(id) = Uuid::parse_str(&claims.sub) else {
            tracing::debug!(subject = %claims.sub, "Token subject is not an account id");
            return Ok(Self::unresolved(Credential::Unresolved(claims)));
        };

        match store.find_by_id(id).await? {
            Some(account) => Ok(Self::authenticated(claims, account)),
            None => Ok(Self::unresolved(Credential::Unresolved(claims))),
        }
    }

    /// Optional-auth view: anything short of a usable account is anonymous.
    pub fn or_anonymous(self) -> Self {
        if self.account.as_ref().is_some_and(|a| a.is_active) {
            self
        } else {
            Self::anonymous()
        }
    }
}
