//! Access gate: ordered predicate stages over a [`RequestContext`].
//!
//! Each [`Stage`] either lets the request continue or denies it. An
//! [`AccessPolicy`] evaluates its stages in order and stops at the first
//! denial. Stages are pure functions of the context, so evaluating a policy
//! twice on the same context yields the same [`Verdict`].

pub mod middleware;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::auth::{Credential, RequestContext};
use crate::db::models::{Account, Plan, Role};

pub use middleware::enforce;

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NoCredential,
    InvalidCredential,
    ExpiredCredential,
    AccountNotFound,
    AccountInactive,
    AccountBlocked,
    RoleDenied,
    EmailUnverified,
    SubscriptionRequired,
    PlanInsufficient,
}

impl DenialReason {
    pub fn status(self) -> StatusCode {
        match self {
            DenialReason::NoCredential
            | DenialReason::InvalidCredential
            | DenialReason::ExpiredCredential
            | DenialReason::AccountNotFound
            | DenialReason::AccountInactive => StatusCode::UNAUTHORIZED,
            DenialReason::AccountBlocked
            | DenialReason::RoleDenied
            | DenialReason::EmailUnverified
            | DenialReason::SubscriptionRequired
            | DenialReason::PlanInsufficient => StatusCode::FORBIDDEN,
        }
    }
}

/// Structured short-circuit produced by a gate stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    pub reason: DenialReason,
    pub message: String,
}

impl Denial {
    pub fn new(reason: DenialReason, message: impl Into<String>) -> Self {
        Self {
            reason,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.reason.status()
    }
}

impl IntoResponse for Denial {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(
            reason = ?self.reason,
            status = status.as_u16(),
            message = %self.message,
            "Access denied"
        );

        let body = Json(json!({
            "success": false,
            "message": self.message,
        }));

        (status, body).into_response()
    }
}

/// Outcome of evaluating a stage or policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Deny(Denial),
}

impl Verdict {
    pub fn is_continue(&self) -> bool {
        matches!(self, Verdict::Continue)
    }

    pub fn into_result(self) -> Result<(), Denial> {
        match self {
            Verdict::Continue => Ok(()),
            Verdict::Deny(denial) => Err(denial),
        }
    }
}

/// Closed set of roles a [`Stage::Role`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(&'static [Role]);

impl RoleSet {
    pub const fn admin() -> Self {
        RoleSet(&[Role::Admin])
    }

    /// Admins and moderators.
    pub const fn staff() -> Self {
        RoleSet(&[Role::Admin, Role::Moderator])
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

/// One predicate of the authorization chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// An account was resolved from the bearer token
    Presence,
    Active,
    NotBlocked,
    Role(RoleSet),
    EmailVerified,
    SubscriptionActive,
    /// Exact plan match, or premium
    PlanTier(Plan),
}

impl Stage {
    pub fn evaluate(&self, ctx: &RequestContext) -> Verdict {
        let account = match require_account(ctx) {
            Ok(account) => account,
            Err(denial) => return Verdict::Deny(denial),
        };

        match self.check(account) {
            Ok(()) => Verdict::Continue,
            Err(denial) => Verdict::Deny(denial),
        }
    }

    fn check(&self, account: &Account) -> Result<(), Denial> {
        match *self {
            Stage::Presence => Ok(()),
            Stage::Active if !account.is_active => Err(Denial::new(
                DenialReason::AccountInactive,
                "Account is deactivated",
            )),
            Stage::NotBlocked if account.is_blocked => Err(Denial::new(
                DenialReason::AccountBlocked,
                "Account is blocked",
            )),
            Stage::Role(allowed) if !allowed.contains(account.role) => Err(Denial::new(
                DenialReason::RoleDenied,
                format!(
                    "Role '{}' is not authorized to access this resource",
                    account.role
                ),
            )),
            Stage::EmailVerified if !account.is_email_verified => Err(Denial::new(
                DenialReason::EmailUnverified,
                "Please verify your email address",
            )),
            Stage::SubscriptionActive
                if !account.subscription.is_some_and(|s| s.is_active()) =>
            {
                Err(Denial::new(
                    DenialReason::SubscriptionRequired,
                    "Active subscription required",
                ))
            }
            Stage::PlanTier(required)
                if !account
                    .subscription
                    .is_some_and(|s| s.plan.satisfies(required)) =>
            {
                Err(Denial::new(
                    DenialReason::PlanInsufficient,
                    format!("{} plan or higher required", required.label()),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// The resolved account, or the presence denial matching the credential outcome.
pub fn require_account(ctx: &RequestContext) -> Result<&Account, Denial> {
    if let Some(account) = ctx.account() {
        return Ok(account);
    }

    let denial = match ctx.credential() {
        Credential::Absent => Denial::new(DenialReason::NoCredential, "Not authorized, no token"),
        Credential::Invalid => Denial::new(DenialReason::InvalidCredential, "Invalid token"),
        Credential::Expired => Denial::new(DenialReason::ExpiredCredential, "Token expired"),
        Credential::Unresolved(_) | Credential::Verified(_) => {
            Denial::new(DenialReason::AccountNotFound, "User not found")
        }
    };
    Err(denial)
}

/// Ordered list of stages guarding a route group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    stages: Arc<[Stage]>,
}

impl AccessPolicy {
    pub fn new(stages: impl Into<Vec<Stage>>) -> Self {
        let stages: Vec<Stage> = stages.into();
        Self {
            stages: stages.into(),
        }
    }

    /// Append a stage, returning the extended policy.
    pub fn then(self, stage: Stage) -> Self {
        let mut stages = self.stages.to_vec();
        stages.push(stage);
        Self::new(stages)
    }

    /// Resolved, active and not blocked.
    pub fn authenticated() -> Self {
        Self::new([Stage::Presence, Stage::Active, Stage::NotBlocked])
    }

    pub fn admin() -> Self {
        Self::authenticated().then(Stage::Role(RoleSet::admin()))
    }

    pub fn staff() -> Self {
        Self::authenticated().then(Stage::Role(RoleSet::staff()))
    }

    /// Authenticated with a verified email and an active subscription.
    pub fn subscriber() -> Self {
        Self::authenticated()
            .then(Stage::EmailVerified)
            .then(Stage::SubscriptionActive)
    }

    pub fn plan(required: Plan) -> Self {
        Self::subscriber().then(Stage::PlanTier(required))
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run every stage in order; the first denial wins.
    pub fn evaluate(&self, ctx: &RequestContext) -> Verdict {
        for stage in self.stages.iter() {
            if let Verdict::Deny(denial) = stage.evaluate(ctx) {
                return Verdict::Deny(denial);
            }
        }
        Verdict::Continue
    }
}
