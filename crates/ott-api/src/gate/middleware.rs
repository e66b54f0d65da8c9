use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AccessPolicy, Verdict};
use crate::auth::RequestContext;

/// Middleware that applies an [`AccessPolicy`] to the request context.
///
/// Must run after [`crate::auth::authenticate`] or
/// [`crate::auth::optional_authenticate`]; a request without a context is
/// evaluated as anonymous.
pub async fn enforce(
    State(policy): State<AccessPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let verdict = match request.extensions().get::<RequestContext>() {
        Some(ctx) => policy.evaluate(ctx),
        None => policy.evaluate(&RequestContext::anonymous()),
    };

    match verdict {
        Verdict::Continue => next.run(request).await,
        Verdict::Deny(denial) => {
            tracing::debug!(uri = %request.uri(), "Request stopped at access gate");
            denial.into_response()
        }
    }
}
