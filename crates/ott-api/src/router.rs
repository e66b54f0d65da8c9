//! HTTP route table.
//!
//! Every protected group runs [`auth::authenticate`] first and then the
//! access gate with the group's [`AccessPolicy`]. Error responses pass
//! through [`error::expose_details`] with the server's configuration.

use axum::{
    handler::Handler,
    middleware::{from_fn_with_state, map_response_with_state},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::error;
use crate::gate::{self, AccessPolicy};
use crate::handlers::{self, content::EXCLUSIVE_PLAN};
use crate::services::{CategoryService, ContentService};
use crate::state::AppState;

/// Build the application router with all routes.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let content_service = ContentService::new(state.db.clone());
    let category_service = CategoryService::new(state.db.clone());

    // Health check routes (no auth required)
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::api_health))
        .with_state(state.clone());

    let auth_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route_layer(from_fn_with_state(
            AccessPolicy::authenticated(),
            gate::enforce,
        ))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate))
        .with_state(state.clone());

    // Catalog browsing works anonymously
    let browse_routes = Router::new()
        .route("/api/content", get(handlers::content::list))
        .route_layer(from_fn_with_state(
            state.clone(),
            auth::optional_authenticate,
        ))
        .with_state(content_service.clone());

    let exclusive_routes = Router::new()
        .route("/api/content/exclusive", get(handlers::content::exclusive))
        .route_layer(from_fn_with_state(
            AccessPolicy::plan(EXCLUSIVE_PLAN),
            gate::enforce,
        ))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate))
        .with_state(content_service.clone());

    let playback_routes = Router::new()
        .route("/api/content/{id}/play", get(handlers::content::play))
        .route_layer(from_fn_with_state(
            AccessPolicy::subscriber(),
            gate::enforce,
        ))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate))
        .with_state(content_service);

    let category_routes = Router::new()
        .route("/api/categories", get(handlers::categories::list_public))
        .with_state(category_service.clone());

    // Staff may read; writes additionally need the admin role
    let admin_only = || from_fn_with_state(AccessPolicy::admin(), gate::enforce);
    let admin_category_routes = Router::new()
        .route(
            "/api/admin/categories",
            get(handlers::categories::list)
                .post(handlers::categories::create.layer(admin_only())),
        )
        .route(
            "/api/admin/categories/{id}",
            get(handlers::categories::get)
                .put(handlers::categories::update.layer(admin_only()))
                .delete(handlers::categories::delete.layer(admin_only())),
        )
        .route_layer(from_fn_with_state(AccessPolicy::staff(), gate::enforce))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate))
        .with_state(category_service);

    let database_routes = Router::new()
        .route(
            "/api/db/validate",
            get(handlers::database::validate_database),
        )
        .route_layer(from_fn_with_state(AccessPolicy::admin(), gate::enforce))
        .route_layer(from_fn_with_state(state.clone(), auth::authenticate))
        .with_state(state.db.clone());

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(browse_routes)
        .merge(exclusive_routes)
        .merge(playback_routes)
        .merge(category_routes)
        .merge(admin_category_routes)
        .merge(database_routes)
        .fallback(handlers::not_found)
        .layer(map_response_with_state(
            state.config.clone(),
            error::expose_details,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
