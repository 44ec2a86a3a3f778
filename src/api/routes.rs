//! Route definitions for the API.

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{require_bearer_token, BearerTokenValidator};
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_bookmarks,
        handlers::create_bookmark,
        handlers::get_bookmark,
        handlers::update_bookmark,
        handlers::delete_bookmark,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::CreateBookmarkRequest,
        crate::api::types::UpdateBookmarkRequest,
        crate::api::types::HealthResponse,
        crate::domain::Bookmark,
        crate::domain::BookmarkDraft,
        crate::domain::BookmarkPatch,
        crate::error::ErrorResponse,
        crate::error::ErrorMessage,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "bookmarks", description = "Bookmark management"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Bookmarks API",
        version = "0.1.0",
        description = "CRUD API for rated, sanitized bookmarks",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router, guarding bookmark routes with the bearer token when enabled.
pub fn build_router(
    state: AppState,
    auth_enabled: bool,
    token_validator: BearerTokenValidator,
) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let bookmark_routes = bookmark_routes(state.clone());
    let bookmark_routes = if auth_enabled {
        bookmark_routes.route_layer(middleware::from_fn_with_state(
            token_validator,
            require_bearer_token,
        ))
    } else {
        bookmark_routes
    };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state);

    Router::new()
        .merge(bookmark_routes)
        .merge(public_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// The bookmark resource routes.
fn bookmark_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/bookmarks",
            get(handlers::list_bookmarks).post(handlers::create_bookmark),
        )
        .route(
            "/bookmarks/:id",
            get(handlers::get_bookmark)
                .patch(handlers::update_bookmark)
                .delete(handlers::delete_bookmark),
        )
        .with_state(state)
}
