use axum::{
    http::header::AUTHORIZATION,
    middleware,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::openapi;
use crate::state::ServerState;

pub mod auth;
pub mod product;
pub mod user;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Any origin, method and header; `Authorization` is exposed so clients can pick up reissued tokens.
pub fn build_cors() -> CorsLayer {
    CorsLayer::permissive().expose_headers([AUTHORIZATION])
}

/// Build the full application router, including public, authenticated and admin routes
pub fn build_router(state: ServerState) -> Router {
    // Public routes
    let public = Router::new()
        .route("/health", get(health))
        .route("/user", post(user::sign_up))
        .route("/user/email", get(user::check_email))
        .route("/login", post(auth::login))
        .route("/product", get(product::list))
        .route("/product/:id", get(product::get))
        .route("/api-docs/openapi.json", get(openapi::openapi_json));

    // Bearer-protected routes; admin checks happen in the `AdminUser` extractor
    let protected = Router::new()
        .route("/user", get(user::profile).patch(user::update).delete(user::withdraw))
        .route("/user/password", patch(user::change_password))
        .route("/user/admin/limitedsale", patch(user::grant_limited_sale_admin))
        .route("/logout", post(auth::logout))
        .route("/product", post(product::create))
        .route("/product/:id", patch(product::update).delete(product::delete))
        .route_layer(middleware::from_fn_with_state(state.clone(), crate::auth::require_jwt));

    public
        .merge(protected)
        .with_state(state)
        .layer(build_cors())
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status code and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and the like at ERROR
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
