//! HTTP route handlers for the dashboard.
//!
//! Routes carry per-group Cache-Control headers: dashboard pages, the JSON API
//! and CSV exports share a short max-age, static assets are immutable, and the
//! health probe is never cached.
//!
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod dashboard;
pub mod export;
pub mod health;

use axum::{middleware, routing::get, Router};
use axum::http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::{CACHE_CONTROL_DASHBOARD, CACHE_CONTROL_NO_STORE, CACHE_CONTROL_STATIC};
use crate::http::static_files::create_static_service;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Health probe path expected by the container health check
pub const HEALTH_PATH: &str = "/_stcore/health";

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/", get(dashboard::index))
        .route("/api/dashboard", get(dashboard::api))
        .route("/export.csv", get(export::csv))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_DASHBOARD),
        ));

    let static_routes = Router::new()
        .nest_service("/static", create_static_service(&state.config.ui.static_dir))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATIC),
        ));

    // Health check - always fresh for liveness probes
    let health_routes = Router::new()
        .route(HEALTH_PATH, get(health::health))
        .route("/health", get(health::health))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    Router::new()
        .merge(dashboard_routes)
        .merge(health_routes)
        .merge(static_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
