//! Route configuration and setup

use crate::error::HttpAppError;
use crate::handlers;
use crate::middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, SecurityHeadersConfig,
};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, Request},
    routing::{get, post},
    Router,
};
use picdrop_core::{AppError, Config, PUBLIC_PREFIX};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// In-flight request cap for the whole server
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let body_limit = config.body_limit_bytes()?;

    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = get_request_id(request).unwrap_or("-"),
        )
    });

    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));

    tracing::debug!(
        body_limit_bytes = body_limit,
        http_concurrency_limit = HTTP_CONCURRENCY_LIMIT,
        "Router limits configured"
    );

    let app = upload_routes()
        .merge(file_routes())
        .merge(health_routes())
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(ConcurrencyLimitLayer::new(HTTP_CONCURRENCY_LIMIT))
        .layer(cors)
        .layer(trace_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::HEAD, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Upload form page and the two upload endpoints
fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index::upload_page))
        .route("/upload", post(handlers::upload::upload_form))
        .route("/api/upload", post(handlers::upload::upload_api))
}

/// Read-only view of the storage directory
fn file_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        &format!("/{}/{{stored_name}}", PUBLIC_PREFIX),
        get(handlers::files::get_upload),
    )
}

fn health_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
}

async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound("route".to_string()))
}
