//! Route configuration and setup

use crate::constants::{DOCS_PATH, HEALTH_PATH, OPENAPI_PATH, UPLOAD_PATH, USAGE_PATH};
use crate::error::HttpAppError;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::any::Any;
use std::sync::Arc;
use stowage_core::{AppError, Config};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the application router with all middleware applied.
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = Router::new()
        .route(HEALTH_PATH, get(handlers::health::health_check))
        // The uploader enforces the size limit while streaming; the
        // framework's buffered-body cap would reject large files early.
        .route(
            UPLOAD_PATH,
            post(handlers::upload::upload_file).layer(DefaultBodyLimit::disable()),
        )
        .route(USAGE_PATH, get(handlers::docs::usage))
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path(DOCS_PATH))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Allow-all when `*` is configured, otherwise exactly the listed origins.
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(cors::Any)
            .allow_methods(methods)
            .allow_headers(cors::Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers(cors::Any)
    };
    Ok(cors)
}

async fn not_found() -> HttpAppError {
    HttpAppError(AppError::NotFound("Not Found".to_string()))
}

/// Render a handler panic as a plain 500; the panic payload is only logged.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    HttpAppError(AppError::Internal(format!("handler panicked: {}", message))).into_response()
}
