//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    bulk_generate_handler, check_slugs_handler, delete_handler, generate_draft_handler, generation_logs_handler,
    health_handler, list_handler, publish_handler, unpublish_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub deps: Arc<ServerDeps>,
}

/// Build the Axum application router
pub fn build_app(db_pool: PgPool, deps: ServerDeps) -> Router {
    let app_state = AppState {
        db_pool,
        deps: Arc::new(deps),
    };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    let local_pages = Router::new()
        .route("/generate-draft", post(generate_draft_handler))
        .route("/publish", post(publish_handler))
        .route("/unpublish", post(unpublish_handler))
        .route("/delete", delete(delete_handler))
        .route("/list", get(list_handler))
        .route("/check-slugs", post(check_slugs_handler))
        .route("/bulk", post(bulk_generate_handler))
        .route("/:id/logs", get(generation_logs_handler));

    Router::new()
        .nest("/api/local-pages", local_pages)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
