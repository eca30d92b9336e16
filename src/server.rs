//! HTTP API server.
//!
//! Exposes the catalog over a JSON HTTP API. Every handler acquires one
//! unit of work from the shared [`UnitOfWorkFactory`], performs its
//! repository calls, saves once for writes, and releases the session on
//! every exit path (the unit of work is dropped when the handler returns).
//!
//! # Error Contract
//!
//! All error responses share one body shape:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "comic 17 not found" } }
//! ```
//!
//! Error codes: `not_found` (404), `bad_request` (400),
//! `constraint_violation` (409), `internal` (500).
//!
//! # CORS
//!
//! Origins come from `[cors].allowed_origins`; `"*"` permits any origin,
//! matching the original deployment default.

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::api;
use crate::config::Config;
use crate::store::UnitOfWorkFactory;

/// Shared application state passed to all route handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// One factory for the whole process; each request gets its own
    /// unit of work (and therefore its own database session) from it.
    pub factory: Arc<UnitOfWorkFactory>,
}

/// Starts the HTTP API server. Binds to `[server].bind` and runs until the
/// process is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let factory = UnitOfWorkFactory::from_config(config)?;
    let state = AppState {
        factory: Arc::new(factory),
    };

    let cors = if config.cors.allow_any_origin() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = router(state).layer(cors);

    println!("API server listening on http://{}", config.server.bind);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the API router. Split out from [`run_server`] so tests can mount
/// it on an ephemeral listener.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(api::health::get_health))
        .route(
            "/api/comics",
            get(api::comics::list_comics).post(api::comics::create_comic),
        )
        .route(
            "/api/comics/{id}",
            get(api::comics::get_comic)
                .put(api::comics::update_comic)
                .delete(api::comics::delete_comic),
        )
        .route(
            "/api/comics/{id}/tags",
            get(api::comics::get_comic_tags).post(api::comics::link_tag),
        )
        .route(
            "/api/comics/{id}/tags/{tag_id}",
            delete(api::comics::unlink_tag),
        )
        .route(
            "/api/comics/{id}/creators",
            get(api::comics::get_comic_creators).post(api::comics::link_creator),
        )
        .route(
            "/api/comics/{id}/creators/{creator_id}",
            delete(api::comics::unlink_creator),
        )
        .route(
            "/api/comics/{id}/sources",
            get(api::comics::get_comic_sources).post(api::comics::link_source),
        )
        .route("/api/comics/{id}/pages", get(api::pages::list_comic_pages))
        .route("/api/pages", post(api::pages::create_page))
        .route(
            "/api/pages/{id}",
            get(api::pages::get_page)
                .put(api::pages::update_page)
                .delete(api::pages::delete_page),
        )
        .route(
            "/api/pages/{id}/overlay-boxes",
            get(api::overlays::list_page_overlay_boxes)
                .delete(api::overlays::delete_page_overlay_boxes),
        )
        .route("/api/overlay-boxes", post(api::overlays::create_overlay_box))
        .route(
            "/api/overlay-boxes/{id}",
            put(api::overlays::update_overlay_box).delete(api::overlays::delete_overlay_box),
        )
        .route(
            "/api/creators",
            get(api::creators::list_creators).post(api::creators::create_creator),
        )
        .route("/api/creators/{id}", put(api::creators::update_creator))
        .route("/api/sources", post(api::sources::create_source))
        .route("/api/sources/{id}", put(api::sources::update_source))
        .route(
            "/api/tags",
            get(api::tags::list_tags).post(api::tags::create_tag),
        )
        .route(
            "/api/tag-groups",
            get(api::tags::list_tag_groups).post(api::tags::create_tag_group),
        )
        .with_state(state)
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 404 Not Found error.
pub fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

/// Constructs a 400 Bad Request error.
pub fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

/// Constructs a 409 Conflict error for schema constraint violations.
pub fn constraint_violation(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::CONFLICT,
        code: "constraint_violation".to_string(),
        message: message.into(),
    }
}

/// Constructs a 500 Internal Server Error.
pub fn internal(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

/// Maps a data-access fault to the most appropriate HTTP status. The store
/// layer propagates database errors unmodified, so constraint violations
/// are recognized from SQLite's error text.
pub fn db_error(err: anyhow::Error) -> AppError {
    let msg = err.to_string();
    tracing::error!("database error: {msg}");

    if msg.contains("FOREIGN KEY constraint")
        || msg.contains("UNIQUE constraint")
        || msg.contains("NOT NULL constraint")
        || msg.contains("CHECK constraint")
    {
        constraint_violation(msg)
    } else {
        internal(msg)
    }
}
