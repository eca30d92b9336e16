//! Source endpoints. Sources are created standalone and attached to
//! comics through the link endpoints in [`super::comics`].

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::models::Source;
use crate::server::{db_error, not_found, AppError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateSourceRequest {
    pub platform: Option<String>,
    pub source_url: Option<String>,
    pub author_handle: Option<String>,
    pub post_id: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub is_primary: bool,
}

/// Handler for `POST /api/sources`. `discovered_at` is server-assigned at
/// creation time, not supplied by the caller.
pub async fn create_source(
    State(state): State<AppState>,
    Json(req): Json<CreateSourceRequest>,
) -> Result<(StatusCode, Json<Source>), AppError> {
    let now = Utc::now();
    let source = Source {
        source_id: 0,
        platform: req.platform,
        source_url: req.source_url,
        author_handle: req.author_handle,
        post_id: req.post_id,
        description: req.description,
        discovered_at: now,
        is_primary: req.is_primary,
        created_at: now,
    };

    let mut uow = state.factory.create().await.map_err(db_error)?;
    let source = uow.sources().add(source).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(source)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateSourceRequest {
    pub platform: Option<String>,
    pub source_url: Option<String>,
    pub author_handle: Option<String>,
    pub post_id: Option<String>,
    pub description: Option<String>,
    pub is_primary: Option<bool>,
}

/// Handler for `PUT /api/sources/{id}`. Partial update: only supplied
/// fields overwrite the stored row; `discovered_at` never changes.
pub async fn update_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSourceRequest>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let mut source = uow
        .sources()
        .get_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("source {} not found", id)))?;

    if let Some(platform) = req.platform {
        source.platform = Some(platform);
    }
    if let Some(source_url) = req.source_url {
        source.source_url = Some(source_url);
    }
    if let Some(author_handle) = req.author_handle {
        source.author_handle = Some(author_handle);
    }
    if let Some(post_id) = req.post_id {
        source.post_id = Some(post_id);
    }
    if let Some(description) = req.description {
        source.description = Some(description);
    }
    if let Some(is_primary) = req.is_primary {
        source.is_primary = is_primary;
    }

    uow.sources().update(&source).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}
