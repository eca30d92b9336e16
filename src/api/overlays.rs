//! Overlay-box endpoints: the translation overlay editor creates, moves,
//! and clears boxes per page.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::models::OverlayBox;
use crate::server::{db_error, not_found, AppError, AppState};
use crate::store::Filter;

/// Handler for `GET /api/pages/{id}/overlay-boxes`.
pub async fn list_page_overlay_boxes(
    State(state): State<AppState>,
    Path(page_id): Path<i64>,
) -> Result<Json<Vec<OverlayBox>>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let boxes = uow
        .overlay_boxes()
        .find(Filter::new().eq("page_id", page_id))
        .await
        .map_err(db_error)?;

    Ok(Json(boxes))
}

#[derive(Debug, Deserialize)]
pub struct OverlayBoxRequest {
    pub page_id: i64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub z_index: i64,
    pub original_text: Option<String>,
    pub translated_text: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Handler for `POST /api/overlay-boxes`.
pub async fn create_overlay_box(
    State(state): State<AppState>,
    Json(req): Json<OverlayBoxRequest>,
) -> Result<(StatusCode, Json<OverlayBox>), AppError> {
    let now = Utc::now();
    let overlay_box = OverlayBox {
        overlay_id: 0,
        page_id: req.page_id,
        x: req.x,
        y: req.y,
        width: req.width,
        height: req.height,
        rotation: req.rotation,
        z_index: req.z_index,
        original_text: req.original_text,
        translated_text: req.translated_text,
        is_verified: req.is_verified,
        created_at: now,
        updated_at: now,
    };

    let mut uow = state.factory.create().await.map_err(db_error)?;
    let overlay_box = uow
        .overlay_boxes()
        .add(overlay_box)
        .await
        .map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(overlay_box)))
}

/// Handler for `PUT /api/overlay-boxes/{id}`. Full update; refreshes
/// `updated_at`.
pub async fn update_overlay_box(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<OverlayBoxRequest>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let mut overlay_box = uow
        .overlay_boxes()
        .get_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("overlay box {} not found", id)))?;

    overlay_box.page_id = req.page_id;
    overlay_box.x = req.x;
    overlay_box.y = req.y;
    overlay_box.width = req.width;
    overlay_box.height = req.height;
    overlay_box.rotation = req.rotation;
    overlay_box.z_index = req.z_index;
    overlay_box.original_text = req.original_text;
    overlay_box.translated_text = req.translated_text;
    overlay_box.is_verified = req.is_verified;
    overlay_box.updated_at = Utc::now();

    uow.overlay_boxes()
        .update(&overlay_box)
        .await
        .map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `DELETE /api/overlay-boxes/{id}`.
pub async fn delete_overlay_box(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let overlay_box = uow
        .overlay_boxes()
        .get_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("overlay box {} not found", id)))?;

    uow.overlay_boxes()
        .delete(&overlay_box)
        .await
        .map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `DELETE /api/pages/{id}/overlay-boxes`. Bulk clear of
/// every box on a page; deleting zero boxes is still a success.
pub async fn delete_page_overlay_boxes(
    State(state): State<AppState>,
    Path(page_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let boxes = uow
        .overlay_boxes()
        .find(Filter::new().eq("page_id", page_id))
        .await
        .map_err(db_error)?;

    uow.overlay_boxes()
        .delete_range(&boxes)
        .await
        .map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}
