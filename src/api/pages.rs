//! Page endpoints. Pages are created with all file metadata up front and
//! listed per comic in `page_number` order.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::models::Page;
use crate::server::{bad_request, db_error, not_found, AppError, AppState};
use crate::store::Filter;

/// Handler for `GET /api/pages/{id}`.
pub async fn get_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Page>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let page = uow.pages().get_by_id(id).await.map_err(db_error)?;
    page.map(Json)
        .ok_or_else(|| not_found(format!("page {} not found", id)))
}

/// Handler for `GET /api/comics/{id}/pages`. Ordered by `page_number`;
/// duplicates are possible since ordering is advisory only.
pub async fn list_comic_pages(
    State(state): State<AppState>,
    Path(comic_id): Path<i64>,
) -> Result<Json<Vec<Page>>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let mut pages = uow
        .pages()
        .find(Filter::new().eq("comic_id", comic_id))
        .await
        .map_err(db_error)?;
    pages.sort_by_key(|p| p.page_number);

    Ok(Json(pages))
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub comic_id: i64,
    pub page_number: i64,
    pub storage_path: String,
    pub file_name: String,
    pub file_extension: Option<String>,
    pub file_size_bytes: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub dpi: Option<i64>,
    pub color_profile: Option<String>,
    pub image_hash: Option<String>,
    pub thumbnail_path: Option<String>,
}

/// Handler for `POST /api/pages`.
pub async fn create_page(
    State(state): State<AppState>,
    Json(req): Json<PageRequest>,
) -> Result<(StatusCode, Json<Page>), AppError> {
    if req.storage_path.is_empty() || req.file_name.is_empty() {
        return Err(bad_request("storage_path and file_name must not be empty"));
    }

    let page = Page {
        page_id: 0,
        comic_id: req.comic_id,
        page_number: req.page_number,
        storage_path: req.storage_path,
        file_name: req.file_name,
        file_extension: req.file_extension,
        file_size_bytes: req.file_size_bytes,
        width: req.width,
        height: req.height,
        dpi: req.dpi,
        color_profile: req.color_profile,
        image_hash: req.image_hash,
        thumbnail_path: req.thumbnail_path,
        created_at: Utc::now(),
    };

    let mut uow = state.factory.create().await.map_err(db_error)?;
    let page = uow.pages().add(page).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(page)))
}

/// Handler for `PUT /api/pages/{id}`. Full-row update from the request
/// body; `created_at` is preserved.
pub async fn update_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<PageRequest>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let mut page = uow
        .pages()
        .get_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("page {} not found", id)))?;

    page.comic_id = req.comic_id;
    page.page_number = req.page_number;
    page.storage_path = req.storage_path;
    page.file_name = req.file_name;
    page.file_extension = req.file_extension;
    page.file_size_bytes = req.file_size_bytes;
    page.width = req.width;
    page.height = req.height;
    page.dpi = req.dpi;
    page.color_profile = req.color_profile;
    page.image_hash = req.image_hash;
    page.thumbnail_path = req.thumbnail_path;

    uow.pages().update(&page).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `DELETE /api/pages/{id}`. Cascades to the page's overlay
/// boxes.
pub async fn delete_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let page = uow
        .pages()
        .get_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("page {} not found", id)))?;

    uow.pages().delete(&page).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}
