//! Comic CRUD plus the many-to-many link/unlink endpoints for tags,
//! creators, and sources.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::models::{Comic, ComicCreator, ComicSource, ComicTag, Creator, Source, Tag};
use crate::server::{bad_request, db_error, not_found, AppError, AppState};
use crate::store::Filter;

#[derive(Debug, Deserialize)]
pub struct ListComicsQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Handler for `GET /api/comics`.
///
/// Status/search filtering and pagination are applied after retrieval,
/// matching the reference behavior; the catalog is small enough that a
/// full scan is acceptable here.
pub async fn list_comics(
    State(state): State<AppState>,
    Query(params): Query<ListComicsQuery>,
) -> Result<Json<Vec<Comic>>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let mut comics = uow.comics().get_all().await.map_err(db_error)?;

    if let Some(status) = &params.status {
        comics.retain(|c| &c.status == status);
    }

    if let Some(search) = &params.search {
        let needle = search.to_lowercase();
        comics.retain(|c| {
            c.title.to_lowercase().contains(&needle)
                || c.alternative_title
                    .as_ref()
                    .is_some_and(|t| t.to_lowercase().contains(&needle))
                || c.description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        });
    }

    let offset = params.offset.unwrap_or(0);
    let mut comics: Vec<Comic> = comics.into_iter().skip(offset).collect();
    if let Some(limit) = params.limit {
        comics.truncate(limit);
    }

    Ok(Json(comics))
}

/// Handler for `GET /api/comics/{id}`.
pub async fn get_comic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Comic>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let comic = uow.comics().get_by_id(id).await.map_err(db_error)?;
    comic
        .map(Json)
        .ok_or_else(|| not_found(format!("comic {} not found", id)))
}

fn default_status() -> String {
    "active".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateComicRequest {
    pub title: String,
    pub alternative_title: Option<String>,
    pub description: Option<String>,
    pub managed_path: String,
    pub cover_image_path: Option<String>,
    pub cover_page_id: Option<i64>,
    #[serde(default = "default_status")]
    pub status: String,
    pub rating: Option<i64>,
}

/// Handler for `POST /api/comics`. Returns 201 with the stored comic,
/// including its generated key and server-assigned timestamps.
pub async fn create_comic(
    State(state): State<AppState>,
    Json(req): Json<CreateComicRequest>,
) -> Result<(StatusCode, Json<Comic>), AppError> {
    if req.title.is_empty() {
        return Err(bad_request("title must not be empty"));
    }
    if req.managed_path.is_empty() {
        return Err(bad_request("managed_path must not be empty"));
    }

    let now = Utc::now();
    let comic = Comic {
        comic_id: 0,
        title: req.title,
        alternative_title: req.alternative_title,
        description: req.description,
        managed_path: req.managed_path,
        cover_image_path: req.cover_image_path,
        cover_page_id: req.cover_page_id,
        status: req.status,
        rating: req.rating,
        created_at: now,
        updated_at: now,
    };

    let mut uow = state.factory.create().await.map_err(db_error)?;
    let comic = uow.comics().add(comic).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(comic)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateComicRequest {
    pub title: Option<String>,
    pub alternative_title: Option<String>,
    pub description: Option<String>,
    pub managed_path: Option<String>,
    pub cover_image_path: Option<String>,
    pub cover_page_id: Option<i64>,
    pub status: Option<String>,
    pub rating: Option<i64>,
}

/// Handler for `PUT /api/comics/{id}`. Partial update: only supplied
/// fields overwrite the stored row; `updated_at` always refreshes.
pub async fn update_comic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateComicRequest>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let mut comic = uow
        .comics()
        .get_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("comic {} not found", id)))?;

    if let Some(title) = req.title {
        comic.title = title;
    }
    if let Some(alternative_title) = req.alternative_title {
        comic.alternative_title = Some(alternative_title);
    }
    if let Some(description) = req.description {
        comic.description = Some(description);
    }
    if let Some(managed_path) = req.managed_path {
        comic.managed_path = managed_path;
    }
    if let Some(cover_image_path) = req.cover_image_path {
        comic.cover_image_path = Some(cover_image_path);
    }
    if let Some(cover_page_id) = req.cover_page_id {
        comic.cover_page_id = Some(cover_page_id);
    }
    if let Some(status) = req.status {
        comic.status = status;
    }
    if let Some(rating) = req.rating {
        comic.rating = Some(rating);
    }
    comic.updated_at = Utc::now();

    uow.comics().update(&comic).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `DELETE /api/comics/{id}`. The schema cascades the delete
/// to pages, overlay boxes, and all link rows.
pub async fn delete_comic(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let comic = uow
        .comics()
        .get_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("comic {} not found", id)))?;

    uow.comics().delete(&comic).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// ============ Tag links ============

#[derive(Debug, Deserialize)]
pub struct LinkTagRequest {
    pub tag_id: i64,
}

/// Handler for `POST /api/comics/{id}/tags`. 404 when either side of the
/// link is missing.
pub async fn link_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<LinkTagRequest>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let comic = uow.comics().get_by_id(id).await.map_err(db_error)?;
    let tag = uow.tags().get_by_id(req.tag_id).await.map_err(db_error)?;

    if comic.is_none() || tag.is_none() {
        return Err(not_found("comic or tag not found"));
    }

    let link = ComicTag {
        comic_id: id,
        tag_id: req.tag_id,
    };
    uow.comic_tags().add(link).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `DELETE /api/comics/{id}/tags/{tag_id}`.
pub async fn unlink_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let link = uow
        .comic_tags()
        .first(Filter::new().eq("comic_id", id).eq("tag_id", tag_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("comic tag link not found"))?;

    uow.comic_tags().delete(&link).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `GET /api/comics/{id}/tags`.
pub async fn get_comic_tags(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let links = uow
        .comic_tags()
        .find(Filter::new().eq("comic_id", id))
        .await
        .map_err(db_error)?;
    let tag_ids: Vec<i64> = links.iter().map(|l| l.tag_id).collect();
    let tags = uow
        .tags()
        .find(Filter::new().in_ids("tag_id", &tag_ids))
        .await
        .map_err(db_error)?;

    Ok(Json(tags))
}

// ============ Creator links ============

#[derive(Debug, Deserialize)]
pub struct LinkCreatorRequest {
    pub creator_id: i64,
}

/// Handler for `POST /api/comics/{id}/creators`.
pub async fn link_creator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<LinkCreatorRequest>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let comic = uow.comics().get_by_id(id).await.map_err(db_error)?;
    let creator = uow
        .creators()
        .get_by_id(req.creator_id)
        .await
        .map_err(db_error)?;

    if comic.is_none() || creator.is_none() {
        return Err(not_found("comic or creator not found"));
    }

    let link = ComicCreator {
        comic_id: id,
        creator_id: req.creator_id,
    };
    uow.comic_creators().add(link).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `DELETE /api/comics/{id}/creators/{creator_id}`.
pub async fn unlink_creator(
    State(state): State<AppState>,
    Path((id, creator_id)): Path<(i64, i64)>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let link = uow
        .comic_creators()
        .first(Filter::new().eq("comic_id", id).eq("creator_id", creator_id))
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found("comic creator link not found"))?;

    uow.comic_creators().delete(&link).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `GET /api/comics/{id}/creators`.
pub async fn get_comic_creators(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Creator>>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let links = uow
        .comic_creators()
        .find(Filter::new().eq("comic_id", id))
        .await
        .map_err(db_error)?;
    let creator_ids: Vec<i64> = links.iter().map(|l| l.creator_id).collect();
    let creators = uow
        .creators()
        .find(Filter::new().in_ids("creator_id", &creator_ids))
        .await
        .map_err(db_error)?;

    Ok(Json(creators))
}

// ============ Source links ============

#[derive(Debug, Deserialize)]
pub struct LinkSourceRequest {
    pub source_id: i64,
}

/// Handler for `POST /api/comics/{id}/sources`.
pub async fn link_source(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<LinkSourceRequest>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let comic = uow.comics().get_by_id(id).await.map_err(db_error)?;
    let source = uow
        .sources()
        .get_by_id(req.source_id)
        .await
        .map_err(db_error)?;

    if comic.is_none() || source.is_none() {
        return Err(not_found("comic or source not found"));
    }

    let link = ComicSource {
        comic_id: id,
        source_id: req.source_id,
    };
    uow.comic_sources().add(link).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for `GET /api/comics/{id}/sources`.
pub async fn get_comic_sources(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Source>>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let links = uow
        .comic_sources()
        .find(Filter::new().eq("comic_id", id))
        .await
        .map_err(db_error)?;
    let source_ids: Vec<i64> = links.iter().map(|l| l.source_id).collect();
    let sources = uow
        .sources()
        .find(Filter::new().in_ids("source_id", &source_ids))
        .await
        .map_err(db_error)?;

    Ok(Json(sources))
}
