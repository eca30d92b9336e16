//! Tag and tag-group endpoints.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::models::{Tag, TagGroup};
use crate::server::{bad_request, db_error, AppError, AppState};
use crate::store::Filter;

#[derive(Debug, Deserialize)]
pub struct ListTagsQuery {
    pub group_id: Option<i64>,
}

/// Handler for `GET /api/tags`. With `group_id` the filter is pushed down
/// to the store.
pub async fn list_tags(
    State(state): State<AppState>,
    Query(params): Query<ListTagsQuery>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;

    let tags = match params.group_id {
        Some(group_id) => uow
            .tags()
            .find(Filter::new().eq("group_id", group_id))
            .await
            .map_err(db_error)?,
        None => uow.tags().get_all().await.map_err(db_error)?,
    };

    Ok(Json(tags))
}

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub group_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_sensitive: bool,
}

/// Handler for `POST /api/tags`.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), AppError> {
    if req.name.is_empty() {
        return Err(bad_request("name must not be empty"));
    }

    let tag = Tag {
        tag_id: 0,
        group_id: req.group_id,
        name: req.name,
        description: req.description,
        is_sensitive: req.is_sensitive,
        created_at: Utc::now(),
    };

    let mut uow = state.factory.create().await.map_err(db_error)?;
    let tag = uow.tags().add(tag).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(tag)))
}

/// Handler for `GET /api/tag-groups`.
pub async fn list_tag_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<TagGroup>>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let groups = uow.tag_groups().get_all().await.map_err(db_error)?;

    Ok(Json(groups))
}

#[derive(Debug, Deserialize)]
pub struct CreateTagGroupRequest {
    pub name: String,
}

/// Handler for `POST /api/tag-groups`.
pub async fn create_tag_group(
    State(state): State<AppState>,
    Json(req): Json<CreateTagGroupRequest>,
) -> Result<(StatusCode, Json<TagGroup>), AppError> {
    if req.name.is_empty() {
        return Err(bad_request("name must not be empty"));
    }

    let group = TagGroup {
        group_id: 0,
        name: req.name,
        created_at: Utc::now(),
    };

    let mut uow = state.factory.create().await.map_err(db_error)?;
    let group = uow.tag_groups().add(group).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(group)))
}
