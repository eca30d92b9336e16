//! Creator endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::models::Creator;
use crate::server::{bad_request, db_error, not_found, AppError, AppState};

/// Handler for `GET /api/creators`.
pub async fn list_creators(
    State(state): State<AppState>,
) -> Result<Json<Vec<Creator>>, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let creators = uow.creators().get_all().await.map_err(db_error)?;

    Ok(Json(creators))
}

#[derive(Debug, Deserialize)]
pub struct CreateCreatorRequest {
    pub name: String,
    pub role: Option<String>,
    pub website_url: Option<String>,
    pub social_link: Option<String>,
}

/// Handler for `POST /api/creators`.
pub async fn create_creator(
    State(state): State<AppState>,
    Json(req): Json<CreateCreatorRequest>,
) -> Result<(StatusCode, Json<Creator>), AppError> {
    if req.name.is_empty() {
        return Err(bad_request("name must not be empty"));
    }

    let creator = Creator {
        creator_id: 0,
        name: req.name,
        role: req.role,
        website_url: req.website_url,
        social_link: req.social_link,
        created_at: Utc::now(),
    };

    let mut uow = state.factory.create().await.map_err(db_error)?;
    let creator = uow.creators().add(creator).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok((StatusCode::CREATED, Json(creator)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCreatorRequest {
    pub name: Option<String>,
    pub role: Option<String>,
    pub website_url: Option<String>,
    pub social_link: Option<String>,
}

/// Handler for `PUT /api/creators/{id}`. Partial update: only supplied
/// fields overwrite the stored row.
pub async fn update_creator(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCreatorRequest>,
) -> Result<StatusCode, AppError> {
    let mut uow = state.factory.create().await.map_err(db_error)?;
    let mut creator = uow
        .creators()
        .get_by_id(id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("creator {} not found", id)))?;

    if let Some(name) = req.name {
        creator.name = name;
    }
    if let Some(role) = req.role {
        creator.role = Some(role);
    }
    if let Some(website_url) = req.website_url {
        creator.website_url = Some(website_url);
    }
    if let Some(social_link) = req.social_link {
        creator.social_link = Some(social_link);
    }

    uow.creators().update(&creator).await.map_err(db_error)?;
    uow.save_changes().await.map_err(db_error)?;

    Ok(StatusCode::NO_CONTENT)
}
