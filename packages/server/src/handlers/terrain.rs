use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::ValidJson;
use crate::models::terrain::{
    TerrainDetailsResponse, TerrainListQuery, TerrainRequest, TerrainResponse,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/terrains",
    tag = "Terrains",
    operation_id = "listTerrains",
    summary = "List terrains with filters and pagination",
    description = "Returns one page of terrains, each with signed photo URLs valid for one hour. \
        All supplied filters must match: `nom` is a case-insensitive substring, `prix` is \
        `lte.<n>` or `gte.<n>`, `userId` selects one owner.",
    params(TerrainListQuery),
    responses(
        (status = 200, description = "Terrain page", body = Vec<TerrainDetailsResponse>),
        (status = 400, description = "Invalid filter (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_terrains(
    State(state): State<AppState>,
    Query(query): Query<TerrainListQuery>,
) -> Result<Json<Vec<TerrainDetailsResponse>>, AppError> {
    let (filter, page) = query.into_parts()?;

    let terrains = state.terrains.list(&filter, page).await?;

    Ok(Json(terrains.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/terrains/{id}",
    tag = "Terrains",
    operation_id = "getTerrain",
    summary = "Get a terrain by ID",
    params(("id" = Uuid, Path, description = "Terrain ID")),
    responses(
        (status = 200, description = "Terrain with photos", body = TerrainDetailsResponse),
        (status = 404, description = "Terrain not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id = %id))]
pub async fn get_terrain(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TerrainDetailsResponse>, AppError> {
    let details = state
        .terrains
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Terrain not found".into()))?;

    Ok(Json(details.into()))
}

#[utoipa::path(
    post,
    path = "/terrains",
    tag = "Terrains",
    operation_id = "createTerrain",
    summary = "Create a terrain owned by the caller",
    description = "Photos are attached afterwards through the photo upload endpoint.",
    request_body = TerrainRequest,
    responses(
        (status = 201, description = "Terrain created", body = TerrainResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, nom = %payload.nom))]
pub async fn create_terrain(
    auth_user: AuthUser,
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<TerrainRequest>,
) -> Result<impl IntoResponse, AppError> {
    let model = state
        .terrains
        .create(auth_user.user_id, payload.into())
        .await?;

    tracing::info!(terrain_id = %model.id, "Terrain created");

    Ok((StatusCode::CREATED, Json(TerrainResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/terrains/{id}",
    tag = "Terrains",
    operation_id = "updateTerrain",
    summary = "Replace a terrain",
    description = "Replaces every writable field. Only the owner may update a terrain.",
    params(("id" = Uuid, Path, description = "Terrain ID")),
    request_body = TerrainRequest,
    responses(
        (status = 200, description = "Terrain updated", body = TerrainResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Terrain not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id = %id))]
pub async fn update_terrain(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<TerrainRequest>,
) -> Result<Json<TerrainResponse>, AppError> {
    require_terrain_owner(&state, &auth_user, id).await?;

    let model = state
        .terrains
        .update(id, payload.into())
        .await?
        .ok_or_else(|| AppError::NotFound("Terrain not found".into()))?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/terrains/{id}",
    tag = "Terrains",
    operation_id = "deleteTerrain",
    summary = "Delete a terrain and its photos",
    params(("id" = Uuid, Path, description = "Terrain ID")),
    responses(
        (status = 204, description = "Terrain deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Terrain not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id = %id))]
pub async fn delete_terrain(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_terrain_owner(&state, &auth_user, id).await?;

    if !state.terrains.delete(id).await? {
        return Err(AppError::NotFound("Terrain not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// 404 if the terrain is missing, 403 if the caller does not own it.
pub(crate) async fn require_terrain_owner(
    state: &AppState,
    auth_user: &AuthUser,
    terrain_id: Uuid,
) -> Result<(), AppError> {
    let owner = state
        .terrains
        .owner_of(terrain_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Terrain not found".into()))?;
    auth_user.require_owner(owner)
}
