use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::handlers::terrain::require_terrain_owner;
use crate::models::terrain::PhotoResponse;
use crate::state::AppState;

/// Multipart framing needs some room on top of the photo itself.
pub fn photo_body_limit(max_photo_size: usize) -> DefaultBodyLimit {
    DefaultBodyLimit::max(max_photo_size + 4096)
}

struct UploadedPhoto {
    data: Vec<u8>,
    content_type: String,
}

#[utoipa::path(
    post,
    path = "/terrains/{id}/photos",
    tag = "Photos",
    operation_id = "uploadPhoto",
    summary = "Attach a photo to a terrain",
    description = "Uploads an image in the `file` multipart field. The object is stored under \
        `<terrainId>/<photoId>` and the response carries a signed URL valid for one hour.",
    params(("id" = Uuid, Path, description = "Terrain ID")),
    request_body(content_type = "multipart/form-data", description = "Image upload"),
    responses(
        (status = 201, description = "Photo attached", body = PhotoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Terrain not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(terrain_id = %terrain_id))]
pub async fn upload_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(terrain_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    require_terrain_owner(&state, &auth_user, terrain_id).await?;

    let mut upload: Option<UploadedPhoto> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("file") {
            upload = Some(read_photo(field, state.config.storage.max_photo_size).await?);
        }
    }

    let upload = upload.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    let photo = state
        .terrains
        .add_photo(terrain_id, &upload.data, &upload.content_type)
        .await?
        .ok_or_else(|| AppError::NotFound("Terrain not found".into()))?;

    tracing::info!(photo_id = %photo.id, size = upload.data.len(), "Photo attached");

    Ok((StatusCode::CREATED, Json(PhotoResponse::from(photo))))
}

async fn read_photo(field: Field<'_>, max_size: usize) -> Result<UploadedPhoto, AppError> {
    let content_type = field
        .content_type()
        .filter(|ct| *ct != "application/octet-stream")
        .map(str::to_string)
        .or_else(|| {
            field
                .file_name()
                .and_then(|name| mime_guess::from_path(name).first())
                .map(|m| m.to_string())
        })
        .ok_or_else(|| AppError::Validation("Unable to determine the photo type".into()))?;

    if !content_type.starts_with("image/") {
        return Err(AppError::Validation(format!(
            "Photo must be an image, got '{content_type}'"
        )));
    }

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read photo: {e}")))?;

    if data.is_empty() {
        return Err(AppError::Validation("Photo is empty".into()));
    }
    if data.len() > max_size {
        return Err(AppError::Validation(format!(
            "Photo exceeds the maximum size of {max_size} bytes"
        )));
    }

    Ok(UploadedPhoto {
        data: data.to_vec(),
        content_type,
    })
}

#[utoipa::path(
    delete,
    path = "/terrains/{id}/photos/{photo_id}",
    tag = "Photos",
    operation_id = "deletePhoto",
    summary = "Remove a photo from a terrain",
    description = "Deletes the photo record and its stored object.",
    params(
        ("id" = Uuid, Path, description = "Terrain ID"),
        ("photo_id" = Uuid, Path, description = "Photo ID"),
    ),
    responses(
        (status = 204, description = "Photo removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the owner (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Terrain or photo not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(terrain_id = %terrain_id, photo_id = %photo_id))]
pub async fn delete_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((terrain_id, photo_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    require_terrain_owner(&state, &auth_user, terrain_id).await?;

    if !state.terrains.delete_photo(terrain_id, photo_id).await? {
        return Err(AppError::NotFound("Photo not found".into()));
    }

    Ok(StatusCode::NO_CONTENT)
}
