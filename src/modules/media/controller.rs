use anyhow::anyhow;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use gourze_core::{ApiResponse, AppError, ListQuery, PaginationParams};
use gourze_models::{MEDIA_LIST, Media, TusUploadResult, UpdateMediaDto, UploadVideoViaTusDto};
use tracing::instrument;

use crate::docs::ErrorResponse;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;
use crate::validator::{ApiPath, ApiQuery, ValidatedJson};

use super::service::{MediaService, PhotoUpload};

/// Reads the `file` part of a multipart body.
async fn read_photo(mut multipart: Multipart) -> Result<PhotoUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(anyhow!("Failed to read file: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::bad_request(anyhow!("file is empty")));
        }

        return Ok(PhotoUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(AppError::bad_request(anyhow!("file is required")))
}

/// List media
///
/// Filterable by `type`, `title`, and `uploadStatus`.
#[utoipa::path(
    get,
    path = "/api/media",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of media", body = Vec<Media>),
        (status = 400, description = "Invalid filter or paging parameters", body = ErrorResponse)
    ),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn list_media(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<Vec<(String, String)>>,
) -> Result<ApiResponse<Vec<Media>>, AppError> {
    let query = ListQuery::parse(&params, &MEDIA_LIST).map_err(AppError::bad_request)?;
    let (media, total) = MediaService::list_media(&state.db, &query).await?;
    Ok(ApiResponse::paginated(media, query.meta(total)))
}

#[utoipa::path(
    get,
    path = "/api/media/{id}",
    params(("id" = i64, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media", body = Media),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn get_media(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Media>, AppError> {
    let media = MediaService::get_media(&state.db, id).await?;
    Ok(ApiResponse::ok(media))
}

#[utoipa::path(
    put,
    path = "/api/media/{id}",
    params(("id" = i64, Path, description = "Media ID")),
    request_body = UpdateMediaDto,
    responses(
        (status = 200, description = "Media updated", body = Media),
        (status = 401, description = "Not signed in as super or admin", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn update_media(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateMediaDto>,
) -> Result<ApiResponse<Media>, AppError> {
    let media = MediaService::update_media(&state.db, id, dto).await?;
    Ok(ApiResponse::with_message("Media updated successfully", media))
}

#[utoipa::path(
    delete,
    path = "/api/media/{id}",
    params(("id" = i64, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Deleted media", body = Media),
        (status = 401, description = "Not signed in as super or admin", body = ErrorResponse),
        (status = 404, description = "Media not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn delete_media(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<ApiResponse<Media>, AppError> {
    let media = MediaService::delete_media(&state.db, id).await?;
    Ok(ApiResponse::with_message("Media deleted successfully", media))
}

/// Upload a photo
///
/// Multipart body with a single `file` part holding an image. The image is
/// stored unchanged on the CDN.
#[utoipa::path(
    post,
    path = "/api/media/upload-photo",
    request_body(content_type = "multipart/form-data", description = "`file`: the image"),
    responses(
        (status = 201, description = "Photo stored", body = Media),
        (status = 400, description = "Missing file or not an image", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "CDN upload failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state, multipart))]
pub async fn upload_photo(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, ApiResponse<Media>), AppError> {
    let upload = read_photo(multipart).await?;
    let media = MediaService::upload_photo(&state.db, state.media.as_ref(), upload).await?;
    Ok(ApiResponse::created("Photo uploaded successfully", media))
}

/// Prepare a direct TUS video upload
///
/// Creates the video on the CDN and returns the headers and metadata the
/// client needs to upload it over TUS.
#[utoipa::path(
    post,
    path = "/api/media/upload-video-via-tus",
    request_body = UploadVideoViaTusDto,
    responses(
        (status = 201, description = "Upload prepared", body = TusUploadResult),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "CDN call failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("cookie_auth" = [])),
    tag = "Media"
)]
#[instrument(skip(state))]
pub async fn upload_video_via_tus(
    State(state): State<AppState>,
    current_user: CurrentUser,
    ValidatedJson(dto): ValidatedJson<UploadVideoViaTusDto>,
) -> Result<(StatusCode, ApiResponse<TusUploadResult>), AppError> {
    let user_id = dto.user_id.unwrap_or(current_user.id);
    if !current_user.can_act_for(user_id) {
        return Err(AppError::unauthorized(anyhow!(
            "Cannot upload on behalf of another user"
        )));
    }

    let result = MediaService::upload_video_via_tus(
        &state.db,
        state.media.as_ref(),
        dto,
        user_id,
        state.bunny_config.upload_expiration_secs,
    )
    .await?;
    Ok(ApiResponse::created("Video upload prepared", result))
}
