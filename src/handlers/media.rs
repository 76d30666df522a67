use crate::auth::{AdminUser, AuthUser};
use crate::helpers::uploads::save_upload;
use crate::helpers::urls::format_url;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{candidate, media_item};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Gallery entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItemResponse {
    pub id: i32,
    pub file_url: String,
    pub file_type: String,
    pub created_at: chrono::NaiveDateTime,
}

impl GalleryItemResponse {
    pub fn from_model(model: media_item::Model, base_url: &str) -> Self {
        Self {
            id: model.id,
            file_url: format_url(base_url, Some(&model.file_url))
                .unwrap_or(model.file_url),
            file_type: match model.file_type {
                media_item::MediaKind::Image => "image".to_string(),
                media_item::MediaKind::Video => "video".to_string(),
            },
            created_at: model.created_at,
        }
    }
}

fn parse_media_kind(value: &str) -> Option<media_item::MediaKind> {
    match value {
        "image" => Some(media_item::MediaKind::Image),
        "video" => Some(media_item::MediaKind::Video),
        _ => None,
    }
}

#[derive(Debug, Default)]
struct GalleryForm {
    kind: Option<String>,
    candidate_slug: Option<String>,
    files: Vec<(String, Vec<u8>)>,
}

async fn collect_gallery_form(mut multipart: Multipart) -> Result<GalleryForm, StatusCode> {
    let mut form = GalleryForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart body: {}", e);
        StatusCode::BAD_REQUEST
    })? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "type" => form.kind = field.text().await.ok(),
            "candidateSlug" => form.candidate_slug = field.text().await.ok(),
            "files" | "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                if let Ok(bytes) = field.bytes().await {
                    form.files.push((filename, bytes.to_vec()));
                }
            }
            other => debug!("Ignoring unknown gallery field '{}'", other),
        }
    }
    Ok(form)
}

async fn candidate_for_user(state: &AppState, user_id: i32) -> Result<candidate::Model, StatusCode> {
    match candidate::Entity::find()
        .filter(candidate::Column::UserId.eq(user_id))
        .one(&state.db)
        .await
    {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            warn!("User {} has no candidate profile", user_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to resolve candidate for user {}: {}", user_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn candidate_by_slug(state: &AppState, slug: &str) -> Result<candidate::Model, StatusCode> {
    match candidate::Entity::find()
        .filter(candidate::Column::Slug.eq(slug))
        .one(&state.db)
        .await
    {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            warn!("Candidate {} not found", slug);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to load candidate {}: {}", slug, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn store_gallery_files(
    state: &AppState,
    candidate_id: i32,
    kind: media_item::MediaKind,
    files: &[(String, Vec<u8>)],
) -> Result<Vec<GalleryItemResponse>, StatusCode> {
    let mut stored = Vec::with_capacity(files.len());
    for (filename, bytes) in files {
        let file_url = save_upload(&state.config.upload_dir, filename, bytes)
            .await
            .map_err(|e| {
                error!("Failed to store gallery file: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;

        let inserted = media_item::ActiveModel {
            candidate_id: Set(candidate_id),
            file_url: Set(file_url),
            file_type: Set(kind),
            created_at: Set(chrono::Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to insert gallery item: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        stored.push(GalleryItemResponse::from_model(
            inserted,
            &state.config.base_url,
        ));
    }
    Ok(stored)
}

/// Bulk upload gallery files for the logged-in candidate
#[utoipa::path(
    post,
    path = "/api/v1/media/gallery",
    tag = "media",
    request_body(content = String, content_type = "multipart/form-data"),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Gallery updated", body = ApiResponse<Vec<GalleryItemResponse>>),
        (status = 400, description = "No files uploaded or bad media type", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Candidate not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn upload_gallery(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<GalleryItemResponse>>>, StatusCode> {
    trace!("Entering upload_gallery for user {}", auth.id);

    let candidate_model = candidate_for_user(&state, auth.id).await?;
    let form = collect_gallery_form(multipart).await?;

    if form.files.is_empty() {
        debug!("Gallery upload without files");
        return Err(StatusCode::BAD_REQUEST);
    }
    let Some(kind) = form.kind.as_deref().and_then(parse_media_kind) else {
        debug!("Gallery upload with invalid type {:?}", form.kind);
        return Err(StatusCode::BAD_REQUEST);
    };

    let stored = store_gallery_files(&state, candidate_model.id, kind, &form.files).await?;
    state.cache.invalidate(&candidate_model.slug).await;

    info!(
        "{} gallery files stored for candidate {}",
        stored.len(),
        candidate_model.slug
    );
    Ok(Json(ApiResponse {
        data: stored,
        message: "Gallery updated successfully".to_string(),
        success: true,
    }))
}

/// Bulk upload gallery files for any candidate (admin)
#[utoipa::path(
    post,
    path = "/api/v1/media/gallery/admin",
    tag = "media",
    request_body(content = String, content_type = "multipart/form-data"),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Gallery updated", body = ApiResponse<Vec<GalleryItemResponse>>),
        (status = 400, description = "Missing files, slug, or bad media type", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Candidate not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn upload_gallery_admin(
    State(state): State<AppState>,
    _admin: AdminUser,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Vec<GalleryItemResponse>>>, StatusCode> {
    trace!("Entering upload_gallery_admin");

    let form = collect_gallery_form(multipart).await?;

    if form.files.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let Some(slug) = form.candidate_slug.as_deref().filter(|s| !s.is_empty()) else {
        debug!("Admin gallery upload without candidateSlug");
        return Err(StatusCode::BAD_REQUEST);
    };
    let Some(kind) = form.kind.as_deref().and_then(parse_media_kind) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let candidate_model = candidate_by_slug(&state, slug).await?;
    let stored = store_gallery_files(&state, candidate_model.id, kind, &form.files).await?;
    state.cache.invalidate(&candidate_model.slug).await;

    info!(
        "{} gallery files stored for candidate {} by admin",
        stored.len(),
        candidate_model.slug
    );
    Ok(Json(ApiResponse {
        data: stored,
        message: "Gallery updated successfully by admin".to_string(),
        success: true,
    }))
}

/// Delete one of the logged-in candidate's gallery items
#[utoipa::path(
    delete,
    path = "/api/v1/media/gallery/{id}",
    tag = "media",
    params(
        ("id" = i32, Path, description = "Gallery item ID"),
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Item deleted", body = ApiResponse<String>),
        (status = 404, description = "Item or candidate not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_gallery_item(
    Path(item_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_gallery_item {} for user {}", item_id, auth.id);

    let candidate_model = candidate_for_user(&state, auth.id).await?;

    match media_item::Entity::delete_many()
        .filter(media_item::Column::Id.eq(item_id))
        .filter(media_item::Column::CandidateId.eq(candidate_model.id))
        .exec(&state.db)
        .await
    {
        Ok(result) if result.rows_affected > 0 => {
            state.cache.invalidate(&candidate_model.slug).await;
            info!("Gallery item {} deleted", item_id);
            Ok(Json(ApiResponse {
                data: format!("Gallery item {} deleted", item_id),
                message: "Gallery item deleted".to_string(),
                success: true,
            }))
        }
        Ok(_) => {
            warn!("Gallery item {} not found for deletion", item_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to delete gallery item {}: {}", item_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Set a candidate's profile photo by slug (admin)
#[utoipa::path(
    post,
    path = "/api/v1/media/profile-photo/{slug}",
    tag = "media",
    params(
        ("slug" = String, Path, description = "Unique slug of the candidate"),
    ),
    request_body(content = String, content_type = "multipart/form-data"),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Profile photo updated", body = ApiResponse<String>),
        (status = 400, description = "No file uploaded", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Candidate not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn update_profile_photo(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    _admin: AdminUser,
    multipart: Multipart,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering update_profile_photo for {}", slug);

    let candidate_model = candidate_by_slug(&state, &slug).await?;
    let form = collect_gallery_form(multipart).await?;

    let Some((filename, bytes)) = form.files.first() else {
        debug!("Profile photo upload without file");
        return Err(StatusCode::BAD_REQUEST);
    };

    let photo_url = save_upload(&state.config.upload_dir, filename, bytes)
        .await
        .map_err(|e| {
            error!("Failed to store profile photo: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let mut active = candidate_model.into_active_model();
    active.photo_url = Set(Some(photo_url.clone()));
    active.update(&state.db).await.map_err(|e| {
        error!("Failed to update profile photo for {}: {}", slug, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    state.cache.invalidate(&slug).await;
    info!("Profile photo updated for {}", slug);
    Ok(Json(ApiResponse {
        data: format_url(&state.config.base_url, Some(&photo_url)).unwrap_or(photo_url),
        message: "Profile photo updated successfully".to_string(),
        success: true,
    }))
}
