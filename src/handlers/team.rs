use crate::auth::AuthUser;
use crate::helpers::uploads::save_upload;
use crate::helpers::urls::format_url;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{candidate, team_member, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Team roster entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub id: i32,
    pub name: String,
    pub role: String,
    pub photo_url: Option<String>,
    pub facebook_link: Option<String>,
    pub linkedin_link: Option<String>,
}

impl TeamMemberResponse {
    pub fn from_model(model: team_member::Model, base_url: &str) -> Self {
        Self {
            id: model.id,
            name: model.name,
            role: model.role,
            photo_url: format_url(base_url, model.photo_url.as_deref()),
            facebook_link: model.facebook_link,
            linkedin_link: model.linkedin_link,
        }
    }
}

#[derive(Debug, Default)]
struct TeamMemberForm {
    name: Option<String>,
    role: Option<String>,
    facebook_link: Option<String>,
    linkedin_link: Option<String>,
    image: Option<(String, Vec<u8>)>,
}

async fn collect_team_form(mut multipart: Multipart) -> Result<TeamMemberForm, StatusCode> {
    let mut form = TeamMemberForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart body: {}", e);
        StatusCode::BAD_REQUEST
    })? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "name" => form.name = field.text().await.ok(),
            "role" => form.role = field.text().await.ok(),
            "facebookLink" => form.facebook_link = field.text().await.ok(),
            "linkedinLink" => form.linkedin_link = field.text().await.ok(),
            "image" => {
                let filename = field.file_name().unwrap_or("photo").to_string();
                if let Ok(bytes) = field.bytes().await {
                    form.image = Some((filename, bytes.to_vec()));
                }
            }
            other => debug!("Ignoring unknown team field '{}'", other),
        }
    }
    Ok(form)
}

/// Resolve the roster scope of the caller: admins manage the global roster
/// (NULL candidate id), candidates manage their own.
async fn roster_scope(state: &AppState, auth: &AuthUser) -> Result<Option<i32>, StatusCode> {
    if auth.role == user::Role::Admin {
        return Ok(None);
    }
    match candidate::Entity::find()
        .filter(candidate::Column::UserId.eq(auth.id))
        .one(&state.db)
        .await
    {
        Ok(Some(profile)) => Ok(Some(profile.id)),
        Ok(None) => {
            warn!("User {} has no candidate profile", auth.id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to resolve candidate for user {}: {}", auth.id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn scope_filter(scope: Option<i32>) -> sea_orm::Condition {
    match scope {
        None => sea_orm::Condition::all().add(team_member::Column::CandidateId.is_null()),
        Some(candidate_id) => {
            sea_orm::Condition::all().add(team_member::Column::CandidateId.eq(candidate_id))
        }
    }
}

/// List global (platform) team members
#[utoipa::path(
    get,
    path = "/api/v1/team/public",
    tag = "team",
    responses(
        (status = 200, description = "Global team retrieved successfully", body = ApiResponse<Vec<TeamMemberResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_public_global_team(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamMemberResponse>>>, StatusCode> {
    trace!("Entering get_public_global_team function");

    match team_member::Entity::find()
        .filter(team_member::Column::CandidateId.is_null())
        .all(&state.db)
        .await
    {
        Ok(members) => {
            debug!("Retrieved {} global team members", members.len());
            Ok(Json(ApiResponse {
                data: members
                    .into_iter()
                    .map(|m| TeamMemberResponse::from_model(m, &state.config.base_url))
                    .collect(),
                message: "Team members retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to retrieve global team: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List team members of a candidate by slug
#[utoipa::path(
    get,
    path = "/api/v1/team/public/{slug}",
    tag = "team",
    params(
        ("slug" = String, Path, description = "Unique slug of the candidate"),
    ),
    responses(
        (status = 200, description = "Candidate team retrieved successfully", body = ApiResponse<Vec<TeamMemberResponse>>),
        (status = 404, description = "Candidate not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_public_team_by_slug(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamMemberResponse>>>, StatusCode> {
    trace!("Entering get_public_team_by_slug for {}", slug);

    let candidate_model = match candidate::Entity::find()
        .filter(candidate::Column::Slug.eq(slug.as_str()))
        .one(&state.db)
        .await
    {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Candidate {} not found", slug);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to load candidate {}: {}", slug, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    match team_member::Entity::find()
        .filter(team_member::Column::CandidateId.eq(candidate_model.id))
        .all(&state.db)
        .await
    {
        Ok(members) => Ok(Json(ApiResponse {
            data: members
                .into_iter()
                .map(|m| TeamMemberResponse::from_model(m, &state.config.base_url))
                .collect(),
            message: "Team members retrieved successfully".to_string(),
            success: true,
        })),
        Err(db_error) => {
            error!("Failed to load team for {}: {}", slug, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List team members in the caller's scope
#[utoipa::path(
    get,
    path = "/api/v1/team",
    tag = "team",
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Team retrieved successfully", body = ApiResponse<Vec<TeamMemberResponse>>),
        (status = 404, description = "Candidate not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_team_members(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<TeamMemberResponse>>>, StatusCode> {
    trace!("Entering get_team_members for user {}", auth.id);
    let scope = roster_scope(&state, &auth).await?;

    match team_member::Entity::find()
        .filter(scope_filter(scope))
        .all(&state.db)
        .await
    {
        Ok(members) => {
            debug!("Retrieved {} team members in scope {:?}", members.len(), scope);
            Ok(Json(ApiResponse {
                data: members
                    .into_iter()
                    .map(|m| TeamMemberResponse::from_model(m, &state.config.base_url))
                    .collect(),
                message: "Team members retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to retrieve team members: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Add a team member in the caller's scope
#[utoipa::path(
    post,
    path = "/api/v1/team",
    tag = "team",
    request_body(content = String, content_type = "multipart/form-data"),
    security(("bearerAuth" = [])),
    responses(
        (status = 201, description = "Team member added", body = ApiResponse<TeamMemberResponse>),
        (status = 400, description = "Missing member name", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn add_team_member(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<TeamMemberResponse>>), StatusCode> {
    trace!("Entering add_team_member for user {}", auth.id);
    let scope = roster_scope(&state, &auth).await?;
    let form = collect_team_form(multipart).await?;

    let Some(name) = form.name.filter(|n| !n.trim().is_empty()) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let photo_url = match &form.image {
        Some((filename, bytes)) => Some(
            save_upload(&state.config.upload_dir, filename, bytes)
                .await
                .map_err(|e| {
                    error!("Failed to store team photo: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                })?,
        ),
        None => None,
    };

    let inserted = team_member::ActiveModel {
        candidate_id: Set(scope),
        name: Set(name),
        role: Set(form.role.unwrap_or_default()),
        photo_url: Set(photo_url),
        facebook_link: Set(form.facebook_link),
        linkedin_link: Set(form.linkedin_link),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| {
        error!("Failed to insert team member: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!("Team member {} added in scope {:?}", inserted.id, scope);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: TeamMemberResponse::from_model(inserted, &state.config.base_url),
            message: "Team member added".to_string(),
            success: true,
        }),
    ))
}

/// Update a team member in the caller's scope
#[utoipa::path(
    put,
    path = "/api/v1/team/{id}",
    tag = "team",
    params(
        ("id" = i32, Path, description = "Team member ID"),
    ),
    request_body(content = String, content_type = "multipart/form-data"),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Team member updated", body = ApiResponse<TeamMemberResponse>),
        (status = 404, description = "Team member not found or access denied", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn update_team_member(
    Path(member_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Json<ApiResponse<TeamMemberResponse>>, StatusCode> {
    trace!("Entering update_team_member {} for user {}", member_id, auth.id);
    let scope = roster_scope(&state, &auth).await?;

    let existing = team_member::Entity::find_by_id(member_id)
        .filter(scope_filter(scope))
        .one(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to load team member {}: {}", member_id, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            warn!("Team member {} not in scope {:?}", member_id, scope);
            StatusCode::NOT_FOUND
        })?;

    let form = collect_team_form(multipart).await?;

    let photo_url = match &form.image {
        Some((filename, bytes)) => Some(
            save_upload(&state.config.upload_dir, filename, bytes)
                .await
                .map_err(|e| {
                    error!("Failed to store team photo: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR
                })?,
        ),
        None => None,
    };

    let mut active = existing.into_active_model();
    let mut changed = 0;
    if let Some(name) = form.name {
        active.name = Set(name);
        changed += 1;
    }
    if let Some(role) = form.role {
        active.role = Set(role);
        changed += 1;
    }
    if let Some(link) = form.facebook_link {
        active.facebook_link = Set(Some(link));
        changed += 1;
    }
    if let Some(link) = form.linkedin_link {
        active.linkedin_link = Set(Some(link));
        changed += 1;
    }
    if let Some(url) = photo_url {
        active.photo_url = Set(Some(url));
        changed += 1;
    }

    if changed == 0 {
        debug!("No changes provided for team member {}", member_id);
        return Err(StatusCode::BAD_REQUEST);
    }

    let updated = active.update(&state.db).await.map_err(|e| {
        error!("Failed to update team member {}: {}", member_id, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!("Team member {} updated ({} fields)", member_id, changed);
    Ok(Json(ApiResponse {
        data: TeamMemberResponse::from_model(updated, &state.config.base_url),
        message: "Team member updated successfully".to_string(),
        success: true,
    }))
}

/// Delete a team member in the caller's scope
#[utoipa::path(
    delete,
    path = "/api/v1/team/{id}",
    tag = "team",
    params(
        ("id" = i32, Path, description = "Team member ID"),
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Team member deleted", body = ApiResponse<String>),
        (status = 404, description = "Team member not found or access denied", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_team_member(
    Path(member_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_team_member {} for user {}", member_id, auth.id);
    let scope = roster_scope(&state, &auth).await?;

    match team_member::Entity::delete_many()
        .filter(team_member::Column::Id.eq(member_id))
        .filter(scope_filter(scope))
        .exec(&state.db)
        .await
    {
        Ok(result) if result.rows_affected > 0 => {
            info!("Team member {} deleted", member_id);
            Ok(Json(ApiResponse {
                data: format!("Team member {} deleted", member_id),
                message: "Team member deleted".to_string(),
                success: true,
            }))
        }
        Ok(_) => {
            warn!("Team member {} not found for deletion", member_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to delete team member {}: {}", member_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
