use crate::auth::{hash_password, issue_token, role_as_str, verify_password, AuthUser};
use crate::helpers::uploads::save_upload;
use crate::importer::derive_username;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{candidate, district, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for login
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Authenticated user summary
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub role: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            role: role_as_str(model.role).to_string(),
            username: model.username,
        }
    }
}

/// Login response with the bearer token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Registration response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: i32,
    pub username: String,
    pub slug: String,
}

/// Self-service profile update. The field set is the allowlist: seat
/// columns and the slug are deliberately absent, only an admin (or the
/// importer) may move a profile to another seat.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub full_name_en: Option<String>,
    pub full_name_bn: Option<String>,
    pub designation: Option<String>,
    pub brief_intro: Option<String>,
    pub intro_bn: Option<String>,
    pub political_journey: Option<String>,
    pub political_journey_bn: Option<String>,
    pub personal_profile: Option<String>,
    pub personal_profile_bn: Option<String>,
    pub vision: Option<String>,
    pub vision_bn: Option<String>,
    pub facebook_link: Option<String>,
    pub responsible_person: Option<String>,
    pub email: Option<String>,
}

impl ProfilePatch {
    /// Apply present fields to the active model; returns how many were set.
    fn apply(self, active: &mut candidate::ActiveModel) -> usize {
        let mut changed = 0;
        macro_rules! apply_field {
            ($field:ident) => {
                if let Some(value) = self.$field {
                    active.$field = Set(value);
                    changed += 1;
                }
            };
        }
        apply_field!(full_name_en);
        apply_field!(full_name_bn);
        apply_field!(brief_intro);
        apply_field!(intro_bn);
        apply_field!(political_journey);
        apply_field!(political_journey_bn);
        apply_field!(personal_profile);
        apply_field!(personal_profile_bn);
        apply_field!(vision);
        apply_field!(vision_bn);
        apply_field!(facebook_link);
        apply_field!(responsible_person);
        apply_field!(email);
        if let Some(value) = self.designation {
            active.designation = Set(Some(value));
            changed += 1;
        }
        changed
    }
}

#[derive(Debug, Default)]
struct RegisterForm {
    candidate_name_en: Option<String>,
    candidate_name_bn: Option<String>,
    division_id: Option<i32>,
    district_id: Option<i32>,
    constituency_no: Option<i32>,
    password: Option<String>,
    image: Option<(String, Vec<u8>)>,
}

fn bad_request(error: String, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
            success: false,
        }),
    )
}

fn internal_error(error: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: error.to_string(),
            code: "INTERNAL_ERROR".to_string(),
            success: false,
        }),
    )
}

async fn collect_register_form(
    mut multipart: Multipart,
) -> Result<RegisterForm, (StatusCode, Json<ErrorResponse>)> {
    let mut form = RegisterForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(format!("Malformed multipart body: {}", e), "BAD_MULTIPART"))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "candidateNameEn" => form.candidate_name_en = field.text().await.ok(),
            "candidateNameBn" => form.candidate_name_bn = field.text().await.ok(),
            "divisionId" => {
                form.division_id = field.text().await.ok().and_then(|v| v.trim().parse().ok())
            }
            "districtId" => {
                form.district_id = field.text().await.ok().and_then(|v| v.trim().parse().ok())
            }
            "constituteNo" | "constituencyNo" => {
                form.constituency_no =
                    field.text().await.ok().and_then(|v| v.trim().parse().ok())
            }
            "password" => form.password = field.text().await.ok(),
            "image" => {
                let filename = field.file_name().unwrap_or("photo").to_string();
                if let Ok(bytes) = field.bytes().await {
                    form.image = Some((filename, bytes.to_vec()));
                }
            }
            other => debug!("Ignoring unknown register field '{}'", other),
        }
    }

    Ok(form)
}

/// Register a new candidate account and profile
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Candidate registered successfully", body = ApiResponse<RegisterResponse>),
        (status = 400, description = "Invalid input or user already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering register function");
    let form = collect_register_form(multipart).await?;

    let (Some(name_en), Some(name_bn), Some(division_id), Some(district_id), Some(constituency_no), Some(password)) = (
        form.candidate_name_en.clone(),
        form.candidate_name_bn.clone(),
        form.division_id,
        form.district_id,
        form.constituency_no,
        form.password.clone(),
    ) else {
        return Err(bad_request(
            "candidateNameEn, candidateNameBn, divisionId, districtId, constituteNo and password are required".to_string(),
            "MISSING_FIELDS",
        ));
    };

    // The username is derived from the seat, so the district must resolve
    // first, scoped to the submitted division.
    let district_model = district::Entity::find_by_id(district_id)
        .one(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to look up district {}: {}", district_id, e);
            internal_error("Internal server error")
        })?
        .filter(|d| d.division_id == division_id)
        .ok_or_else(|| bad_request("Invalid district ID".to_string(), "INVALID_DISTRICT"))?;

    let username = derive_username(&district_model.name, constituency_no);
    let slug = username.to_lowercase();
    debug!("Registering candidate {} (slug {})", username, slug);

    let photo_url = match &form.image {
        Some((filename, bytes)) => Some(
            save_upload(&state.config.upload_dir, filename, bytes)
                .await
                .map_err(|e| {
                    error!("Failed to store registration photo: {}", e);
                    internal_error("Failed to store uploaded photo")
                })?,
        ),
        None => None,
    };

    let password_hash = hash_password(&password).map_err(|e| {
        error!("Password hashing failed: {}", e);
        internal_error("Internal server error")
    })?;

    let txn = state.db.begin().await.map_err(|e| {
        error!("Failed to open transaction: {}", e);
        internal_error("Internal server error")
    })?;

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username.as_str()))
        .one(&txn)
        .await
        .map_err(|e| {
            error!("Failed to check username '{}': {}", username, e);
            internal_error("Internal server error")
        })?;
    if existing.is_some() {
        warn!("Registration rejected: user {} already exists", username);
        return Err(bad_request(
            format!("User {} already exists", username),
            "USER_ALREADY_EXISTS",
        ));
    }

    let account = user::ActiveModel {
        username: Set(username.clone()),
        password_hash: Set(password_hash),
        role: Set(user::Role::Candidate),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        error!("Failed to insert user '{}': {}", username, e);
        internal_error("Internal server error")
    })?;

    candidate::ActiveModel {
        user_id: Set(account.id),
        slug: Set(slug.clone()),
        full_name_en: Set(name_en),
        full_name_bn: Set(name_bn),
        division_id: Set(division_id),
        district_id: Set(district_model.id),
        constituency_no: Set(constituency_no),
        photo_url: Set(photo_url),
        designation: Set(None),
        brief_intro: Set(String::new()),
        intro_bn: Set(String::new()),
        political_journey: Set(String::new()),
        political_journey_bn: Set(String::new()),
        personal_profile: Set(String::new()),
        personal_profile_bn: Set(String::new()),
        vision: Set(String::new()),
        vision_bn: Set(String::new()),
        facebook_link: Set(String::new()),
        responsible_person: Set(String::new()),
        email: Set(String::new()),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| {
        error!("Failed to insert candidate profile '{}': {}", slug, e);
        internal_error("Internal server error")
    })?;

    txn.commit().await.map_err(|e| {
        error!("Failed to commit registration: {}", e);
        internal_error("Internal server error")
    })?;

    info!("Candidate registered: {} (user {})", slug, account.id);
    let response = ApiResponse {
        data: RegisterResponse {
            user_id: account.id,
            username,
            slug,
        },
        message: "Candidate registered successfully".to_string(),
        success: true,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, StatusCode> {
    trace!("Entering login function");
    debug!("Login attempt for username: {}", request.username);

    let account = match user::Entity::find()
        .filter(user::Column::Username.eq(request.username.as_str()))
        .one(&state.db)
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            warn!("Login failed: unknown username {}", request.username);
            return Err(StatusCode::UNAUTHORIZED);
        }
        Err(db_error) => {
            error!("Failed to look up user '{}': {}", request.username, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if !verify_password(&request.password, &account.password_hash) {
        warn!("Login failed: bad password for {}", request.username);
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = issue_token(&state.config.jwt_secret, &account).map_err(|e| {
        error!("Failed to issue token for {}: {}", account.username, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    info!("User {} logged in", account.username);
    let response = ApiResponse {
        data: LoginResponse {
            token,
            user: UserResponse::from(account),
        },
        message: "Login successful".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update the logged-in candidate's own profile
#[utoipa::path(
    put,
    path = "/api/v1/auth/profile",
    tag = "auth",
    request_body = ProfilePatch,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Profile updated successfully", body = ApiResponse<String>),
        (status = 404, description = "Candidate profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, patch))]
pub async fn update_own_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering update_own_profile for user {}", auth.id);

    let profile = match candidate::Entity::find()
        .filter(candidate::Column::UserId.eq(auth.id))
        .one(&state.db)
        .await
    {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            warn!("User {} has no candidate profile", auth.id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to load profile for user {}: {}", auth.id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let slug = profile.slug.clone();
    let mut active = profile.into_active_model();
    let changed = patch.apply(&mut active);
    if changed == 0 {
        debug!("No profile fields provided for user {}", auth.id);
        return Ok(Json(ApiResponse {
            data: slug,
            message: "No changes provided".to_string(),
            success: true,
        }));
    }

    if let Err(db_error) = active.update(&state.db).await {
        error!("Failed to update profile for user {}: {}", auth.id, db_error);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    state.cache.invalidate(&slug).await;
    info!("Profile {} updated ({} fields)", slug, changed);
    Ok(Json(ApiResponse {
        data: slug,
        message: "Profile updated successfully".to_string(),
        success: true,
    }))
}
