use crate::auth::{AdminUser, AuthUser};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{candidate, contact_message};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Visitor contact form body
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub slug_name: String,
}

/// Stored contact message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessageResponse {
    pub id: i32,
    pub candidate_slug: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
}

impl From<contact_message::Model> for ContactMessageResponse {
    fn from(model: contact_message::Model) -> Self {
        Self {
            id: model.id,
            candidate_slug: model.candidate_slug,
            name: model.name,
            email: model.email,
            subject: model.subject,
            message: model.message,
            status: match model.status {
                contact_message::MessageStatus::Unread => "unread".to_string(),
                contact_message::MessageStatus::Read => "read".to_string(),
            },
            created_at: model.created_at,
        }
    }
}

/// Message listing filters
#[derive(Debug, Deserialize, ToSchema)]
pub struct MessageQuery {
    /// `unread`, `read` or `all` (default)
    pub status: Option<String>,
    pub slug: Option<String>,
}

fn status_filter(status: Option<&str>) -> Option<contact_message::MessageStatus> {
    match status {
        Some("unread") => Some(contact_message::MessageStatus::Unread),
        Some("read") => Some(contact_message::MessageStatus::Read),
        _ => None,
    }
}

/// Submit a contact message to a candidate
#[utoipa::path(
    post,
    path = "/api/v1/contact/submit",
    tag = "contact",
    request_body = ContactSubmission,
    responses(
        (status = 200, description = "Message sent successfully", body = ApiResponse<String>),
        (status = 400, description = "All fields are required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, submission))]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(submission): Json<ContactSubmission>,
) -> Result<Json<ApiResponse<String>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering submit_contact function");

    let required = [
        &submission.name,
        &submission.email,
        &submission.subject,
        &submission.message,
        &submission.slug_name,
    ];
    if required.iter().any(|v| v.trim().is_empty()) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "All fields are required".to_string(),
                code: "MISSING_FIELDS".to_string(),
                success: false,
            }),
        ));
    }

    let internal = || {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "Internal server error".to_string(),
                code: "INTERNAL_ERROR".to_string(),
                success: false,
            }),
        )
    };

    contact_message::ActiveModel {
        candidate_slug: Set(submission.slug_name.clone()),
        name: Set(submission.name.clone()),
        email: Set(submission.email.clone()),
        subject: Set(submission.subject.clone()),
        message: Set(submission.message.clone()),
        status: Set(contact_message::MessageStatus::Unread),
        created_at: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| {
        error!("Failed to store contact message: {}", e);
        internal()
    })?;

    // Notify the candidate when they have an address configured. Email
    // delivery is best effort and never fails the submission.
    let candidate_model = candidate::Entity::find()
        .filter(candidate::Column::Slug.eq(submission.slug_name.as_str()))
        .one(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to load candidate {}: {}", submission.slug_name, e);
            internal()
        })?;

    if let Some(candidate_model) = candidate_model {
        if !candidate_model.email.is_empty() {
            if let Some(mailer) = &state.mailer {
                let candidate_name = if candidate_model.full_name_bn.is_empty() {
                    candidate_model.full_name_en.clone()
                } else {
                    candidate_model.full_name_bn.clone()
                };
                if let Err(e) = mailer
                    .send_contact_notification(
                        &candidate_model.email,
                        &candidate_name,
                        &candidate_model.slug,
                        &submission.name,
                        &submission.email,
                        &submission.subject,
                        &submission.message,
                    )
                    .await
                {
                    warn!("Contact notification failed: {}", e);
                }
            } else {
                debug!("No mailer configured; skipping contact notification");
            }
        }
    }

    info!("Contact message stored for {}", submission.slug_name);
    Ok(Json(ApiResponse {
        data: submission.slug_name,
        message: "Message sent successfully".to_string(),
        success: true,
    }))
}

/// List all contact messages (admin)
#[utoipa::path(
    get,
    path = "/api/v1/contact/messages",
    tag = "contact",
    params(
        ("status" = Option<String>, Query, description = "unread, read or all"),
        ("slug" = Option<String>, Query, description = "Filter by candidate slug"),
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Messages retrieved successfully", body = ApiResponse<Vec<ContactMessageResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_all_messages(
    Query(query): Query<MessageQuery>,
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<ApiResponse<Vec<ContactMessageResponse>>>, StatusCode> {
    trace!("Entering get_all_messages function");

    let mut select = contact_message::Entity::find()
        .order_by_desc(contact_message::Column::CreatedAt);
    if let Some(status) = status_filter(query.status.as_deref()) {
        select = select.filter(contact_message::Column::Status.eq(status));
    }
    if let Some(slug) = query.slug.as_deref().filter(|s| !s.is_empty()) {
        select = select.filter(contact_message::Column::CandidateSlug.eq(slug));
    }

    match select.all(&state.db).await {
        Ok(messages) => {
            debug!("Retrieved {} contact messages", messages.len());
            Ok(Json(ApiResponse {
                data: messages
                    .into_iter()
                    .map(ContactMessageResponse::from)
                    .collect(),
                message: "Messages retrieved successfully".to_string(),
                success: true,
            }))
        }
        Err(db_error) => {
            error!("Failed to retrieve contact messages: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List contact messages for the logged-in candidate
#[utoipa::path(
    get,
    path = "/api/v1/contact/my-messages",
    tag = "contact",
    params(
        ("status" = Option<String>, Query, description = "unread, read or all"),
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Messages retrieved successfully", body = ApiResponse<Vec<ContactMessageResponse>>),
        (status = 404, description = "Candidate profile not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_my_messages(
    Query(query): Query<MessageQuery>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ContactMessageResponse>>>, StatusCode> {
    trace!("Entering get_my_messages for user {}", auth.id);

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
            error!("Failed to resolve candidate for user {}: {}", auth.id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut select = contact_message::Entity::find()
        .filter(contact_message::Column::CandidateSlug.eq(profile.slug.as_str()))
        .order_by_desc(contact_message::Column::CreatedAt);
    if let Some(status) = status_filter(query.status.as_deref()) {
        select = select.filter(contact_message::Column::Status.eq(status));
    }

    match select.all(&state.db).await {
        Ok(messages) => Ok(Json(ApiResponse {
            data: messages
                .into_iter()
                .map(ContactMessageResponse::from)
                .collect(),
            message: "Messages retrieved successfully".to_string(),
            success: true,
        })),
        Err(db_error) => {
            error!("Failed to retrieve messages for {}: {}", profile.slug, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Mark a contact message as read
#[utoipa::path(
    put,
    path = "/api/v1/contact/messages/{id}/mark-read",
    tag = "contact",
    params(
        ("id" = i32, Path, description = "Message ID"),
    ),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Message marked as read", body = ApiResponse<String>),
        (status = 404, description = "Message not found or access denied", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn mark_message_read(
    Path(message_id): Path<i32>,
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering mark_message_read {} for user {}", message_id, auth.id);

    let message = match contact_message::Entity::find_by_id(message_id)
        .one(&state.db)
        .await
    {
        Ok(Some(message)) => message,
        Ok(None) => {
            warn!("Contact message {} not found", message_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to load message {}: {}", message_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Candidates may only touch messages addressed to their own slug.
    if auth.role != model::entities::user::Role::Admin {
        let profile = candidate::Entity::find()
            .filter(candidate::Column::UserId.eq(auth.id))
            .one(&state.db)
            .await
            .map_err(|e| {
                error!("Failed to resolve candidate for user {}: {}", auth.id, e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::NOT_FOUND)?;
        if profile.slug != message.candidate_slug {
            warn!(
                "User {} denied access to message {} of {}",
                auth.id, message_id, message.candidate_slug
            );
            return Err(StatusCode::NOT_FOUND);
        }
    }

    let mut active = message.into_active_model();
    active.status = Set(contact_message::MessageStatus::Read);
    if let Err(db_error) = active.update(&state.db).await {
        error!("Failed to mark message {} read: {}", message_id, db_error);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    info!("Contact message {} marked as read", message_id);
    Ok(Json(ApiResponse {
        data: format!("Message {} marked as read", message_id),
        message: "Message marked as read".to_string(),
        success: true,
    }))
}
