use crate::config::AppConfig;
use crate::handlers::candidates::CandidateProfileResponse;
use crate::mailer::Mailer;
use moka::future::Cache;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Rendered profile responses keyed by slug
    pub cache: Cache<String, CandidateProfileResponse>,
    /// Environment-derived configuration
    pub config: AppConfig,
    /// SMTP mailer, absent when SMTP is not configured
    pub mailer: Option<Arc<Mailer>>,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// Registers the bearer-token security scheme referenced by the protected
/// paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    paths(
        crate::handlers::health::health_check,
        crate::handlers::auth::register,
        crate::handlers::auth::login,
        crate::handlers::auth::update_own_profile,
        crate::handlers::locations::get_divisions,
        crate::handlers::locations::get_districts,
        crate::handlers::candidates::get_candidates_by_district,
        crate::handlers::candidates::get_candidate_profile,
        crate::handlers::candidates::update_candidate,
        crate::handlers::team::get_public_global_team,
        crate::handlers::team::get_public_team_by_slug,
        crate::handlers::team::get_team_members,
        crate::handlers::team::add_team_member,
        crate::handlers::team::update_team_member,
        crate::handlers::team::delete_team_member,
        crate::handlers::media::upload_gallery,
        crate::handlers::media::upload_gallery_admin,
        crate::handlers::media::delete_gallery_item,
        crate::handlers::media::update_profile_photo,
        crate::handlers::contact::submit_contact,
        crate::handlers::contact::get_all_messages,
        crate::handlers::contact::get_my_messages,
        crate::handlers::contact::mark_message_read,
        crate::handlers::import::import_workbook,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            crate::handlers::auth::LoginRequest,
            crate::handlers::auth::LoginResponse,
            crate::handlers::auth::UserResponse,
            crate::handlers::auth::RegisterResponse,
            crate::handlers::auth::ProfilePatch,
            crate::handlers::locations::DivisionResponse,
            crate::handlers::locations::DistrictResponse,
            crate::handlers::candidates::CandidateSummaryResponse,
            crate::handlers::candidates::CandidateProfileResponse,
            crate::handlers::candidates::CandidatePatch,
            crate::handlers::team::TeamMemberResponse,
            crate::handlers::media::GalleryItemResponse,
            crate::handlers::contact::ContactSubmission,
            crate::handlers::contact::ContactMessageResponse,
            crate::importer::ImportSummary,
            crate::importer::SkippedRow,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and self-service profile updates"),
        (name = "locations", description = "Division and district reference data"),
        (name = "candidates", description = "Public candidate profiles and admin updates"),
        (name = "team", description = "Global and per-candidate team rosters"),
        (name = "media", description = "Gallery and profile photo uploads"),
        (name = "contact", description = "Visitor contact messages"),
        (name = "import", description = "Bulk spreadsheet import"),
    ),
    info(
        title = "Prarthi API",
        description = "Candidate microsite platform - profiles, rosters, galleries, contact messages and bulk import",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
