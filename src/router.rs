use crate::handlers::{
    auth::{login, register, update_own_profile},
    candidates::{get_candidate_profile, get_candidates_by_district, update_candidate},
    contact::{get_all_messages, get_my_messages, mark_message_read, submit_contact},
    health::health_check,
    import::import_workbook,
    locations::{get_districts, get_divisions},
    media::{delete_gallery_item, update_profile_photo, upload_gallery, upload_gallery_admin},
    team::{
        add_team_member, delete_team_member, get_public_global_team, get_public_team_by_slug,
        get_team_members, update_team_member,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let upload_dir = state.config.upload_dir.clone();

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Auth routes
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/profile", put(update_own_profile))
        // Location reference routes
        .route("/api/v1/locations/divisions", get(get_divisions))
        .route("/api/v1/locations/districts", get(get_districts))
        // Candidate routes
        .route(
            "/api/v1/candidates/by-district",
            get(get_candidates_by_district),
        )
        .route(
            "/api/v1/candidates/profile/:slug",
            get(get_candidate_profile),
        )
        .route("/api/v1/candidates/:slug", put(update_candidate))
        // Team routes
        .route("/api/v1/team/public", get(get_public_global_team))
        .route("/api/v1/team/public/:slug", get(get_public_team_by_slug))
        .route("/api/v1/team", get(get_team_members))
        .route("/api/v1/team", post(add_team_member))
        .route("/api/v1/team/:id", put(update_team_member))
        .route("/api/v1/team/:id", delete(delete_team_member))
        // Media routes
        .route("/api/v1/media/gallery", post(upload_gallery))
        .route("/api/v1/media/gallery/admin", post(upload_gallery_admin))
        .route("/api/v1/media/gallery/:id", delete(delete_gallery_item))
        .route(
            "/api/v1/media/profile-photo/:slug",
            post(update_profile_photo),
        )
        // Contact routes
        .route("/api/v1/contact/submit", post(submit_contact))
        .route("/api/v1/contact/messages", get(get_all_messages))
        .route("/api/v1/contact/my-messages", get(get_my_messages))
        .route(
            "/api/v1/contact/messages/:id/mark-read",
            put(mark_message_read),
        )
        // Bulk import
        .route("/api/v1/import", post(import_workbook))
        // Uploaded files
        .nest_service("/uploads", ServeDir::new(upload_dir))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Workbooks and gallery batches exceed the 2 MB default body cap.
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
