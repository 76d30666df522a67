use crate::auth::AdminUser;
use crate::handlers::media::GalleryItemResponse;
use crate::handlers::team::TeamMemberResponse;
use crate::helpers::urls::format_url;
use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{candidate, district, division, media_item, team_member};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Candidate list entry for district listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummaryResponse {
    pub id: i32,
    pub full_name_en: String,
    pub full_name_bn: String,
    pub photo_url: Option<String>,
    pub designation: Option<String>,
    pub slug: String,
    pub district_bn: String,
    pub division_bn: String,
    pub constituency_no: i32,
}

/// Full candidate microsite payload: profile, reference names, roster and
/// gallery in one response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfileResponse {
    pub id: i32,
    pub full_name_en: String,
    pub full_name_bn: String,
    pub slug: String,
    pub division_id: i32,
    pub district_id: i32,
    pub constituency_no: i32,
    pub photo_url: Option<String>,
    pub designation: Option<String>,
    pub brief_intro: String,
    pub intro_bn: String,
    pub political_journey: String,
    pub political_journey_bn: String,
    pub personal_profile: String,
    pub personal_profile_bn: String,
    pub vision: String,
    pub vision_bn: String,
    pub facebook_link: String,
    pub responsible_person: String,
    pub email: String,
    pub district_en: String,
    pub district_bn: String,
    pub division_en: String,
    pub division_bn: String,
    pub team: Vec<TeamMemberResponse>,
    pub gallery: Vec<GalleryItemResponse>,
}

/// Admin-side candidate update. This struct is the field allowlist; unlike
/// the self-service patch it may also move the profile to another seat or
/// rewrite the slug.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CandidatePatch {
    pub slug: Option<String>,
    pub full_name_en: Option<String>,
    pub full_name_bn: Option<String>,
    pub division_id: Option<i32>,
    pub district_id: Option<i32>,
    pub constituency_no: Option<i32>,
    pub photo_url: Option<String>,
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

impl CandidatePatch {
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
        apply_field!(slug);
        apply_field!(full_name_en);
        apply_field!(full_name_bn);
        apply_field!(division_id);
        apply_field!(district_id);
        apply_field!(constituency_no);
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
        if let Some(value) = self.photo_url {
            active.photo_url = Set(Some(value));
            changed += 1;
        }
        if let Some(value) = self.designation {
            active.designation = Set(Some(value));
            changed += 1;
        }
        changed
    }
}

/// Query parameters for the district listing
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ByDistrictQuery {
    /// District name, English or Bengali
    pub district_name: String,
}

/// List candidates of a district (matched by English or Bengali name)
#[utoipa::path(
    get,
    path = "/api/v1/candidates/by-district",
    tag = "candidates",
    params(
        ("districtName" = String, Query, description = "District name, English or Bengali"),
    ),
    responses(
        (status = 200, description = "Candidates retrieved successfully", body = ApiResponse<Vec<CandidateSummaryResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_candidates_by_district(
    Query(query): Query<ByDistrictQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<CandidateSummaryResponse>>>, StatusCode> {
    trace!("Entering get_candidates_by_district function");
    let name = query.district_name.trim();

    let districts = district::Entity::find()
        .filter(
            district::Column::Name
                .eq(name)
                .or(district::Column::BnName.eq(name)),
        )
        .all(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to resolve district '{}': {}", name, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    if districts.is_empty() {
        debug!("No district matches '{}'", name);
        return Ok(Json(ApiResponse {
            data: vec![],
            message: "Candidates retrieved successfully".to_string(),
            success: true,
        }));
    }

    let district_ids: Vec<i32> = districts.iter().map(|d| d.id).collect();
    let district_by_id: HashMap<i32, &district::Model> =
        districts.iter().map(|d| (d.id, d)).collect();

    let division_ids: Vec<i32> = districts.iter().map(|d| d.division_id).collect();
    let divisions = division::Entity::find()
        .filter(division::Column::Id.is_in(division_ids))
        .all(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to load divisions: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let division_by_id: HashMap<i32, &division::Model> =
        divisions.iter().map(|d| (d.id, d)).collect();

    let candidates = candidate::Entity::find()
        .filter(candidate::Column::DistrictId.is_in(district_ids))
        .all(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to load candidates for '{}': {}", name, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let summaries = candidates
        .into_iter()
        .map(|c| {
            let district_bn = district_by_id
                .get(&c.district_id)
                .map(|d| d.bn_name.clone())
                .unwrap_or_default();
            let division_bn = division_by_id
                .get(&c.division_id)
                .map(|d| d.bn_name.clone())
                .unwrap_or_default();
            CandidateSummaryResponse {
                id: c.id,
                full_name_en: c.full_name_en,
                full_name_bn: c.full_name_bn,
                photo_url: format_url(&state.config.base_url, c.photo_url.as_deref()),
                designation: c.designation,
                slug: c.slug,
                district_bn,
                division_bn,
                constituency_no: c.constituency_no,
            }
        })
        .collect::<Vec<_>>();

    debug!("Found {} candidates for district '{}'", summaries.len(), name);
    Ok(Json(ApiResponse {
        data: summaries,
        message: "Candidates retrieved successfully".to_string(),
        success: true,
    }))
}

/// Fetch a candidate microsite by slug
#[utoipa::path(
    get,
    path = "/api/v1/candidates/profile/{slug}",
    tag = "candidates",
    params(
        ("slug" = String, Path, description = "Unique slug of the candidate"),
    ),
    responses(
        (status = 200, description = "Candidate profile retrieved successfully", body = ApiResponse<CandidateProfileResponse>),
        (status = 404, description = "Candidate not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_candidate_profile(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CandidateProfileResponse>>, StatusCode> {
    trace!("Entering get_candidate_profile for slug {}", slug);

    if let Some(profile) = state.cache.get(&slug).await {
        debug!("Profile {} served from cache", slug);
        return Ok(Json(ApiResponse {
            data: profile,
            message: "Candidate profile retrieved from cache".to_string(),
            success: true,
        }));
    }

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

    // The reference rows always exist for a stored profile; a miss here is
    // data corruption, not a 404.
    let district_model = district::Entity::find_by_id(candidate_model.district_id)
        .one(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to load district: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            error!(
                "Candidate {} references missing district {}",
                slug, candidate_model.district_id
            );
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let division_model = division::Entity::find_by_id(candidate_model.division_id)
        .one(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to load division: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            error!(
                "Candidate {} references missing division {}",
                slug, candidate_model.division_id
            );
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let team = team_member::Entity::find()
        .filter(team_member::Column::CandidateId.eq(candidate_model.id))
        .all(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to load team for {}: {}", slug, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let gallery = media_item::Entity::find()
        .filter(media_item::Column::CandidateId.eq(candidate_model.id))
        .all(&state.db)
        .await
        .map_err(|e| {
            error!("Failed to load gallery for {}: {}", slug, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let base_url = &state.config.base_url;
    let profile = CandidateProfileResponse {
        id: candidate_model.id,
        full_name_en: candidate_model.full_name_en,
        full_name_bn: candidate_model.full_name_bn,
        slug: candidate_model.slug,
        division_id: candidate_model.division_id,
        district_id: candidate_model.district_id,
        constituency_no: candidate_model.constituency_no,
        photo_url: format_url(base_url, candidate_model.photo_url.as_deref()),
        designation: candidate_model.designation,
        brief_intro: candidate_model.brief_intro,
        intro_bn: candidate_model.intro_bn,
        political_journey: candidate_model.political_journey,
        political_journey_bn: candidate_model.political_journey_bn,
        personal_profile: candidate_model.personal_profile,
        personal_profile_bn: candidate_model.personal_profile_bn,
        vision: candidate_model.vision,
        vision_bn: candidate_model.vision_bn,
        facebook_link: candidate_model.facebook_link,
        responsible_person: candidate_model.responsible_person,
        email: candidate_model.email,
        district_en: district_model.name,
        district_bn: district_model.bn_name,
        division_en: division_model.name,
        division_bn: division_model.bn_name,
        team: team
            .into_iter()
            .map(|m| TeamMemberResponse::from_model(m, base_url))
            .collect(),
        gallery: gallery
            .into_iter()
            .map(|m| GalleryItemResponse::from_model(m, base_url))
            .collect(),
    };

    state.cache.insert(slug.clone(), profile.clone()).await;
    info!("Profile {} rendered and cached", slug);

    Ok(Json(ApiResponse {
        data: profile,
        message: "Candidate profile retrieved successfully".to_string(),
        success: true,
    }))
}

/// Update any candidate profile (admin)
#[utoipa::path(
    put,
    path = "/api/v1/candidates/{slug}",
    tag = "candidates",
    params(
        ("slug" = String, Path, description = "Unique slug of the candidate"),
    ),
    request_body = CandidatePatch,
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Candidate updated successfully", body = ApiResponse<String>),
        (status = 400, description = "No valid fields provided", body = crate::schemas::ErrorResponse),
        (status = 404, description = "Candidate not found", body = crate::schemas::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument(skip(state, patch))]
pub async fn update_candidate(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(patch): Json<CandidatePatch>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering update_candidate for slug {}", slug);

    let candidate_model = match candidate::Entity::find()
        .filter(candidate::Column::Slug.eq(slug.as_str()))
        .one(&state.db)
        .await
    {
        Ok(Some(model)) => model,
        Ok(None) => {
            warn!("Candidate {} not found for update", slug);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to load candidate {}: {}", slug, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut active = candidate_model.into_active_model();
    let changed = patch.apply(&mut active);
    if changed == 0 {
        debug!("Candidate update for {} had no recognized fields", slug);
        return Err(StatusCode::BAD_REQUEST);
    }

    let updated = active.update(&state.db).await.map_err(|e| {
        error!("Failed to update candidate {}: {}", slug, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // The patch may have renamed the slug; drop both cache entries.
    state.cache.invalidate(&slug).await;
    state.cache.invalidate(&updated.slug).await;

    info!("Candidate {} updated ({} fields)", updated.slug, changed);
    Ok(Json(ApiResponse {
        data: updated.slug,
        message: "Candidate updated successfully".to_string(),
        success: true,
    }))
}
