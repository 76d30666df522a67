use crate::schemas::{ApiResponse, AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use model::entities::{district, division};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, trace};
use utoipa::ToSchema;

/// Division reference row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionResponse {
    pub id: i32,
    pub name: String,
    pub bn_name: String,
}

impl From<division::Model> for DivisionResponse {
    fn from(model: division::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            bn_name: model.bn_name,
        }
    }
}

/// District reference row
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistrictResponse {
    pub id: i32,
    pub division_id: i32,
    pub name: String,
    pub bn_name: String,
}

impl From<district::Model> for DistrictResponse {
    fn from(model: district::Model) -> Self {
        Self {
            id: model.id,
            division_id: model.division_id,
            name: model.name,
            bn_name: model.bn_name,
        }
    }
}

/// Query parameters for district listing
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistrictQuery {
    /// Restrict to one division
    pub division_id: Option<i32>,
}

/// List all divisions
#[utoipa::path(
    get,
    path = "/api/v1/locations/divisions",
    tag = "locations",
    responses(
        (status = 200, description = "Divisions retrieved successfully", body = ApiResponse<Vec<DivisionResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_divisions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DivisionResponse>>>, StatusCode> {
    trace!("Entering get_divisions function");

    match division::Entity::find()
        .order_by_asc(division::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(divisions) => {
            debug!("Retrieved {} divisions", divisions.len());
            let response = ApiResponse {
                data: divisions.into_iter().map(DivisionResponse::from).collect(),
                message: "Divisions retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve divisions: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// List districts, optionally filtered by division
#[utoipa::path(
    get,
    path = "/api/v1/locations/districts",
    tag = "locations",
    params(
        ("divisionId" = Option<i32>, Query, description = "Restrict to one division"),
    ),
    responses(
        (status = 200, description = "Districts retrieved successfully", body = ApiResponse<Vec<DistrictResponse>>),
        (status = 500, description = "Internal server error", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_districts(
    Query(query): Query<DistrictQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<DistrictResponse>>>, StatusCode> {
    trace!("Entering get_districts function");

    let mut select = district::Entity::find().order_by_asc(district::Column::Id);
    if let Some(division_id) = query.division_id {
        debug!("Filtering districts by division {}", division_id);
        select = select.filter(district::Column::DivisionId.eq(division_id));
    }

    match select.all(&state.db).await {
        Ok(districts) => {
            debug!("Retrieved {} districts", districts.len());
            let response = ApiResponse {
                data: districts.into_iter().map(DistrictResponse::from).collect(),
                message: "Districts retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve districts: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
