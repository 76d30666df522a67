use crate::auth::AdminUser;
use crate::importer::{self, ImportError, ImportSummary};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, instrument, trace, warn};

fn error_response(
    status: StatusCode,
    error: String,
    code: &str,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
            success: false,
        }),
    )
}

/// Import candidates from an uploaded workbook (admin)
///
/// Parses the first sheet, upserts one account + profile per valid row and
/// returns the summary with the per-row skip ledger. Row-level problems are
/// reported in the ledger; any other failure rolls the whole batch back and
/// yields a single error with no partial summary.
#[utoipa::path(
    post,
    path = "/api/v1/import",
    tag = "import",
    request_body(content = String, content_type = "multipart/form-data"),
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Data imported successfully", body = ApiResponse<ImportSummary>),
        (status = 400, description = "Missing or unreadable file", body = ErrorResponse),
        (status = 500, description = "Import failed and was rolled back", body = ErrorResponse)
    )
)]
#[instrument(skip(state, multipart))]
pub async fn import_workbook(
    State(state): State<AppState>,
    _admin: AdminUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<ImportSummary>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering import_workbook function");

    // Refuse up front rather than create accounts with a guessed secret.
    let Some(default_password) = state.config.import_default_password.clone() else {
        error!("Import rejected: IMPORT_DEFAULT_PASSWORD is not configured");
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Import default password is not configured".to_string(),
            "IMPORT_PASSWORD_NOT_CONFIGURED",
        ));
    };

    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed multipart body: {}", e);
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Malformed multipart body: {}", e),
            "BAD_MULTIPART",
        )
    })? {
        if field.name() == Some("file") {
            let bytes = field.bytes().await.map_err(|e| {
                warn!("Failed to read uploaded file: {}", e);
                error_response(
                    StatusCode::BAD_REQUEST,
                    "Failed to read uploaded file".to_string(),
                    "BAD_UPLOAD",
                )
            })?;
            file = Some(bytes.to_vec());
        }
    }

    let Some(file) = file else {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "No file uploaded".to_string(),
            "NO_FILE",
        ));
    };
    info!("Import workbook received ({} bytes)", file.len());

    let rows = importer::parse_workbook(&file).map_err(|e| {
        warn!("Uploaded workbook failed to parse: {}", e);
        error_response(
            StatusCode::BAD_REQUEST,
            format!("Failed to parse workbook: {}", e),
            "BAD_WORKBOOK",
        )
    })?;

    let summary = importer::import_candidates(&state.db, rows, &default_password)
        .await
        .map_err(|e| match e {
            // Anything past parsing is batch-fatal: the transaction has
            // been rolled back and there is no partial summary to report.
            ImportError::Db(db_error) => {
                error!("Import aborted and rolled back: {}", db_error);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Import failed; no rows were committed".to_string(),
                    "IMPORT_FAILED",
                )
            }
            other => {
                error!("Import aborted: {}", other);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Import failed; no rows were committed".to_string(),
                    "IMPORT_FAILED",
                )
            }
        })?;

    // Imported rows may have rewritten any profile; drop the whole cache.
    state.cache.invalidate_all();

    info!(
        "Import committed: {} of {} rows ({} skipped)",
        summary.success, summary.total_rows, summary.skipped
    );
    Ok(Json(ApiResponse {
        data: summary,
        message: "Excel data imported successfully".to_string(),
        success: true,
    }))
}
