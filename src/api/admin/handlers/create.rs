use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::validate_payload;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::schemas::assessment::{AssessmentResponse, DuplicateRequest, ImportResponse};
use crate::services::assessment_import::{self, AssessmentDocument};

use super::super::helpers;

/// Accepts the document as a raw body so pasted JSON is parsed by the import
/// rules regardless of content type.
pub(in crate::api::admin) async fn create_assessment(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    let imported = match assessment_import::parse_document(&body) {
        Ok(imported) => imported,
        Err(err) => {
            metrics::record_import(false);
            tracing::warn!(error = %err, admin = ?admin.email(), "Rejected assessment import");
            return Err(err.into());
        }
    };

    let record =
        helpers::insert_document(&state, &imported.document, &imported.document.title).await?;
    metrics::record_import(true);
    tracing::info!(
        assessment_id = %record.id,
        admin = ?admin.email(),
        warnings = imported.warnings.len(),
        "Assessment imported"
    );

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            assessment: AssessmentResponse::from_db(record),
            warnings: imported.warnings,
        }),
    ))
}

pub(in crate::api::admin) async fn duplicate_assessment(
    Path(assessment_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<DuplicateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ImportResponse>), ApiError> {
    let payload = duplicate_request(&headers, payload)?;
    validate_payload(&payload)?;

    let source = helpers::fetch_assessment(&state, &assessment_id).await?;
    let document = AssessmentDocument::from_record(&source);
    let title = match helpers::non_blank("title", payload.title)? {
        Some(title) => title,
        None => format!("{} (copy)", source.title),
    };

    let warnings = assessment_import::validate_document(&document).unwrap_or_else(|err| {
        vec![format!("copied record does not pass import checks: {err}")]
    });
    let record = helpers::insert_document(&state, &document, &title).await?;
    tracing::info!(
        assessment_id = %record.id,
        source_id = %source.id,
        admin = ?admin.email(),
        "Assessment duplicated"
    );

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse { assessment: AssessmentResponse::from_db(record), warnings }),
    ))
}

/// A bodiless request takes the defaults. Any body that was sent must parse.
fn duplicate_request(
    headers: &HeaderMap,
    payload: Result<Json<DuplicateRequest>, JsonRejection>,
) -> Result<DuplicateRequest, ApiError> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(DuplicateRequest::default()),
        Err(_) if declares_empty_body(headers) => Ok(DuplicateRequest::default()),
        Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
    }
}

fn declares_empty_body(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim() == "0")
}
