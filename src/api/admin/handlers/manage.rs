use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::validate_payload;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::core::time::now_utc;
use crate::repositories;
use crate::schemas::assessment::{AssessmentResponse, AssessmentUpdate, DeleteQuery};
use crate::schemas::views::EditorView;
use crate::services::assessment_import::AssessmentDocument;

use super::super::helpers;

pub(in crate::api::admin) async fn get_assessment(
    Path(assessment_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<EditorView>, ApiError> {
    let record = helpers::fetch_assessment(&state, &assessment_id).await?;
    let view = EditorView::from_db(record);
    metrics::record_unresolved_answers("editor", view.unresolved_count());

    Ok(Json(view))
}

pub(in crate::api::admin) async fn update_assessment(
    Path(assessment_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<AssessmentUpdate>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    validate_payload(&payload)?;
    if payload.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let title = helpers::non_blank("title", payload.title)?;
    let subject = helpers::non_blank("subject", payload.subject)?;

    let updated = repositories::assessments::update_fields(
        state.db(),
        &assessment_id,
        repositories::assessments::UpdateAssessment {
            title,
            grade: payload.grade,
            subject,
            total_questions: payload.total_questions,
            expected_updated_at: payload.expected_updated_at,
            updated_at: now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update assessment"))?;

    let Some(updated) = updated else {
        return Err(helpers::explain_update_miss(&state, &assessment_id).await);
    };

    tracing::info!(assessment_id = %updated.id, admin = ?admin.email(), "Assessment updated");
    Ok(Json(AssessmentResponse::from_db(updated)))
}

/// Deletion is irreversible and needs `?confirm=true`.
pub(in crate::api::admin) async fn delete_assessment(
    Path(assessment_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, ApiError> {
    if !query.confirm {
        return Err(ApiError::BadRequest(
            "Deletion must be confirmed with confirm=true".to_string(),
        ));
    }

    let deleted = repositories::assessments::delete_by_id(state.db(), &assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete assessment"))?;

    if !deleted {
        return Err(ApiError::assessment_not_found());
    }

    tracing::info!(assessment_id = %assessment_id, admin = ?admin.email(), "Assessment deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub(in crate::api::admin) async fn export_template(
    Path(assessment_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<AssessmentDocument>, ApiError> {
    let record = helpers::fetch_assessment(&state, &assessment_id).await?;
    Ok(Json(AssessmentDocument::from_record(&record)))
}
