use time::OffsetDateTime;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::core::time::{format_offset, now_utc};
use crate::db::models::Assessment;
use crate::repositories;
use crate::services::assessment_import::AssessmentDocument;

pub(super) async fn fetch_assessment(
    state: &AppState,
    assessment_id: &str,
) -> Result<Assessment, ApiError> {
    repositories::assessments::find_by_id(state.db(), assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assessment"))?
        .ok_or_else(ApiError::assessment_not_found)
}

pub(super) async fn insert_document(
    state: &AppState,
    document: &AssessmentDocument,
    title: &str,
) -> Result<Assessment, ApiError> {
    repositories::assessments::create(
        state.db(),
        repositories::assessments::CreateAssessment {
            id: &Uuid::new_v4().to_string(),
            title: title.trim(),
            grade: document.grade,
            subject: document.subject.trim(),
            total_questions: document.total_questions,
            sections: &document.sections,
            created_at: now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to insert assessment"))
}

/// Rejects an edit made against an older snapshot of the row.
pub(super) fn ensure_fresh(
    record: &Assessment,
    expected_updated_at: Option<OffsetDateTime>,
) -> Result<(), ApiError> {
    match expected_updated_at {
        Some(expected) if expected != record.updated_at => Err(stale_error(record.updated_at)),
        _ => Ok(()),
    }
}

/// A conditional update matched nothing: either the row is gone or it moved on.
pub(super) async fn explain_update_miss(state: &AppState, assessment_id: &str) -> ApiError {
    match fetch_assessment(state, assessment_id).await {
        Ok(current) => stale_error(current.updated_at),
        Err(err) => err,
    }
}

fn stale_error(current: OffsetDateTime) -> ApiError {
    ApiError::Conflict(format!(
        "Assessment was modified by someone else (updated_at is now {})",
        format_offset(current)
    ))
}

pub(super) fn non_blank(field: &str, value: Option<String>) -> Result<Option<String>, ApiError> {
    match value {
        Some(value) if value.trim().is_empty() => {
            Err(ApiError::BadRequest(format!("{field} must not be empty")))
        }
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}
