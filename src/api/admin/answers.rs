use axum::{
    extract::{Path, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::core::metrics;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::assessment::AssessmentSummary;
use crate::schemas::views::AnswerReview;

use super::helpers;

pub(super) async fn list_answer_keys(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<AssessmentSummary>>, ApiError> {
    let records = repositories::assessments::list_recent(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assessments"))?;

    Ok(Json(records.iter().map(AssessmentSummary::from_db).collect()))
}

pub(super) async fn get_answer_review(
    Path(assessment_id): Path<String>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<AnswerReview>, ApiError> {
    let record = helpers::fetch_assessment(&state, &assessment_id).await?;
    let review = AnswerReview::from_db(record);

    if review.unresolved_count > 0 {
        tracing::warn!(
            assessment_id = %review.id,
            unresolved = review.unresolved_count,
            "Answer review contains unresolvable answers"
        );
    }
    metrics::record_unresolved_answers("answer_review", review.unresolved_count);

    Ok(Json(review))
}
