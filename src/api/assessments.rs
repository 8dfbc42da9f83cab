use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::assessment::{AssessmentSummary, BrowseQuery};
use crate::schemas::views::TakeView;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(browse)).route("/:assessment_id", get(take))
}

async fn browse(
    State(state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Vec<AssessmentSummary>>, ApiError> {
    let (Some(grade), Some(subject)) = (query.grade, query.subject) else {
        return Err(ApiError::BadRequest("grade and subject are required".to_string()));
    };

    let records = repositories::assessments::list_for_grade_subject(state.db(), grade, &subject)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assessments"))?;

    Ok(Json(records.iter().map(AssessmentSummary::from_db).collect()))
}

async fn take(
    Path(assessment_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TakeView>, ApiError> {
    let record = repositories::assessments::find_by_id(state.db(), &assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch assessment"))?
        .ok_or_else(ApiError::assessment_not_found)?;

    Ok(Json(TakeView::from_db(record)))
}
