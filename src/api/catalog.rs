use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::core::state::AppState;
use crate::db::models::GradeSubject;
use crate::repositories;
use crate::schemas::catalog::{
    CatalogResponse, GradeSubjectResponse, SubjectsQuery, SubjectsResponse,
};
use crate::services::catalog;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_catalog)).route("/subjects", get(list_subjects))
}

async fn load_pairs(state: &AppState) -> Result<Vec<GradeSubject>, ApiError> {
    let rows = repositories::assessments::list_grade_subjects(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load grade catalog"))?;
    Ok(catalog::distinct_grade_subjects(rows))
}

async fn list_catalog(State(state): State<AppState>) -> Result<Json<CatalogResponse>, ApiError> {
    let pairs = load_pairs(&state).await?;
    let grades = catalog::unique_grades(&pairs);

    Ok(Json(CatalogResponse {
        pairs: pairs.into_iter().map(GradeSubjectResponse::from_db).collect(),
        grades,
    }))
}

async fn list_subjects(
    State(state): State<AppState>,
    Query(query): Query<SubjectsQuery>,
) -> Result<Json<SubjectsResponse>, ApiError> {
    let pairs = load_pairs(&state).await?;
    let subjects = catalog::subjects_for_grade(&pairs, query.grade);

    Ok(Json(SubjectsResponse { grade: query.grade, subjects }))
}
