use axum::{
    extract::{Query, State},
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{range_for, PaginatedResponse};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::assessment::{AdminListQuery, AssessmentResponse};

pub(in crate::api::admin) async fn list_assessments(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<PaginatedResponse<AssessmentResponse>>, ApiError> {
    let pagination = state.settings().pagination();
    let page = query.page.unwrap_or(1);
    if page < 1 {
        return Err(ApiError::BadRequest("page must be at least 1".to_string()));
    }

    let page_size = query.page_size.unwrap_or(pagination.admin_page_size);
    if !(1..=pagination.max_page_size).contains(&page_size) {
        return Err(ApiError::BadRequest(format!(
            "page_size must be between 1 and {}",
            pagination.max_page_size
        )));
    }

    let fits = (page - 1)
        .checked_mul(page_size)
        .and_then(|from| from.checked_add(page_size))
        .is_some();
    if !fits {
        return Err(ApiError::BadRequest("page is out of range".to_string()));
    }

    let total_count = repositories::assessments::count_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count assessments"))?;

    let range = range_for(page, page_size);
    let records = repositories::assessments::list_page(state.db(), range.from, range.limit())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list assessments"))?;

    let items = records.into_iter().map(AssessmentResponse::from_db).collect();
    Ok(Json(PaginatedResponse::new(items, total_count, page, page_size)))
}
