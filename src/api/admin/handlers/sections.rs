use axum::{
    extract::{Path, State},
    Json,
};
use time::OffsetDateTime;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::validation::checked_index;
use crate::core::state::AppState;
use crate::core::time::now_utc;
use crate::db::types::Section;
use crate::repositories;
use crate::schemas::assessment::{QuestionUpdate, SectionUpdate};
use crate::schemas::views::EditorView;
use crate::services::assessment_import;

use super::super::helpers;

pub(in crate::api::admin) async fn update_section(
    Path((assessment_id, section_index)): Path<(String, i64)>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<SectionUpdate>,
) -> Result<Json<EditorView>, ApiError> {
    if payload.name.is_none() && payload.questions.is_none() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    let name = helpers::non_blank("name", payload.name)?;
    let questions = payload.questions;

    let view = edit_section(
        &state,
        &assessment_id,
        section_index,
        payload.expected_updated_at,
        move |section| {
            if let Some(name) = name {
                section.name = name;
            }
            if let Some(questions) = questions {
                section.questions = questions;
            }
            Ok(())
        },
    )
    .await?;

    tracing::info!(
        assessment_id = %assessment_id,
        section_index,
        admin = ?admin.email(),
        "Section updated"
    );
    Ok(Json(view))
}

pub(in crate::api::admin) async fn update_question(
    Path((assessment_id, section_index, question_index)): Path<(String, i64, i64)>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<QuestionUpdate>,
) -> Result<Json<EditorView>, ApiError> {
    if payload.question.is_none() && payload.options.is_none() && payload.answer.is_none() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    let expected_updated_at = payload.expected_updated_at;

    let view = edit_section(
        &state,
        &assessment_id,
        section_index,
        expected_updated_at,
        move |section| {
            let index = checked_index(question_index, section.questions.len(), "Question")?;
            payload.apply(&mut section.questions[index]);
            Ok(())
        },
    )
    .await?;

    tracing::info!(
        assessment_id = %assessment_id,
        section_index,
        question_index,
        admin = ?admin.email(),
        "Question updated"
    );
    Ok(Json(view))
}

/// Locks the row, applies `edit` to one section and writes the whole
/// `sections` array back in the same transaction.
async fn edit_section<F>(
    state: &AppState,
    assessment_id: &str,
    section_index: i64,
    expected_updated_at: Option<OffsetDateTime>,
    edit: F,
) -> Result<EditorView, ApiError>
where
    F: FnOnce(&mut Section) -> Result<(), ApiError>,
{
    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start section transaction"))?;

    let record = repositories::assessments::lock_for_update(&mut *tx, assessment_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to lock assessment"))?
        .ok_or_else(ApiError::assessment_not_found)?;
    helpers::ensure_fresh(&record, expected_updated_at)?;

    let mut sections = record.sections.0;
    let index = checked_index(section_index, sections.len(), "Section")?;
    edit(&mut sections[index])?;
    let warnings = assessment_import::validate_section(index, &sections[index])?;

    let updated =
        repositories::assessments::replace_sections(&mut *tx, assessment_id, &sections, now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to save sections"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit section edit"))?;

    let mut view = EditorView::from_db(updated);
    view.warnings.extend(warnings);
    Ok(view)
}
