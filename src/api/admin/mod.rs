mod answers;
mod handlers;
mod helpers;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/assessments", get(handlers::list_assessments).post(handlers::create_assessment))
        .route(
            "/assessments/:assessment_id",
            get(handlers::get_assessment)
                .patch(handlers::update_assessment)
                .delete(handlers::delete_assessment),
        )
        .route("/assessments/:assessment_id/template", get(handlers::export_template))
        .route("/assessments/:assessment_id/duplicate", post(handlers::duplicate_assessment))
        .route(
            "/assessments/:assessment_id/sections/:section_index",
            put(handlers::update_section),
        )
        .route(
            "/assessments/:assessment_id/sections/:section_index/questions/:question_index",
            put(handlers::update_question),
        )
        .route("/answers", get(answers::list_answer_keys))
        .route("/answers/:assessment_id", get(answers::get_answer_review))
}

#[cfg(test)]
mod tests;
