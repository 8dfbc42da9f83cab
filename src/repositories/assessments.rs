use sqlx::types::Json;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::models::{Assessment, GradeSubject};
use crate::db::types::Section;

const ASSESSMENT_COLUMNS: &str =
    "id, title, grade, subject, total_questions, sections, created_at, updated_at";

pub(crate) struct CreateAssessment<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) grade: i32,
    pub(crate) subject: &'a str,
    pub(crate) total_questions: i32,
    pub(crate) sections: &'a [Section],
    pub(crate) created_at: OffsetDateTime,
}

pub(crate) struct UpdateAssessment {
    pub(crate) title: Option<String>,
    pub(crate) grade: Option<i32>,
    pub(crate) subject: Option<String>,
    pub(crate) total_questions: Option<i32>,
    /// Only update when the stored row still carries this timestamp.
    pub(crate) expected_updated_at: Option<OffsetDateTime>,
    pub(crate) updated_at: OffsetDateTime,
}

pub(crate) async fn create(
    executor: impl sqlx::PgExecutor<'_>,
    params: CreateAssessment<'_>,
) -> Result<Assessment, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "INSERT INTO assessments (
            id, title, grade, subject, total_questions, sections, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$7)
         RETURNING {ASSESSMENT_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.grade)
    .bind(params.subject)
    .bind(params.total_questions)
    .bind(Json(params.sections))
    .bind(params.created_at)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl sqlx::PgExecutor<'_>,
    assessment_id: &str,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE id = $1"
    ))
    .bind(assessment_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assessments").fetch_one(pool).await
}

/// Most recently edited first.
pub(crate) async fn list_page(
    pool: &PgPool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {ASSESSMENT_COLUMNS}
         FROM assessments
         ORDER BY updated_at DESC, id
         OFFSET $1
         LIMIT $2"
    ))
    .bind(skip.max(0))
    .bind(limit.max(1))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_recent(pool: &PgPool) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {ASSESSMENT_COLUMNS} FROM assessments ORDER BY updated_at DESC, id"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_for_grade_subject(
    pool: &PgPool,
    grade: i32,
    subject: &str,
) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {ASSESSMENT_COLUMNS}
         FROM assessments
         WHERE grade = $1 AND subject = $2
         ORDER BY title, id"
    ))
    .bind(grade)
    .bind(subject)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_grade_subjects(pool: &PgPool) -> Result<Vec<GradeSubject>, sqlx::Error> {
    sqlx::query_as::<_, GradeSubject>(
        "SELECT grade, subject FROM assessments ORDER BY grade, subject",
    )
    .fetch_all(pool)
    .await
}

/// Returns `None` when no row matched the id and precondition.
pub(crate) async fn update_fields(
    pool: &PgPool,
    assessment_id: &str,
    params: UpdateAssessment,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "UPDATE assessments SET
            title = COALESCE($1, title),
            grade = COALESCE($2, grade),
            subject = COALESCE($3, subject),
            total_questions = COALESCE($4, total_questions),
            updated_at = $5
         WHERE id = $6
           AND ($7::timestamptz IS NULL OR updated_at = $7)
         RETURNING {ASSESSMENT_COLUMNS}"
    ))
    .bind(params.title)
    .bind(params.grade)
    .bind(params.subject)
    .bind(params.total_questions)
    .bind(params.updated_at)
    .bind(assessment_id)
    .bind(params.expected_updated_at)
    .fetch_optional(pool)
    .await
}

/// Row-locking read for section edits; run inside a transaction.
pub(crate) async fn lock_for_update(
    executor: impl sqlx::PgExecutor<'_>,
    assessment_id: &str,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE id = $1 FOR UPDATE"
    ))
    .bind(assessment_id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn replace_sections(
    executor: impl sqlx::PgExecutor<'_>,
    assessment_id: &str,
    sections: &[Section],
    updated_at: OffsetDateTime,
) -> Result<Assessment, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "UPDATE assessments SET sections = $1, updated_at = $2
         WHERE id = $3
         RETURNING {ASSESSMENT_COLUMNS}"
    ))
    .bind(Json(sections))
    .bind(updated_at)
    .bind(assessment_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn delete_by_id(pool: &PgPool, assessment_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assessments WHERE id = $1")
        .bind(assessment_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
