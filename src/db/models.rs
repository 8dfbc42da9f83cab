use sqlx::types::Json;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::types::Section;

#[derive(Debug, Clone, FromRow)]
pub(crate) struct Assessment {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) grade: i32,
    pub(crate) subject: String,
    pub(crate) total_questions: i32,
    pub(crate) sections: Json<Vec<Section>>,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub(crate) struct GradeSubject {
    pub(crate) grade: i32,
    pub(crate) subject: String,
}
