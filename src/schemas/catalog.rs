use serde::{Deserialize, Serialize};

use crate::db::models::GradeSubject;

#[derive(Debug, Serialize)]
pub(crate) struct GradeSubjectResponse {
    pub(crate) grade: i32,
    pub(crate) subject: String,
}

impl GradeSubjectResponse {
    pub(crate) fn from_db(pair: GradeSubject) -> Self {
        Self { grade: pair.grade, subject: pair.subject }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CatalogResponse {
    pub(crate) pairs: Vec<GradeSubjectResponse>,
    pub(crate) grades: Vec<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubjectsQuery {
    #[serde(default)]
    pub(crate) grade: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectsResponse {
    pub(crate) grade: Option<i32>,
    pub(crate) subjects: Vec<String>,
}
