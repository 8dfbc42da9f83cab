use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use validator::Validate;

use crate::core::time::format_offset;
use crate::db::models::Assessment;
use crate::db::types::{Question, Section};

#[derive(Debug, Deserialize)]
pub(crate) struct BrowseQuery {
    #[serde(default)]
    pub(crate) grade: Option<i32>,
    #[serde(default)]
    pub(crate) subject: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminListQuery {
    #[serde(default)]
    pub(crate) page: Option<i64>,
    #[serde(default)]
    #[serde(alias = "pageSize")]
    pub(crate) page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteQuery {
    #[serde(default)]
    pub(crate) confirm: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct AssessmentUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 300, message = "title must be 1-300 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, message = "grade must be a positive integer"))]
    pub(crate) grade: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: Option<String>,
    #[serde(default)]
    #[serde(alias = "totalQuestions")]
    #[validate(range(min = 0, message = "total_questions must not be negative"))]
    pub(crate) total_questions: Option<i32>,
    #[serde(
        default,
        alias = "expectedUpdatedAt",
        deserialize_with = "deserialize_option_rfc3339"
    )]
    pub(crate) expected_updated_at: Option<OffsetDateTime>,
}

impl AssessmentUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.grade.is_none()
            && self.subject.is_none()
            && self.total_questions.is_none()
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub(crate) struct DuplicateRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 300, message = "title must be 1-300 characters"))]
    pub(crate) title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SectionUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) questions: Option<Vec<Question>>,
    #[serde(
        default,
        alias = "expectedUpdatedAt",
        deserialize_with = "deserialize_option_rfc3339"
    )]
    pub(crate) expected_updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionUpdate {
    #[serde(default)]
    pub(crate) question: Option<String>,
    #[serde(default)]
    pub(crate) options: Option<Vec<String>>,
    #[serde(default)]
    pub(crate) answer: Option<String>,
    #[serde(
        default,
        alias = "expectedUpdatedAt",
        deserialize_with = "deserialize_option_rfc3339"
    )]
    pub(crate) expected_updated_at: Option<OffsetDateTime>,
}

impl QuestionUpdate {
    pub(crate) fn apply(self, question: &mut Question) {
        if let Some(text) = self.question {
            question.question = text;
        }
        if let Some(options) = self.options {
            question.options = options;
        }
        if let Some(answer) = self.answer {
            question.answer = answer;
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentSummary {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) grade: i32,
    pub(crate) subject: String,
    pub(crate) total_questions: i32,
    pub(crate) updated_at: String,
}

impl AssessmentSummary {
    pub(crate) fn from_db(record: &Assessment) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            grade: record.grade,
            subject: record.subject.clone(),
            total_questions: record.total_questions,
            updated_at: format_offset(record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) grade: i32,
    pub(crate) subject: String,
    pub(crate) total_questions: i32,
    pub(crate) sections: Vec<Section>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl AssessmentResponse {
    pub(crate) fn from_db(record: Assessment) -> Self {
        Self {
            id: record.id,
            title: record.title,
            grade: record.grade,
            subject: record.subject,
            total_questions: record.total_questions,
            sections: record.sections.0,
            created_at: format_offset(record.created_at),
            updated_at: format_offset(record.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ImportResponse {
    pub(crate) assessment: AssessmentResponse,
    pub(crate) warnings: Vec<String>,
}

fn deserialize_option_rfc3339<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw {
        Some(value) => OffsetDateTime::parse(value.trim(), &Rfc3339)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid datetime: {value}"))),
        None => Ok(None),
    }
}
