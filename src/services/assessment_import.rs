use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use thiserror::Error;
use validator::Validate;

use crate::db::models::Assessment;
use crate::db::types::{count_questions, Question, Section};
use crate::services::answer_key::{self, LetterStyle, ResolvedVia};

/// Options past this count have no letter in the review alphabet.
const LETTERED_OPTIONS: usize = 5;

/// The authoring document: what an admin pastes or uploads as JSON.
///
/// Store-managed fields are accepted so an exported record can be pasted back
/// as a template, but they are discarded.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub(crate) struct AssessmentDocument {
    #[serde(default, skip_serializing)]
    id: Option<serde_json::Value>,
    #[serde(default, skip_serializing)]
    created_at: Option<serde_json::Value>,
    #[serde(default, skip_serializing)]
    updated_at: Option<serde_json::Value>,
    pub(crate) title: String,
    #[validate(range(min = 1, message = "grade must be a positive integer"))]
    pub(crate) grade: i32,
    pub(crate) subject: String,
    #[serde(alias = "totalQuestions")]
    #[validate(range(min = 0, message = "total_questions must not be negative"))]
    pub(crate) total_questions: i32,
    pub(crate) sections: Vec<Section>,
}

impl AssessmentDocument {
    pub(crate) fn from_record(record: &Assessment) -> Self {
        Self {
            id: None,
            created_at: None,
            updated_at: None,
            title: record.title.clone(),
            grade: record.grade,
            subject: record.subject.clone(),
            total_questions: record.total_questions,
            sections: record.sections.0.clone(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct ImportedAssessment {
    pub(crate) document: AssessmentDocument,
    pub(crate) warnings: Vec<String>,
}

#[derive(Debug, Error)]
pub(crate) enum ImportError {
    #[error("assessment JSON is empty")]
    Empty,
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax { line: usize, column: usize, message: String },
    #[error("JSON does not match the assessment format at line {line}, column {column}: {message}")]
    Shape { line: usize, column: usize, message: String },
    #[error("assessment is invalid: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl ImportError {
    fn from_json(err: serde_json::Error) -> Self {
        let line = err.line();
        let column = err.column();
        let message = strip_position(&err.to_string());
        match err.classify() {
            Category::Data => Self::Shape { line, column, message },
            Category::Syntax | Category::Eof | Category::Io => {
                Self::Syntax { line, column, message }
            }
        }
    }
}

pub(crate) fn parse_document(raw: &str) -> Result<ImportedAssessment, ImportError> {
    if raw.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let document: AssessmentDocument =
        serde_json::from_str(raw).map_err(ImportError::from_json)?;
    let warnings = validate_document(&document)?;

    Ok(ImportedAssessment { document, warnings })
}

/// Checks every structural rule of the document. Violations are collected rather
/// than reported one at a time; the returned list holds non-fatal warnings.
pub(crate) fn validate_document(document: &AssessmentDocument) -> Result<Vec<String>, ImportError> {
    let mut errors = Vec::new();

    if let Err(err) = document.validate() {
        errors.push(err.to_string());
    }
    if document.title.trim().is_empty() {
        errors.push("title must not be empty".to_string());
    }
    if document.subject.trim().is_empty() {
        errors.push("subject must not be empty".to_string());
    }

    let mut warnings = Vec::new();
    check_sections(&document.sections, &mut errors, &mut warnings);

    if !errors.is_empty() {
        return Err(ImportError::Invalid(errors));
    }

    if let Some(drift) = total_questions_drift(document.total_questions, &document.sections) {
        warnings.push(drift);
    }
    if document.sections.is_empty() {
        warnings.push("assessment has no sections".to_string());
    }

    Ok(warnings)
}

/// Validates one section in place, as used by section and question edits.
pub(crate) fn validate_section(
    section_index: usize,
    section: &Section,
) -> Result<Vec<String>, ImportError> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    check_section(section_index, section, &mut errors, &mut warnings);

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ImportError::Invalid(errors))
    }
}

pub(crate) fn total_questions_drift(total_questions: i32, sections: &[Section]) -> Option<String> {
    let actual = count_questions(sections);
    (usize::try_from(total_questions).ok() != Some(actual)).then(|| {
        format!("total_questions is {total_questions} but the sections contain {actual} question(s)")
    })
}

fn check_sections(sections: &[Section], errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    for (section_index, section) in sections.iter().enumerate() {
        check_section(section_index, section, errors, warnings);
    }
}

fn check_section(
    section_index: usize,
    section: &Section,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    let section_path = format!("sections[{section_index}]");
    if section.name.trim().is_empty() {
        errors.push(format!("{section_path}.name must not be empty"));
    }

    let mut seen_ids = HashSet::new();
    for (question_index, question) in section.questions.iter().enumerate() {
        let path = format!("{section_path}.questions[{question_index}]");
        if !seen_ids.insert(question.id) {
            errors.push(format!("{path}: id {} is repeated within the section", question.id));
        }
        if let Err(message) = check_question(&path, question, warnings) {
            errors.push(message);
        }
    }
}

fn check_question(path: &str, question: &Question, warnings: &mut Vec<String>) -> Result<(), String> {
    if question.options.is_empty() {
        return Err(format!("{path}: options must contain at least one entry"));
    }

    let resolved = answer_key::resolve_question(question, LetterStyle::Lower);
    if resolved.via == ResolvedVia::Unresolved {
        return Err(format!(
            "{path}: answer {:?} matches no option and is not a position in 1..={}",
            question.answer,
            question.options.len()
        ));
    }

    if resolved.via == ResolvedVia::Text {
        let index_reading = answer_key::parse_position(&question.answer)
            .filter(|position| (1..=question.options.len()).contains(position))
            .map(|position| position - 1);
        if matches!(index_reading, Some(index) if Some(index) != resolved.index) {
            warnings.push(format!(
                "{path}: answer {:?} is read as option text, not as a position",
                question.answer
            ));
        }
    }

    if question.options.len() > LETTERED_OPTIONS {
        warnings.push(format!(
            "{path}: {} options; labels after 'e' are shown as numbers",
            question.options.len()
        ));
    }

    Ok(())
}

fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(cut) => message[..cut].to_string(),
        None => message.to_string(),
    }
}
