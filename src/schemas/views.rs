//! Read-only projections of an assessment record for the take, editor and
//! answer-review screens.

use serde::Serialize;

use crate::core::time::format_offset;
use crate::db::models::Assessment;
use crate::db::types::{count_questions, Question};
use crate::services::answer_key::{self, LetterStyle, ResolvedVia};
use crate::services::assessment_import::total_questions_drift;

#[derive(Debug, Serialize)]
pub(crate) struct LabeledOption {
    pub(crate) label: String,
    pub(crate) text: String,
    pub(crate) display: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TakeQuestion {
    pub(crate) id: i64,
    pub(crate) question: String,
    pub(crate) options: Vec<LabeledOption>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TakeSection {
    pub(crate) name: String,
    pub(crate) questions: Vec<TakeQuestion>,
}

/// What a student sees. Answers are never included.
#[derive(Debug, Serialize)]
pub(crate) struct TakeView {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) grade: i32,
    pub(crate) subject: String,
    pub(crate) total_questions: i32,
    pub(crate) sections: Vec<TakeSection>,
}

impl TakeView {
    pub(crate) fn from_db(record: Assessment) -> Self {
        let sections = record
            .sections
            .0
            .into_iter()
            .map(|section| TakeSection {
                name: section.name,
                questions: section
                    .questions
                    .into_iter()
                    .map(|question| TakeQuestion {
                        id: question.id,
                        options: label_options(&question.options),
                        question: question.question,
                    })
                    .collect(),
            })
            .collect();

        Self {
            id: record.id,
            title: record.title,
            grade: record.grade,
            subject: record.subject,
            total_questions: record.total_questions,
            sections,
        }
    }
}

fn label_options(options: &[String]) -> Vec<LabeledOption> {
    options
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let label = answer_key::to_letter(index + 1, LetterStyle::Lower);
            LabeledOption { display: format!("{label}) {text}"), label, text: text.clone() }
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub(crate) struct EditorOption {
    pub(crate) label: String,
    pub(crate) text: String,
    pub(crate) display: String,
    pub(crate) correct: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditorQuestion {
    pub(crate) id: i64,
    pub(crate) question: String,
    pub(crate) answer: String,
    pub(crate) resolved_via: ResolvedVia,
    pub(crate) options: Vec<EditorOption>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditorSection {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) question_count: usize,
    pub(crate) questions: Vec<EditorQuestion>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditorView {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) grade: i32,
    pub(crate) subject: String,
    pub(crate) total_questions: i32,
    pub(crate) question_count: usize,
    pub(crate) warnings: Vec<String>,
    pub(crate) sections: Vec<EditorSection>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl EditorView {
    pub(crate) fn from_db(record: Assessment) -> Self {
        let question_count = count_questions(&record.sections.0);
        let warnings =
            total_questions_drift(record.total_questions, &record.sections.0).into_iter().collect();

        let sections = record
            .sections
            .0
            .iter()
            .enumerate()
            .map(|(index, section)| EditorSection {
                index,
                name: section.name.clone(),
                question_count: section.question_count(),
                questions: section.questions.iter().map(editor_question).collect(),
            })
            .collect();

        Self {
            id: record.id,
            title: record.title,
            grade: record.grade,
            subject: record.subject,
            total_questions: record.total_questions,
            question_count,
            warnings,
            sections,
            created_at: format_offset(record.created_at),
            updated_at: format_offset(record.updated_at),
        }
    }

    pub(crate) fn unresolved_count(&self) -> usize {
        self.sections
            .iter()
            .flat_map(|section| &section.questions)
            .filter(|question| question.resolved_via == ResolvedVia::Unresolved)
            .count()
    }
}

fn editor_question(question: &Question) -> EditorQuestion {
    let resolved = answer_key::resolve_question(question, LetterStyle::Upper);
    let options = question
        .options
        .iter()
        .enumerate()
        .map(|(index, text)| {
            let label = answer_key::to_letter(index + 1, LetterStyle::Upper);
            EditorOption {
                display: format!("{label}. {text}"),
                label,
                text: text.clone(),
                correct: resolved.index == Some(index),
            }
        })
        .collect();

    EditorQuestion {
        id: question.id,
        question: question.question.clone(),
        answer: question.answer.clone(),
        resolved_via: resolved.via,
        options,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerLine {
    pub(crate) question_id: i64,
    pub(crate) letter: String,
    pub(crate) text: String,
    pub(crate) display: String,
    pub(crate) resolved: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerSection {
    pub(crate) name: String,
    pub(crate) answers: Vec<AnswerLine>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerReview {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) grade: i32,
    pub(crate) subject: String,
    pub(crate) unresolved_count: usize,
    pub(crate) sections: Vec<AnswerSection>,
}

impl AnswerReview {
    pub(crate) fn from_db(record: Assessment) -> Self {
        let sections: Vec<AnswerSection> = record
            .sections
            .0
            .iter()
            .map(|section| AnswerSection {
                name: section.name.clone(),
                answers: section
                    .questions
                    .iter()
                    .map(|question| {
                        let resolved = answer_key::resolve_question(question, LetterStyle::Lower);
                        AnswerLine {
                            question_id: question.id,
                            display: resolved.display(),
                            resolved: resolved.is_resolved(),
                            letter: resolved.letter,
                            text: resolved.text,
                        }
                    })
                    .collect(),
            })
            .collect();

        let unresolved_count = sections
            .iter()
            .flat_map(|section| &section.answers)
            .filter(|line| !line.resolved)
            .count();

        Self {
            id: record.id,
            title: record.title,
            grade: record.grade,
            subject: record.subject,
            unresolved_count,
            sections,
        }
    }
}
