use serde::{Deserialize, Serialize};

/// One multiple-choice item. `id` orders questions inside a section and is
/// not unique across sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Question {
    pub(crate) id: i64,
    pub(crate) question: String,
    pub(crate) options: Vec<String>,
    pub(crate) answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Section {
    pub(crate) name: String,
    pub(crate) questions: Vec<Question>,
}

impl Section {
    pub(crate) fn question_count(&self) -> usize {
        self.questions.len()
    }
}

pub(crate) fn count_questions(sections: &[Section]) -> usize {
    sections.iter().map(Section::question_count).sum()
}
