use serde::Serialize;

use crate::db::types::Question;

pub(crate) const UNKNOWN_LETTER: &str = "Unknown";

const LOWER_LETTERS: [&str; 5] = ["a", "b", "c", "d", "e"];

/// Option label convention. Review and take views use `Lower`, the editor's
/// option listing uses `Upper`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LetterStyle {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ResolvedVia {
    Text,
    Index,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedAnswer {
    pub(crate) letter: String,
    pub(crate) text: String,
    /// Zero-based position of the correct option.
    pub(crate) index: Option<usize>,
    pub(crate) via: ResolvedVia,
}

impl ResolvedAnswer {
    pub(crate) fn is_resolved(&self) -> bool {
        self.via != ResolvedVia::Unresolved
    }

    /// Review line, e.g. `b - 4`.
    pub(crate) fn display(&self) -> String {
        format!("{} - {}", self.letter, self.text)
    }
}

/// Maps a 1-based option position to its label. Positions outside the
/// style's alphabet come back as the decimal number.
pub(crate) fn to_letter(position: usize, style: LetterStyle) -> String {
    match style {
        LetterStyle::Lower => position
            .checked_sub(1)
            .and_then(|index| LOWER_LETTERS.get(index))
            .map(|letter| letter.to_string())
            .unwrap_or_else(|| position.to_string()),
        LetterStyle::Upper => match position {
            1..=26 => char::from(b'A' + (position - 1) as u8).to_string(),
            _ => position.to_string(),
        },
    }
}

/// Text match takes precedence over the 1-based index encoding.
pub(crate) fn resolve(options: &[String], answer: &str, style: LetterStyle) -> ResolvedAnswer {
    if let Some(index) = options.iter().position(|option| option == answer) {
        return ResolvedAnswer {
            letter: to_letter(index + 1, style),
            text: answer.to_string(),
            index: Some(index),
            via: ResolvedVia::Text,
        };
    }

    if let Some(position) = parse_position(answer).filter(|n| (1..=options.len()).contains(n)) {
        return ResolvedAnswer {
            letter: to_letter(position, style),
            text: options[position - 1].clone(),
            index: Some(position - 1),
            via: ResolvedVia::Index,
        };
    }

    ResolvedAnswer {
        letter: UNKNOWN_LETTER.to_string(),
        text: answer.to_string(),
        index: None,
        via: ResolvedVia::Unresolved,
    }
}

pub(crate) fn resolve_question(question: &Question, style: LetterStyle) -> ResolvedAnswer {
    resolve(&question.options, &question.answer, style)
}

/// Strict 1-based position reading of an answer; range is not checked.
pub(crate) fn parse_position(answer: &str) -> Option<usize> {
    answer.trim().parse::<usize>().ok()
}
