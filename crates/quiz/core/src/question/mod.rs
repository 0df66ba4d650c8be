//! Question records consumed read-only by the session engine.
//!
//! The raw content format allows options as either an array or a keyed map and
//! marks fill-in-the-blank questions by the presence of formatted text. Loaders
//! resolve that shape once into [`QuestionKind`]; nothing downstream inspects
//! optional fields to guess what kind of question it holds.

mod bank;

pub use bank::{DifficultyFilter, ParseDifficultyError, QuestionBank, ThemeFilter};

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ErrorSeverity, QuizError};

/// Minimum run of underscores recognised as a blank in cloze text.
pub const BLANK_MARKER: &str = "____";

/// Unique identifier of a question.
///
/// Source data uses both numeric ids and string ids (`cloze_12`), so ids are
/// kept as their string form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QuestionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for QuestionId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for QuestionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(u64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => QuestionId::from(n),
            RawId::Text(s) => QuestionId(s),
        })
    }
}

/// Answer options as they appear in the source data.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AnswerOptions {
    List(Vec<String>),
    /// Keyed options (`{"1": "happy", "2": "sad"}`), presented in key order.
    Keyed(BTreeMap<String, String>),
}

impl AnswerOptions {
    /// Returns option texts in presentation order.
    ///
    /// Numeric keys are ordered numerically so `"10"` follows `"9"`.
    pub fn values(&self) -> Vec<&str> {
        match self {
            AnswerOptions::List(items) => items.iter().map(String::as_str).collect(),
            AnswerOptions::Keyed(map) => {
                let mut entries: Vec<(&String, &String)> = map.iter().collect();
                entries.sort_by(|(a, _), (b, _)| match (a.parse::<u32>(), b.parse::<u32>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    _ => a.cmp(b),
                });
                entries.into_iter().map(|(_, v)| v.as_str()).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            AnswerOptions::List(items) => items.len(),
            AnswerOptions::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, text: &str) -> bool {
        self.values().contains(&text)
    }
}

/// The presentation variant of a question.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum QuestionKind {
    /// Standard multiple-choice question.
    MultipleChoice { options: AnswerOptions },
    /// Fill-in-the-blank question over formatted text.
    Cloze {
        formatted_text: String,
        word_bank: Vec<String>,
        /// Question this blank was generated from, if any.
        #[cfg_attr(feature = "serde", serde(default))]
        target: Option<QuestionId>,
    },
}

impl QuestionKind {
    pub const fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "MCQ",
            QuestionKind::Cloze { .. } => "ClozePassage",
        }
    }
}

/// Immutable question record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Question {
    pub id: QuestionId,
    pub theme: Option<String>,
    pub subunit: Option<String>,
    /// Nominally 1–10. Absent difficulty counts as 0 when filtering by range.
    pub difficulty: Option<u8>,
    pub prompt: String,
    /// Canonical answer; submissions are compared to it verbatim.
    pub answer: String,
    pub example: Option<String>,
    pub definition: Option<String>,
    pub kind: QuestionKind,
}

impl Question {
    /// Creates a multiple-choice question with no theme or difficulty.
    pub fn multiple_choice(
        id: impl Into<QuestionId>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
        options: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            theme: None,
            subunit: None,
            difficulty: None,
            prompt: prompt.into(),
            answer: answer.into(),
            example: None,
            definition: None,
            kind: QuestionKind::MultipleChoice {
                options: AnswerOptions::List(options),
            },
        }
    }

    /// Creates a cloze question whose prompt is its formatted text.
    pub fn cloze(
        id: impl Into<QuestionId>,
        formatted_text: impl Into<String>,
        answer: impl Into<String>,
        word_bank: Vec<String>,
    ) -> Self {
        let formatted_text = formatted_text.into();
        Self {
            id: id.into(),
            theme: None,
            subunit: None,
            difficulty: None,
            prompt: formatted_text.clone(),
            answer: answer.into(),
            example: None,
            definition: None,
            kind: QuestionKind::Cloze {
                formatted_text,
                word_bank,
                target: None,
            },
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    #[must_use]
    pub fn with_subunit(mut self, subunit: impl Into<String>) -> Self {
        self.subunit = Some(subunit.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = Some(definition.into());
        self
    }

    /// Difficulty used for range filtering.
    pub fn difficulty_or_zero(&self) -> u8 {
        self.difficulty.unwrap_or(0)
    }

    /// Choices offered to the player, in presentation order.
    pub fn choices(&self) -> Vec<&str> {
        match &self.kind {
            QuestionKind::MultipleChoice { options } => options.values(),
            QuestionKind::Cloze { word_bank, .. } => word_bank.iter().map(String::as_str).collect(),
        }
    }

    /// Id whose spaced-repetition progress this question feeds.
    ///
    /// Generated cloze questions report the question they were built from.
    pub fn progress_id(&self) -> &QuestionId {
        match &self.kind {
            QuestionKind::Cloze {
                target: Some(target),
                ..
            } => target,
            _ => &self.id,
        }
    }

    pub fn is_cloze(&self) -> bool {
        matches!(self.kind, QuestionKind::Cloze { .. })
    }

    /// Splits cloze text around its blanks. Non-cloze questions yield the prompt.
    pub fn segments(&self) -> Vec<&str> {
        match &self.kind {
            QuestionKind::Cloze { formatted_text, .. } => split_blanks(formatted_text),
            QuestionKind::MultipleChoice { .. } => vec![self.prompt.as_str()],
        }
    }

    /// Checks the structural requirements the engine relies on.
    pub fn validate(&self) -> Result<(), QuestionError> {
        if self.answer.is_empty() {
            return Err(QuestionError::EmptyAnswer {
                id: self.id.clone(),
            });
        }

        let count = self.choices().len();
        if count < 2 {
            return Err(QuestionError::TooFewOptions {
                id: self.id.clone(),
                count,
            });
        }

        if let QuestionKind::Cloze { formatted_text, .. } = &self.kind
            && !formatted_text.contains(BLANK_MARKER)
        {
            return Err(QuestionError::MissingBlank {
                id: self.id.clone(),
            });
        }

        Ok(())
    }
}

/// Splits text around runs of at least four underscores.
///
/// `"I am ____ today"` yields `["I am ", " today"]`.
pub fn split_blanks(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut segment_start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'_' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'_' {
                i += 1;
            }
            if i - run_start >= BLANK_MARKER.len() {
                segments.push(&text[segment_start..run_start]);
                segment_start = i;
            }
        } else {
            i += 1;
        }
    }

    segments.push(&text[segment_start..]);
    segments
}

/// Structural problems found while validating a question.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum QuestionError {
    #[error("question {id} has an empty answer")]
    EmptyAnswer { id: QuestionId },

    #[error("question {id} offers {count} option(s), at least 2 are required")]
    TooFewOptions { id: QuestionId, count: usize },

    #[error("cloze question {id} has no blank marker in its text")]
    MissingBlank { id: QuestionId },
}

impl QuizError for QuestionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyAnswer { .. } => "QUESTION_EMPTY_ANSWER",
            Self::TooFewOptions { .. } => "QUESTION_TOO_FEW_OPTIONS",
            Self::MissingBlank { .. } => "QUESTION_MISSING_BLANK",
        }
    }
}
