//! Question bank loader.
//!
//! Source records come in two shapes: multiple-choice questions with an
//! `options` array or keyed map, and cloze questions that also carry
//! `formatted_text` (and usually a `word_bank`). [`RawQuestion::resolve`]
//! settles the shape once so the rest of the game sees a [`QuestionKind`].

use std::path::Path;

use quiz_core::{AnswerOptions, Question, QuestionId, QuestionKind};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// A question record as written in the JSON source.
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestion {
    #[serde(alias = "question_number")]
    pub id: QuestionId,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub subunit: Option<String>,
    #[serde(default)]
    pub difficulty: Option<u8>,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub options: Option<AnswerOptions>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub formatted_text: Option<String>,
    #[serde(default)]
    pub word_bank: Option<Vec<String>>,
}

impl RawQuestion {
    /// Converts the record into a validated [`Question`].
    pub fn resolve(self) -> LoadResult<Question> {
        let kind = match self.formatted_text {
            Some(formatted_text) => {
                let word_bank = match (self.word_bank, self.options) {
                    (Some(bank), _) => bank,
                    (None, Some(options)) => {
                        options.values().into_iter().map(str::to_owned).collect()
                    }
                    (None, None) => Vec::new(),
                };
                QuestionKind::Cloze {
                    formatted_text,
                    word_bank,
                    target: None,
                }
            }
            None => QuestionKind::MultipleChoice {
                options: self
                    .options
                    .unwrap_or_else(|| AnswerOptions::List(Vec::new())),
            },
        };

        let question = Question {
            id: self.id,
            theme: self.theme,
            subunit: self.subunit,
            difficulty: self.difficulty,
            prompt: self.question,
            answer: self.answer,
            example: self.example,
            definition: self.definition,
            kind,
        };

        question
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid question: {}", e))?;
        Ok(question)
    }
}

/// Loader for the question bank from JSON files.
pub struct QuestionLoader;

impl QuestionLoader {
    /// Load questions from a JSON file.
    pub fn load(path: &Path) -> LoadResult<Vec<Question>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse a JSON array of question records.
    ///
    /// Records that fail validation are skipped with a warning; a malformed
    /// document is an error.
    pub fn parse(content: &str) -> LoadResult<Vec<Question>> {
        let raw: Vec<RawQuestion> = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse questions JSON: {}", e))?;

        let total = raw.len();
        let questions: Vec<Question> = raw
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                match record.resolve() {
                    Ok(question) => Some(question),
                    Err(e) => {
                        tracing::warn!(%id, "Skipping question: {}", e);
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(loaded = questions.len(), total, "Loaded question bank");
        Ok(questions)
    }
}
