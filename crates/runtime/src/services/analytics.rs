//! Append-only answer log used to adapt question selection.

use std::sync::Arc;

use quiz_core::QuestionId;
use serde::{Deserialize, Serialize};

use crate::repository::{Store, load_or_default, save_json};

pub const ANALYTICS_KEY: &str = "vocab_analytics";

/// Oldest entries are dropped beyond this many.
pub const MAX_ENTRIES: usize = 1000;
pub const DEFAULT_ANSWER_TIME_MS: u64 = 3000;
/// Accuracy assumed for a question type with no answers yet.
pub const DEFAULT_TYPE_PERFORMANCE: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub timestamp: i64,
    pub question_id: QuestionId,
    #[serde(rename = "timeTaken")]
    pub time_taken_ms: u64,
    pub is_correct: bool,
    /// Question type label such as `MCQ` or `ClozePassage`.
    #[serde(rename = "type")]
    pub kind: String,
}

pub struct Analytics {
    history: Vec<AnswerRecord>,
    store: Arc<dyn Store>,
}

impl Analytics {
    pub fn load(store: Arc<dyn Store>) -> Self {
        let history: Vec<AnswerRecord> = load_or_default(store.as_ref(), ANALYTICS_KEY);
        Self { history, store }
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    pub fn log_answer(
        &mut self,
        question_id: &QuestionId,
        time_taken_ms: u64,
        is_correct: bool,
        kind: &str,
    ) {
        self.history.push(AnswerRecord {
            timestamp: chrono::Utc::now().timestamp_millis(),
            question_id: question_id.clone(),
            time_taken_ms,
            is_correct,
            kind: kind.to_owned(),
        });

        if self.history.len() > MAX_ENTRIES {
            let excess = self.history.len() - MAX_ENTRIES;
            self.history.drain(..excess);
        }

        if let Err(err) = save_json(self.store.as_ref(), ANALYTICS_KEY, &self.history) {
            tracing::warn!(error = %err, "Failed to save analytics");
        }
    }

    /// Mean time of correct answers, rounded.
    pub fn average_answer_time_ms(&self) -> u64 {
        let times: Vec<u64> = self
            .history
            .iter()
            .filter(|h| h.is_correct)
            .map(|h| h.time_taken_ms)
            .collect();
        if times.is_empty() {
            return DEFAULT_ANSWER_TIME_MS;
        }
        (times.iter().sum::<u64>() as f64 / times.len() as f64).round() as u64
    }

    /// Accuracy over every logged answer of this type.
    pub fn type_performance(&self, kind: &str) -> f64 {
        let (answered, correct) = self
            .history
            .iter()
            .filter(|h| h.kind == kind)
            .fold((0usize, 0usize), |(n, c), h| (n + 1, c + usize::from(h.is_correct)));
        if answered == 0 {
            return DEFAULT_TYPE_PERFORMANCE;
        }
        correct as f64 / answered as f64
    }

    /// Difficulty multiplier from the last 20 answers: 1.2 above 80%
    /// accuracy, 0.8 below 50%, otherwise 1.0.
    pub fn difficulty_modifier(&self) -> f64 {
        let recent = &self.history[self.history.len().saturating_sub(20)..];
        if recent.is_empty() {
            return 1.0;
        }
        let correct = recent.iter().filter(|h| h.is_correct).count();
        let accuracy = correct as f64 / recent.len() as f64;
        if accuracy > 0.8 {
            1.2
        } else if accuracy < 0.5 {
            0.8
        } else {
            1.0
        }
    }
}
