//! Leitner-box spaced repetition.
//!
//! Box 1 holds new or missed words and is reviewed first; box 5 holds learned
//! words. A correct answer moves a word up one box, a mistake sends it back to
//! box 1.

use std::collections::BTreeMap;

use crate::config::QuizConfig;
use crate::question::{Question, QuestionId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressEntry {
    #[cfg_attr(feature = "serde", serde(rename = "box"))]
    pub leitner_box: u8,
    #[cfg_attr(feature = "serde", serde(rename = "lastReviewed", default))]
    pub last_reviewed_ms: u64,
}

/// Per-question box assignments. Unknown questions sit in box 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct LeitnerProgress {
    entries: BTreeMap<QuestionId, ProgressEntry>,
}

impl LeitnerProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn box_for(&self, id: &QuestionId) -> u8 {
        self.entries
            .get(id)
            .map(|e| e.leitner_box)
            .filter(|&b| b >= QuizConfig::MIN_LEITNER_BOX)
            .unwrap_or(QuizConfig::MIN_LEITNER_BOX)
    }

    pub fn entry(&self, id: &QuestionId) -> Option<&ProgressEntry> {
        self.entries.get(id)
    }

    /// Promotes or demotes `id` and returns its new box.
    pub fn record(&mut self, id: &QuestionId, correct: bool, now_ms: u64) -> u8 {
        let next = if correct {
            (self.box_for(id) + 1).min(QuizConfig::MAX_LEITNER_BOX)
        } else {
            QuizConfig::MIN_LEITNER_BOX
        };
        self.set_box(id, next, now_ms);
        next
    }

    /// Places `id` in `leitner_box`, clamped to the valid range.
    pub fn set_box(&mut self, id: &QuestionId, leitner_box: u8, now_ms: u64) {
        let leitner_box =
            leitner_box.clamp(QuizConfig::MIN_LEITNER_BOX, QuizConfig::MAX_LEITNER_BOX);
        self.entries.insert(
            id.clone(),
            ProgressEntry {
                leitner_box,
                last_reviewed_ms: now_ms,
            },
        );
    }

    /// Stable sort, lowest box first.
    pub fn prioritize(&self, questions: &[Question]) -> Vec<Question> {
        let mut sorted = questions.to_vec();
        sorted.sort_by_key(|q| self.box_for(&q.id));
        sorted
    }

    /// Rounded mean box over `questions`, or 0 when empty.
    pub fn mastery(&self, questions: &[&Question]) -> u8 {
        if questions.is_empty() {
            return 0;
        }
        let total: u32 = questions.iter().map(|q| u32::from(self.box_for(&q.id))).sum();
        (f64::from(total) / questions.len() as f64).round() as u8
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}
