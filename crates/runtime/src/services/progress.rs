//! Persisted Leitner boxes.

use std::sync::Arc;

use quiz_core::{LeitnerProgress, Question, QuestionId};

use crate::repository::{Store, load_or_default, save_json};

pub const PROGRESS_KEY: &str = "vocab_quest_progress";

/// [`LeitnerProgress`] saved after every change.
pub struct ProgressTracker {
    progress: LeitnerProgress,
    store: Arc<dyn Store>,
}

impl ProgressTracker {
    pub fn load(store: Arc<dyn Store>) -> Self {
        let progress: LeitnerProgress = load_or_default(store.as_ref(), PROGRESS_KEY);
        tracing::debug!(tracked = progress.len(), "Progress loaded");
        Self { progress, store }
    }

    pub fn progress(&self) -> &LeitnerProgress {
        &self.progress
    }

    pub fn box_for(&self, id: &QuestionId) -> u8 {
        self.progress.box_for(id)
    }

    pub fn record(&mut self, id: &QuestionId, correct: bool, now_ms: u64) -> u8 {
        let next = self.progress.record(id, correct, now_ms);
        self.save();
        next
    }

    pub fn set_box(&mut self, id: &QuestionId, leitner_box: u8, now_ms: u64) {
        self.progress.set_box(id, leitner_box, now_ms);
        self.save();
    }

    pub fn prioritize(&self, questions: &[Question]) -> Vec<Question> {
        self.progress.prioritize(questions)
    }

    pub fn mastery(&self, questions: &[&Question]) -> u8 {
        self.progress.mastery(questions)
    }

    pub fn reset(&mut self) {
        self.progress.reset();
        self.save();
    }

    fn save(&self) {
        if let Err(err) = save_json(self.store.as_ref(), PROGRESS_KEY, &self.progress) {
            tracing::warn!(error = %err, "Failed to save progress");
        }
    }
}
