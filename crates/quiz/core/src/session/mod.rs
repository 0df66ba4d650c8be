//! Quiz session state machine.
//!
//! A session walks an ordered question list exactly once. Each submission is
//! judged against the current question, scored, appended to the history and
//! advances the index; the session finishes when the index reaches the end of
//! the list and stays finished until the next [`SessionManager::start`].

mod clock;

pub use clock::{Clock, ManualClock, SystemClock};

use std::sync::Arc;

use crate::config::QuizConfig;
use crate::question::Question;

/// How correct answers are converted into points.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScoringMode {
    /// Flat points per correct answer.
    #[default]
    Standard,
    /// Faster answers earn up to double points.
    TimeDecay,
}

/// Snapshot of the session counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    pub current_question_index: usize,
    pub score: u32,
    pub streak: u32,
    pub is_finished: bool,
    pub xp: u32,
}

/// One answered question.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry {
    pub question: Question,
    pub submitted: String,
    pub is_correct: bool,
    pub time_taken_ms: u64,
}

/// Result of a single submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub points: u32,
}

impl AnswerOutcome {
    /// Outcome returned for submissions after the session has finished.
    pub const NEUTRAL: Self = Self {
        is_correct: false,
        points: 0,
    };
}

/// Drives a single quiz session.
pub struct SessionManager {
    config: QuizConfig,
    clock: Arc<dyn Clock>,
    questions: Vec<Question>,
    history: Vec<HistoryEntry>,
    state: SessionState,
    scoring_mode: ScoringMode,
    question_started_ms: u64,
}

impl SessionManager {
    pub fn new(config: QuizConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            questions: Vec::new(),
            history: Vec::new(),
            // Nothing to answer until `start`.
            state: SessionState {
                is_finished: true,
                ..SessionState::default()
            },
            scoring_mode: ScoringMode::default(),
            question_started_ms: 0,
        }
    }

    pub fn with_system_clock(config: QuizConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Replaces the question list and resets every counter and the history.
    pub fn start(&mut self, questions: Vec<Question>) {
        self.state = SessionState {
            is_finished: questions.is_empty(),
            ..SessionState::default()
        };
        self.questions = questions;
        self.history.clear();
        self.question_started_ms = self.clock.now_ms();
    }

    /// Applies to answers submitted from now on.
    pub fn set_scoring_mode(&mut self, mode: ScoringMode) {
        self.scoring_mode = mode;
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.scoring_mode
    }

    pub fn current_question(&self) -> Option<&Question> {
        if self.state.is_finished {
            return None;
        }
        self.questions.get(self.state.current_question_index)
    }

    /// Judges `answer` against the current question and advances.
    ///
    /// Matching is exact: no trimming and no case folding.
    pub fn submit_answer(&mut self, answer: &str) -> AnswerOutcome {
        let Some(question) = self.current_question() else {
            return AnswerOutcome::NEUTRAL;
        };

        let is_correct = question.answer == answer;
        let now = self.clock.now_ms();
        let time_taken_ms = now.saturating_sub(self.question_started_ms);

        self.history.push(HistoryEntry {
            question: question.clone(),
            submitted: answer.to_owned(),
            is_correct,
            time_taken_ms,
        });

        let mut points = 0;
        if is_correct {
            points = self.points_for(time_taken_ms);
            self.state.score += points;
            self.state.streak += 1;
            self.state.xp += points + self.state.streak * QuizConfig::STREAK_XP_FACTOR;
        } else {
            self.state.streak = 0;
        }

        self.state.current_question_index += 1;
        self.question_started_ms = now;
        if self.state.current_question_index >= self.questions.len() {
            self.state.is_finished = true;
        }

        AnswerOutcome { is_correct, points }
    }

    fn points_for(&self, time_taken_ms: u64) -> u32 {
        let base = QuizConfig::POINTS_PER_CORRECT;
        match self.scoring_mode {
            ScoringMode::Standard => base,
            ScoringMode::TimeDecay => {
                let budget = self.config.time_budget_ms;
                if budget == 0 {
                    return base;
                }
                let effective = time_taken_ms.min(budget);
                let bonus = ((budget - effective) as f64 / budget as f64).max(0.0);
                (base as f64 * (1.0 + bonus)).round() as u32
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("questions", &self.questions.len())
            .field("state", &self.state)
            .field("scoring_mode", &self.scoring_mode)
            .finish()
    }
}
