//! Quiz engine façade.
//!
//! [`QuizEngine`] owns the question bank and the active session, and keeps
//! spaced-repetition progress and the answer log up to date as answers come
//! in. Front-ends drive it with `start_new_game` / `answer` and read
//! `state()` or subscribe to [`Topic::Session`](crate::Topic::Session).

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use quiz_core::minigames::WordLadder;
use quiz_core::{
    AnswerOutcome, ClozeGenerator, Clock, DifficultyFilter, EventCalendar, HistoryEntry, Question,
    QuestionBank, QuestionId, QuizConfig, ScoringMode, SeasonalEvent, SessionManager,
    SessionState, SystemClock, ThemeFilter,
};

use crate::events::{EventBus, SessionEvent};
use crate::repository::Store;
use crate::services::{Analytics, ProgressTracker};

/// Analytics label of generated fill-in-the-blank questions.
const CLOZE_LABEL: &str = "ClozePassage";
/// Below this cloze accuracy, reviewed words are turned into cloze questions more often.
const CLOZE_STRUGGLE_THRESHOLD: f64 = 0.7;
const CLOZE_PROBABILITY_STRUGGLING: f64 = 0.9;
const CLOZE_PROBABILITY_DEFAULT: f64 = 0.4;
/// Only words already reviewed at least once are eligible for cloze conversion.
const CLOZE_MIN_BOX: u8 = 2;

pub struct QuizEngine {
    bank: QuestionBank,
    config: QuizConfig,
    session: SessionManager,
    progress: ProgressTracker,
    analytics: Analytics,
    cloze: ClozeGenerator,
    calendar: EventCalendar,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    events: EventBus,
    games_started: u64,
}

impl QuizEngine {
    pub fn new(
        bank: QuestionBank,
        config: QuizConfig,
        store: Arc<dyn Store>,
        events: EventBus,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            session: SessionManager::new(config.clone(), clock.clone()),
            progress: ProgressTracker::load(store.clone()),
            analytics: Analytics::load(store),
            cloze: ClozeGenerator::default(),
            calendar: EventCalendar::default(),
            rng: StdRng::from_entropy(),
            bank,
            config,
            clock,
            events,
            games_started: 0,
        }
    }

    /// Replaces the time source. Resets the session.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        let mode = self.session.scoring_mode();
        self.session = SessionManager::new(self.config.clone(), clock.clone());
        self.session.set_scoring_mode(mode);
        self.clock = clock;
        self
    }

    /// Makes shuffling and cloze selection reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Seasonal events deciding theme visibility and event tokens.
    pub fn with_calendar(mut self, calendar: EventCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn set_scoring_mode(&mut self, mode: ScoringMode) {
        self.session.set_scoring_mode(mode);
    }

    pub fn scoring_mode(&self) -> ScoringMode {
        self.session.scoring_mode()
    }

    /// Starts a game of up to `session_length` questions, least-known first.
    ///
    /// Words past box 1 may be swapped for a cloze question built from their
    /// example sentence, more often while cloze accuracy is low.
    pub fn start_new_game(&mut self, theme: &ThemeFilter, difficulty: &DifficultyFilter) {
        let filtered = self.bank.filter(theme, difficulty);
        let mut selected = self.progress.prioritize(&filtered);
        selected.truncate(self.config.session_length);

        let cloze_performance = self.analytics.type_performance(CLOZE_LABEL);
        let cloze_probability = if cloze_performance < CLOZE_STRUGGLE_THRESHOLD {
            CLOZE_PROBABILITY_STRUGGLING
        } else {
            CLOZE_PROBABILITY_DEFAULT
        };

        let mut questions = Vec::with_capacity(selected.len());
        for question in selected {
            let leitner_box = self.progress.box_for(&question.id);
            if leitner_box >= CLOZE_MIN_BOX
                && self.rng.gen_bool(cloze_probability)
                && let Some(cloze) = self
                    .cloze
                    .generate(&question, self.bank.all(), &mut self.rng)
            {
                questions.push(cloze);
                continue;
            }
            questions.push(question);
        }

        tracing::info!(
            ?theme,
            ?difficulty,
            pool = filtered.len(),
            questions = questions.len(),
            cloze_performance,
            "Starting new game"
        );
        self.begin(questions);
    }

    /// Starts a game over exactly `questions`, typically the ones missed last time.
    pub fn start_retry_game(&mut self, questions: Vec<Question>) {
        tracing::info!(questions = questions.len(), "Starting retry game");
        self.begin(questions);
    }

    fn begin(&mut self, questions: Vec<Question>) {
        let question_count = questions.len();
        self.games_started += 1;
        self.session.start(questions);
        self.events.publish(SessionEvent::Started { question_count });
    }

    /// Number of games started so far; identifies the current game.
    pub fn games_started(&self) -> u64 {
        self.games_started
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.session.current_question()
    }

    /// Judges `value` against the current question.
    ///
    /// Once the session is finished this returns a neutral outcome and records
    /// nothing.
    pub fn answer(&mut self, value: &str) -> AnswerOutcome {
        let Some(question) = self.session.current_question().cloned() else {
            return AnswerOutcome::NEUTRAL;
        };

        let outcome = self.session.submit_answer(value);
        let time_taken_ms = self
            .session
            .history()
            .last()
            .map_or(0, |entry| entry.time_taken_ms);

        self.analytics.log_answer(
            &question.id,
            time_taken_ms,
            outcome.is_correct,
            question.kind.label(),
        );
        self.progress.record(
            question.progress_id(),
            outcome.is_correct,
            self.clock.now_ms(),
        );

        let state = self.session.state();
        tracing::debug!(
            id = %question.id,
            correct = outcome.is_correct,
            points = outcome.points,
            time_taken_ms,
            "Answer recorded"
        );
        self.events.publish(SessionEvent::Answered {
            question_id: question.id,
            outcome,
            state,
        });

        if state.is_finished {
            tracing::info!(score = state.score, xp = state.xp, "Game finished");
            self.events.publish(SessionEvent::Finished { state });
        }

        outcome
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.session.history()
    }

    /// Questions answered incorrectly in the current session.
    pub fn missed_questions(&self) -> Vec<Question> {
        self.session
            .history()
            .iter()
            .filter(|h| !h.is_correct)
            .map(|h| h.question.clone())
            .collect()
    }

    /// Theme picker entries. Seasonal themes only appear while their event runs.
    pub fn themes(&self) -> Vec<String> {
        let now = self.clock.now_ms();
        self.bank
            .themes()
            .into_iter()
            .filter(|theme| self.calendar.is_theme_available(theme, now))
            .collect()
    }

    pub fn calendar(&self) -> &EventCalendar {
        &self.calendar
    }

    pub fn active_event(&self) -> Option<&SeasonalEvent> {
        self.calendar.active(self.clock.now_ms())
    }

    /// Event tokens the current game earns with `score`. The game's theme is
    /// the theme of its first question.
    pub fn event_tokens(&self, score: u32) -> u64 {
        let theme = self
            .session
            .questions()
            .first()
            .and_then(|q| q.theme.as_deref());
        self.calendar.event_tokens(score, theme, self.clock.now_ms())
    }

    /// Rounded mean Leitner box of a theme; 0 for `All` or an unknown theme.
    pub fn theme_mastery(&self, theme: &str) -> u8 {
        if theme == "All" {
            return 0;
        }
        let questions: Vec<&Question> = self.bank.by_theme(theme).collect();
        self.progress.mastery(&questions)
    }

    /// Up to `count` questions from the whole bank, least-known boxes first,
    /// shuffled within a box and unique by answer.
    pub fn reinforcement_questions(&mut self, count: usize) -> Vec<Question> {
        let mut by_box: BTreeMap<u8, Vec<&Question>> = BTreeMap::new();
        for question in self.bank.all() {
            by_box
                .entry(self.progress.box_for(&question.id))
                .or_default()
                .push(question);
        }

        let mut selected: Vec<Question> = Vec::with_capacity(count);
        let mut seen: HashSet<&str> = HashSet::new();

        for questions in by_box.values_mut() {
            if selected.len() >= count {
                break;
            }
            questions.shuffle(&mut self.rng);
            for question in questions.iter() {
                if selected.len() >= count {
                    break;
                }
                if seen.insert(question.answer.as_str()) {
                    selected.push((*question).clone());
                }
            }
        }

        if selected.len() < count {
            let mut remaining: Vec<&Question> = self
                .bank
                .all()
                .iter()
                .filter(|q| !seen.contains(q.answer.as_str()))
                .collect();
            remaining.shuffle(&mut self.rng);
            for question in remaining {
                if selected.len() >= count {
                    break;
                }
                if seen.insert(question.answer.as_str()) {
                    selected.push(question.clone());
                }
            }
        }

        selected
    }

    pub fn reinforcement_words(&mut self, count: usize) -> Vec<String> {
        self.reinforcement_questions(count)
            .into_iter()
            .map(|q| q.answer)
            .collect()
    }

    /// A ladder over answers of `word_len` letters, or `None` when the bank
    /// has too few such words or no long enough chain exists.
    pub fn word_ladder_challenge(&mut self, word_len: usize, min_steps: usize) -> Option<WordLadder> {
        let pool = self.bank.word_pool(word_len);
        let ladder = WordLadder::challenge(&pool, min_steps, &mut self.rng);
        if ladder.is_none() {
            tracing::debug!(word_len, min_steps, pool = pool.len(), "No word ladder available");
        }
        ladder
    }

    pub fn is_valid_word(&self, word: &str) -> bool {
        self.bank.is_valid_word(word)
    }

    /// Words still in box 1.
    pub fn revision_list(&self) -> Vec<&Question> {
        self.bank
            .all()
            .iter()
            .filter(|q| self.progress.box_for(&q.id) == QuizConfig::MIN_LEITNER_BOX)
            .collect()
    }

    /// A correct revision drill jumps the word to box 4; a miss demotes it.
    pub fn process_revision_answer(&mut self, id: &QuestionId, correct: bool) -> bool {
        let now = self.clock.now_ms();
        if correct {
            self.progress
                .set_box(id, QuizConfig::REVISION_PROMOTION_BOX, now);
        } else {
            self.progress.record(id, false, now);
        }
        correct
    }
}

impl std::fmt::Debug for QuizEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizEngine")
            .field("questions", &self.bank.len())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use quiz_core::minigames::is_adjacent;
    use quiz_core::{ManualClock, QuestionKind};

    use super::*;
    use crate::events::{Event, Topic};
    use crate::repository::InMemoryStore;

    fn engine_with(store: Arc<dyn Store>, events: EventBus) -> QuizEngine {
        let questions = quiz_content::builtin::questions().unwrap();
        QuizEngine::new(questions.into(), QuizConfig::default(), store, events)
            .with_clock(Arc::new(ManualClock::new(0)))
            .with_seed(42)
    }

    fn engine() -> QuizEngine {
        engine_with(Arc::new(InMemoryStore::new()), EventBus::new())
    }

    /// 2025-12-15T00:00:00Z and 2026-04-15T00:00:00Z.
    const MID_WINTER_MS: u64 = 1_765_756_800_000;
    const MID_SPRING_MS: u64 = 1_776_211_200_000;

    fn seasonal_engine(clock: ManualClock) -> QuizEngine {
        let options = |a: &str, b: &str| vec![a.to_string(), b.to_string()];
        let questions = vec![
            Question::multiple_choice(1u64, "Slide down snow", "sledge", options("sledge", "boat"))
                .with_theme("Winter Sports"),
            Question::multiple_choice(2u64, "Glide on ice", "skate", options("skate", "swim"))
                .with_theme("Winter Sports"),
            Question::multiple_choice(3u64, "A spring flower", "tulip", options("tulip", "rock"))
                .with_theme("Spring Botany"),
            Question::multiple_choice(4u64, "Falls from clouds", "rain", options("rain", "sand"))
                .with_theme("Weather"),
        ];
        QuizEngine::new(
            questions.into(),
            QuizConfig::default(),
            Arc::new(InMemoryStore::new()),
            EventBus::new(),
        )
        .with_clock(Arc::new(clock))
        .with_calendar(quiz_content::builtin::events().unwrap())
    }

    fn answer_all_correctly(engine: &mut QuizEngine) {
        while let Some(q) = engine.current_question() {
            let answer = q.answer.clone();
            assert!(engine.answer(&answer).is_correct);
        }
    }

    #[test]
    fn new_game_draws_session_length_questions() {
        let mut engine = engine();
        assert!(engine.state().is_finished);

        engine.start_new_game(&ThemeFilter::All, &DifficultyFilter::All);
        assert_eq!(engine.session.len(), 10);
        assert!(!engine.state().is_finished);
        // Fresh progress: everything is in box 1, so nothing becomes a cloze.
        assert!(engine.session.questions().iter().all(|q| !q.is_cloze()));
    }

    #[test]
    fn answers_promote_words_and_log_analytics() {
        let mut engine = engine();
        engine.start_new_game(&ThemeFilter::All, &DifficultyFilter::All);
        let first = engine.current_question().unwrap().clone();

        assert!(engine.answer(&first.answer).is_correct);
        assert_eq!(engine.progress().box_for(&first.id), 2);
        assert_eq!(engine.analytics().history().len(), 1);
        assert_eq!(engine.analytics().history()[0].kind, "MCQ");

        let second = engine.current_question().unwrap().clone();
        assert!(!engine.answer("definitely wrong").is_correct);
        assert_eq!(engine.progress().box_for(&second.id), 1);
        assert_eq!(engine.missed_questions(), vec![second]);
    }

    #[test]
    fn answers_after_finish_are_neutral() {
        let mut engine = engine();
        engine.start_retry_game(engine.bank().all()[..2].to_vec());
        answer_all_correctly(&mut engine);

        assert!(engine.state().is_finished);
        assert_eq!(engine.answer("anything"), AnswerOutcome::NEUTRAL);
        assert_eq!(engine.analytics().history().len(), 2);
    }

    #[test]
    fn struggling_with_cloze_favours_cloze_questions() {
        let mut engine = engine();
        let now = engine.clock.now_ms();
        let ids: Vec<QuestionId> = engine.bank().all().iter().map(|q| q.id.clone()).collect();
        for id in &ids {
            engine.progress.set_box(id, 2, now);
        }
        engine
            .analytics
            .log_answer(&QuestionId::new("cloze_x"), 1, false, CLOZE_LABEL);

        engine.start_new_game(&ThemeFilter::All, &DifficultyFilter::All);
        let cloze = engine
            .session
            .questions()
            .iter()
            .position(Question::is_cloze)
            .expect("at least one cloze question");

        for _ in 0..cloze {
            engine.answer("skip");
        }
        let question = engine.current_question().unwrap().clone();
        let QuestionKind::Cloze { target, .. } = &question.kind else {
            panic!("expected cloze");
        };
        let target = target.clone().unwrap();

        engine.answer(&question.answer);
        assert_eq!(engine.progress().box_for(&target), 3);
        assert_eq!(engine.analytics().history().last().unwrap().kind, CLOZE_LABEL);
    }

    #[test]
    fn session_events_are_published() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe(Topic::Session);
        let mut engine = engine_with(Arc::new(InMemoryStore::new()), bus);

        engine.start_retry_game(engine.bank().all()[..1].to_vec());
        answer_all_correctly(&mut engine);

        assert_eq!(
            rx.try_recv().unwrap(),
            Event::Session(SessionEvent::Started { question_count: 1 })
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            Event::Session(SessionEvent::Answered { .. })
        ));
        assert!(matches!(
            rx.try_recv().unwrap(),
            Event::Session(SessionEvent::Finished { state }) if state.score == 10
        ));
    }

    #[test]
    fn theme_mastery_tracks_average_box() {
        let mut engine = engine();
        assert_eq!(engine.theme_mastery("All"), 0);
        assert_eq!(engine.theme_mastery("No Such Theme"), 0);

        let theme = engine.themes()[1].clone();
        assert_eq!(engine.theme_mastery(&theme), 1);

        let ids: Vec<QuestionId> = engine.bank().by_theme(&theme).map(|q| q.id.clone()).collect();
        for id in &ids {
            engine.process_revision_answer(id, true);
        }
        assert_eq!(engine.theme_mastery(&theme), 4);
    }

    #[test]
    fn reinforcement_questions_are_unique_and_least_known_first() {
        let mut engine = engine();
        let known = engine.bank().all()[0].clone();
        engine.process_revision_answer(&known.id, true);

        let picked = engine.reinforcement_questions(5);
        assert_eq!(picked.len(), 5);
        let answers: HashSet<&str> = picked.iter().map(|q| q.answer.as_str()).collect();
        assert_eq!(answers.len(), 5);
        assert!(!picked.contains(&known));

        let all = engine.reinforcement_words(1_000);
        let distinct: HashSet<&String> = all.iter().collect();
        assert_eq!(all.len(), distinct.len());
    }

    #[test]
    fn word_ladder_uses_bank_words() {
        let mut engine = engine();
        let ladder = engine.word_ladder_challenge(4, 3).expect("ladder");
        assert!(ladder.steps() >= 3);
        assert!(ladder.path.iter().all(|w| engine.is_valid_word(w)));
        assert!(ladder.path.windows(2).all(|w| is_adjacent(&w[0], &w[1])));

        assert!(engine.word_ladder_challenge(9, 3).is_none());
    }

    #[test]
    fn revision_answers_move_words_between_boxes() {
        let mut engine = engine();
        let total = engine.revision_list().len();
        assert_eq!(total, engine.bank().len());

        let id = engine.bank().all()[0].id.clone();
        assert!(engine.process_revision_answer(&id, true));
        assert_eq!(engine.progress().box_for(&id), 4);
        assert_eq!(engine.revision_list().len(), total - 1);

        assert!(!engine.process_revision_answer(&id, false));
        assert_eq!(engine.progress().box_for(&id), 1);
    }

    #[test]
    fn progress_survives_a_new_engine() {
        let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
        let mut engine = engine_with(store.clone(), EventBus::new());
        let id = engine.bank().all()[3].id.clone();
        engine.process_revision_answer(&id, true);

        let engine = engine_with(store, EventBus::new());
        assert_eq!(engine.progress().box_for(&id), 4);
    }

    #[test]
    fn seasonal_themes_follow_the_calendar() {
        let clock = ManualClock::new(MID_WINTER_MS);
        let engine = seasonal_engine(clock.clone());
        assert_eq!(engine.themes(), vec!["All", "Weather", "Winter Sports"]);
        assert_eq!(engine.active_event().map(|e| e.id.as_str()), Some("winter_2025"));

        clock.set(MID_SPRING_MS);
        assert_eq!(engine.themes(), vec!["All", "Spring Botany", "Weather"]);

        clock.set(0);
        assert_eq!(engine.themes(), vec!["All", "Weather"]);
        assert!(engine.active_event().is_none());
    }

    #[test]
    fn event_tokens_need_the_featured_theme_in_window() {
        let clock = ManualClock::new(MID_WINTER_MS);
        let mut engine = seasonal_engine(clock.clone());

        let winter: Vec<Question> = engine.bank().by_theme("Winter Sports").cloned().collect();
        engine.start_retry_game(winter);
        assert_eq!(engine.event_tokens(20), 30);

        clock.set(MID_SPRING_MS);
        assert_eq!(engine.event_tokens(20), 0);

        clock.set(MID_WINTER_MS);
        let weather: Vec<Question> = engine.bank().by_theme("Weather").cloned().collect();
        engine.start_retry_game(weather);
        assert_eq!(engine.event_tokens(20), 0);
    }
}
