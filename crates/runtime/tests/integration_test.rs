//! End-to-end tests driving a `QuizApp` through its public API.

use std::sync::Arc;

use quiz_content::ContentBundle;
use quiz_core::{
    ArenaResult, DifficultyFilter, ManualClock, MinigameKind, Question, ScoringMode, ThemeFilter,
};
use quiz_runtime::{
    AchievementEvent, EconomyEvent, Event, FileStore, InMemoryStore, QuizApp, RuntimeConfig,
    RuntimeError, SessionEvent, Slot, Store, Topic,
};

fn config_in(dir: &std::path::Path) -> RuntimeConfig {
    RuntimeConfig {
        data_dir: dir.to_path_buf(),
        ..RuntimeConfig::default()
    }
}

fn memory_app() -> (QuizApp, ManualClock) {
    let clock = ManualClock::new(0);
    let app = QuizApp::builder(RuntimeConfig::default())
        .store(Arc::new(InMemoryStore::new()))
        .clock(Arc::new(clock.clone()))
        .seed(7)
        .build()
        .unwrap();
    (app, clock)
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn full_quiz_pays_out_once() {
    let (mut app, _) = memory_app();
    let mut session_rx = app.subscribe(Topic::Session);
    let mut achievement_rx = app.subscribe(Topic::Achievements);

    app.engine_mut()
        .start_new_game(&ThemeFilter::All, &DifficultyFilter::All);
    assert!(app.finish_quiz().is_none());

    while let Some(question) = app.engine().current_question() {
        let answer = question.answer.clone();
        app.engine_mut().answer(&answer);
    }

    let state = app.engine().state();
    assert!(state.is_finished);
    assert_eq!(state.score, 100);
    assert_eq!(state.current_question_index, 10);

    let settlement = app.finish_quiz().unwrap();
    assert_eq!(settlement.coins, 100);
    assert_eq!(settlement.xp, u64::from(state.xp));
    assert!(settlement.unlocked.iter().any(|a| a.id == "first_win"));
    assert!(settlement.unlocked.iter().any(|a| a.id == "perfect_score"));
    assert!(app.finish_quiz().is_none());

    let session_events = drain(&mut session_rx);
    assert_eq!(
        session_events.first(),
        Some(&Event::Session(SessionEvent::Started { question_count: 10 }))
    );
    assert!(matches!(
        session_events.last(),
        Some(Event::Session(SessionEvent::Finished { .. }))
    ));
    assert_eq!(session_events.len(), 12);

    let unlocked = drain(&mut achievement_rx);
    assert!(unlocked.contains(&Event::Achievement(AchievementEvent::Unlocked {
        id: "first_win".to_string(),
        title: "First Victory".to_string(),
    })));
}

#[test]
fn correct_correct_incorrect_through_engine() {
    let (mut app, _) = memory_app();
    let questions = app.engine().bank().all()[..3].to_vec();
    app.engine_mut().start_retry_game(questions.clone());

    assert!(app.engine_mut().answer(&questions[0].answer).is_correct);
    assert!(app.engine_mut().answer(&questions[1].answer).is_correct);
    assert!(!app.engine_mut().answer("not it").is_correct);

    let state = app.engine().state();
    assert_eq!(state.score, 20);
    assert_eq!(state.streak, 0);
    assert!(state.is_finished);
    assert_eq!(app.engine().history().len(), 3);
    assert_eq!(app.engine().missed_questions(), vec![questions[2].clone()]);
}

#[test]
fn time_decay_scoring_from_config() {
    let clock = ManualClock::new(0);
    let config = RuntimeConfig {
        scoring_mode: ScoringMode::TimeDecay,
        ..RuntimeConfig::default()
    };
    let mut app = QuizApp::builder(config)
        .store(Arc::new(InMemoryStore::new()))
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap();

    let questions = app.engine().bank().all()[..2].to_vec();
    app.engine_mut().start_retry_game(questions.clone());

    clock.advance(2_500);
    assert_eq!(app.engine_mut().answer(&questions[0].answer).points, 18);
    clock.advance(30_000);
    assert_eq!(app.engine_mut().answer(&questions[1].answer).points, 10);
}

#[test]
fn shop_purchase_scenario() {
    let (mut app, _) = memory_app();
    let mut economy_rx = app.subscribe(Topic::Economy);

    assert!(app.economy_mut().add_coins(200));
    let item = app.buy_item("sunglasses").unwrap();
    assert_eq!(item.id, "sunglasses");
    assert_eq!(app.economy().coins(), 100);
    assert!(app.economy().has_item("sunglasses"));
    assert_eq!(app.achievements().stats().get(quiz_core::StatKey::ItemsBought), 1);

    let err = app.buy_item("sunglasses").unwrap_err();
    assert_eq!(err.to_string(), "Already owned");
    assert_eq!(app.economy().coins(), 100);

    assert_eq!(app.buy_item("nope").unwrap_err().to_string(), "Item not found");
    assert_eq!(app.buy_item("crown").unwrap_err().to_string(), "Not enough coins");

    let events = drain(&mut economy_rx);
    assert!(events.contains(&Event::Economy(EconomyEvent::Purchased {
        item_id: "sunglasses".to_string(),
        cost: 100,
    })));

    app.profile_mut().equip_item("sunglasses", Slot::Accessory);
    assert_eq!(app.profile().avatar_data().face.eyes, "sunglasses");
}

#[test]
fn minigame_and_arena_rewards() {
    let (mut app, _) = memory_app();

    let settlement = app.award_minigame(MinigameKind::WordSearch, 5, 5);
    assert_eq!(settlement.coins, 18);
    assert_eq!(settlement.xp, 30);
    assert_eq!(app.economy().coins(), 18);
    assert_eq!(app.achievements().stats().get(quiz_core::StatKey::WordSearchWins), 1);

    let settlement = app.award_arena(ArenaResult::Win, "medium");
    assert_eq!((settlement.coins, settlement.xp), (50, 100));
    let arena = app.economy().arena_stats();
    assert_eq!((arena.wins, arena.losses, arena.elo), (1, 0, 1025));

    app.award_arena(ArenaResult::Loss, "medium");
    assert_eq!(app.economy().arena_stats().elo, 1010);
}

#[test]
fn state_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut app = QuizApp::builder(config_in(dir.path())).build().unwrap();
        app.economy_mut().add_coins(200);
        app.buy_item("sunglasses").unwrap();
        app.profile_mut().set_name("Robin");
        let id = app.engine().bank().all()[0].id.clone();
        app.engine_mut().process_revision_answer(&id, true);
    }

    let app = QuizApp::builder(config_in(dir.path())).build().unwrap();
    assert_eq!(app.economy().coins(), 100);
    assert!(app.economy().has_item("sunglasses"));
    assert_eq!(app.profile().display_name(), "Robin");
    let id = app.engine().bank().all()[0].id.clone();
    assert_eq!(app.engine().progress().box_for(&id), 4);

    for key in [
        "vocab_quest_economy",
        "vocab_user_profile",
        "vocab_achievements_stats",
        "vocab_quest_progress",
    ] {
        assert!(dir.path().join(format!("{key}.json")).exists(), "{key}");
    }
}

#[test]
fn corrupt_storage_falls_back_to_zero_state() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    store.set("vocab_quest_economy", "{ definitely not json").unwrap();
    store.set("vocab_user_profile", "[]").unwrap();
    store.set("vocab_achievements", "42").unwrap();
    store.set("vocab_quest_progress", "null").unwrap();

    let mut app = QuizApp::builder(config_in(dir.path())).build().unwrap();
    assert_eq!(app.economy().coins(), 0);
    assert_eq!(app.economy().level(), 1);
    assert_eq!(app.economy().arena_stats().elo, 1000);
    assert!(app.profile().is_new_user());
    assert!(app.achievements().unlocked().is_empty());

    // The first mutation overwrites the corrupt document.
    app.economy_mut().add_coins(5);
    let raw = store.get("vocab_quest_economy").unwrap().unwrap();
    assert!(raw.contains(r#""coins":5"#));
}

#[test]
fn partial_economy_documents_keep_known_fields() {
    let store = Arc::new(InMemoryStore::with_entries([(
        "vocab_quest_economy",
        r#"{"coins":42,"inventory":["crown"]}"#,
    )]));
    let app = QuizApp::builder(RuntimeConfig::default())
        .store(store)
        .build()
        .unwrap();

    assert_eq!(app.economy().coins(), 42);
    assert!(app.economy().has_item("crown"));
    assert_eq!(app.economy().level(), 1);
    assert_eq!(app.economy().arena_stats().elo, 1000);
}

#[test]
fn content_directory_overrides_questions() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("questions.json"),
        r#"[
            {"id": 1, "question": "Opposite of hot?", "answer": "cold", "options": ["cold", "warm"], "theme": "Weather"},
            {"id": "two", "question": "Very big?", "answer": "huge", "options": {"1": "tiny", "2": "huge"}}
        ]"#,
    )
    .unwrap();

    let config = RuntimeConfig {
        content_dir: Some(dir.path().to_path_buf()),
        ..RuntimeConfig::default()
    };
    let app = QuizApp::builder(config)
        .store(Arc::new(InMemoryStore::new()))
        .build()
        .unwrap();

    assert_eq!(app.engine().bank().len(), 2);
    assert_eq!(app.engine().themes(), vec!["All", "Weather"]);
    // Shop and balance fall back to the embedded files.
    assert_eq!(app.economy().catalog().len(), 23);
}

#[test]
fn empty_question_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("questions.json"), "[]").unwrap();

    let config = RuntimeConfig {
        content_dir: Some(dir.path().to_path_buf()),
        ..RuntimeConfig::default()
    };
    let result = QuizApp::builder(config)
        .store(Arc::new(InMemoryStore::new()))
        .build();
    assert!(matches!(result, Err(RuntimeError::EmptyQuestionBank)));
}

/// 2025-12-15T00:00:00Z, inside the winter event.
const MID_WINTER_MS: u64 = 1_765_756_800_000;

fn seasonal_app(clock: &ManualClock) -> QuizApp {
    let mut content = ContentBundle::builtin().unwrap();
    content.questions.extend([
        Question::multiple_choice(
            "ski_1",
            "Long boards for snowy slopes",
            "skis",
            vec!["skis".into(), "oars".into()],
        )
        .with_theme("Winter Sports"),
        Question::multiple_choice(
            "ski_2",
            "Sport played on ice with a puck",
            "hockey",
            vec!["hockey".into(), "tennis".into()],
        )
        .with_theme("Winter Sports"),
    ]);

    QuizApp::builder(RuntimeConfig::default())
        .store(Arc::new(InMemoryStore::new()))
        .content(content)
        .clock(Arc::new(clock.clone()))
        .build()
        .unwrap()
}

fn play_theme(app: &mut QuizApp, theme: &str) {
    let questions: Vec<Question> = app.engine().bank().by_theme(theme).cloned().collect();
    app.engine_mut().start_retry_game(questions);
    while let Some(question) = app.engine().current_question() {
        let answer = question.answer.clone();
        app.engine_mut().answer(&answer);
    }
}

#[test]
fn seasonal_quiz_pays_event_tokens() {
    let clock = ManualClock::new(MID_WINTER_MS);
    let mut app = seasonal_app(&clock);
    assert!(app.engine().themes().contains(&"Winter Sports".to_string()));

    play_theme(&mut app, "Winter Sports");
    let settlement = app.finish_quiz().unwrap();
    assert_eq!(settlement.coins, 20);
    assert_eq!(settlement.event_tokens, 30);
    assert_eq!(app.economy().event_tokens(), 30);
}

#[test]
fn other_themes_and_closed_windows_pay_no_tokens() {
    let clock = ManualClock::new(MID_WINTER_MS);
    let mut app = seasonal_app(&clock);

    play_theme(&mut app, "Weather");
    assert_eq!(app.finish_quiz().unwrap().event_tokens, 0);

    clock.set(0);
    assert!(!app.engine().themes().contains(&"Winter Sports".to_string()));
    play_theme(&mut app, "Winter Sports");
    let settlement = app.finish_quiz().unwrap();
    assert_eq!(settlement.coins, 20);
    assert_eq!(settlement.event_tokens, 0);
    assert_eq!(app.economy().event_tokens(), 0);
}
