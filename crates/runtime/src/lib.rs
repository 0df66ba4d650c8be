//! Runtime orchestration for the vocabulary quiz.
//!
//! This crate persists player state, publishes change events and wires the
//! pure rules of `quiz-core` into a single application object. Hosts build a
//! [`QuizApp`] once, drive the [`QuizEngine`] through it and subscribe to the
//! [`EventBus`] for updates.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the composition root and builder
//! - [`engine`] is the quiz façade over sessions and spaced repetition
//! - [`services`] holds the persisted economy, achievements, profile, progress and analytics
//! - [`events`] provides the topic-based event bus
//! - [`repository`] provides the key-value stores
//! - [`config`] and [`logging`] cover process setup
pub mod api;
pub mod config;
pub mod engine;
pub mod events;
pub mod logging;
pub mod repository;
pub mod runtime;
pub mod services;

pub use api::{Result, RuntimeError};
pub use config::RuntimeConfig;
pub use engine::QuizEngine;
pub use events::{
    AchievementEvent, EconomyEvent, Event, EventBus, ProfileEvent, SessionEvent, Topic,
};
pub use logging::setup_logging;
pub use repository::{FileStore, InMemoryStore, RepositoryError, Store};
pub use runtime::{QuizApp, QuizAppBuilder, Settlement};
pub use services::{
    Achievements, Analytics, AnswerRecord, AvatarData, Economy, ProgressTracker, Slot,
    UserProfile,
};
