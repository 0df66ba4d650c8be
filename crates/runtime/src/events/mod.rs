//! Topic-based event bus for runtime events.
//!
//! Services publish to a topic after their state changes; front-ends
//! subscribe to the topics they render instead of polling.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{AchievementEvent, EconomyEvent, ProfileEvent, SessionEvent};
