//! Stateful services persisted through a [`Store`](crate::repository::Store).
//!
//! Each service loads its document once when constructed, falls back to the
//! zero state when the document is missing or unreadable, and saves after
//! every mutation.

mod achievements;
mod analytics;
mod economy;
mod profile;
mod progress;

pub use achievements::{Achievements, STATS_KEY, UNLOCKED_KEY};
pub use analytics::{ANALYTICS_KEY, Analytics, AnswerRecord};
pub use economy::{ECONOMY_KEY, Economy};
pub use profile::{
    AvatarAccessories, AvatarData, EquippedItems, Face, PROFILE_KEY, ProfileData, Slot,
    UserProfile,
};
pub use progress::{PROGRESS_KEY, ProgressTracker};
