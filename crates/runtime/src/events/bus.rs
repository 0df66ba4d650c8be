//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{AchievementEvent, EconomyEvent, ProfileEvent, SessionEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Quiz session lifecycle
    Session,
    /// Coins, XP and inventory
    Economy,
    /// Badge unlocks
    Achievements,
    /// Name and avatar changes
    Profile,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Session(SessionEvent),
    Economy(EconomyEvent),
    Achievement(AchievementEvent),
    Profile(ProfileEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Session(_) => Topic::Session,
            Event::Economy(_) => Topic::Economy,
            Event::Achievement(_) => Topic::Achievements,
            Event::Profile(_) => Topic::Profile,
        }
    }
}

impl From<SessionEvent> for Event {
    fn from(event: SessionEvent) -> Self {
        Event::Session(event)
    }
}

impl From<EconomyEvent> for Event {
    fn from(event: EconomyEvent) -> Self {
        Event::Economy(event)
    }
}

impl From<AchievementEvent> for Event {
    fn from(event: AchievementEvent) -> Self {
        Event::Achievement(event)
    }
}

impl From<ProfileEvent> for Event {
    fn from(event: ProfileEvent) -> Self {
        Event::Profile(event)
    }
}

/// One broadcast channel per topic, created up front and never replaced.
struct Channels {
    session: broadcast::Sender<Event>,
    economy: broadcast::Sender<Event>,
    achievements: broadcast::Sender<Event>,
    profile: broadcast::Sender<Event>,
}

impl Channels {
    fn get(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Session => &self.session,
            Topic::Economy => &self.economy,
            Topic::Achievements => &self.achievements,
            Topic::Profile => &self.profile,
        }
    }
}

/// Topic-based event bus
///
/// Consumers subscribe to the topics they care about and drain their receiver
/// whenever convenient. Publishing never blocks and never needs an async
/// runtime; events sent while nobody listens are dropped.
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Default per-topic capacity.
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a bus whose topics each buffer `capacity` events per receiver.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                session: broadcast::channel(capacity).0,
                economy: broadcast::channel(capacity).0,
                achievements: broadcast::channel(capacity).0,
                profile: broadcast::channel(capacity).0,
            }),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if self.channels.get(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.channels.get(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.channels.get(topic).receiver_count()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ProfileEvent;

    fn profile_event(name: &str) -> ProfileEvent {
        ProfileEvent::Updated {
            display_name: name.to_string(),
            avatar: "🦊".to_string(),
        }
    }

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut profile = bus.subscribe(Topic::Profile);
        let mut session = bus.subscribe(Topic::Session);

        bus.publish(profile_event("Ana"));

        assert_eq!(profile.try_recv().unwrap(), Event::Profile(profile_event("Ana")));
        assert!(session.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::with_capacity(0);
        bus.publish(profile_event("nobody"));
        assert_eq!(bus.subscriber_count(Topic::Profile), 0);
    }

    #[test]
    fn clones_share_channels() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let mut rx = bus.subscribe_multiple(&[Topic::Profile]);

        clone.publish(profile_event("Bo"));

        let event = rx.get_mut(&Topic::Profile).unwrap().try_recv().unwrap();
        assert_eq!(event.topic(), Topic::Profile);
    }
}
