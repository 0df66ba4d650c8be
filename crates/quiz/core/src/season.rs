//! Seasonal events.
//!
//! An event runs over a fixed window and features one theme. While it runs,
//! quizzes on that theme also pay event tokens. Outside its window the theme
//! is hidden from theme pickers.

/// One dated event. Both bounds are inclusive, in epoch milliseconds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeasonalEvent {
    pub id: String,
    pub theme: String,
    /// Free-form cadence label such as `Quarterly`.
    pub kind: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub multiplier: f64,
}

impl SeasonalEvent {
    pub const DEFAULT_MULTIPLIER: f64 = 1.5;

    pub fn is_active(&self, now_ms: u64) -> bool {
        (self.start_ms..=self.end_ms).contains(&now_ms)
    }

    /// `round(score × multiplier)`.
    pub fn tokens_for(&self, score: u32) -> u64 {
        (f64::from(score) * self.multiplier).round().max(0.0) as u64
    }
}

/// Every known event, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventCalendar {
    events: Vec<SeasonalEvent>,
}

impl EventCalendar {
    pub fn new(events: Vec<SeasonalEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[SeasonalEvent] {
        &self.events
    }

    pub fn get(&self, id: &str) -> Option<&SeasonalEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// First event whose window contains `now_ms`.
    pub fn active(&self, now_ms: u64) -> Option<&SeasonalEvent> {
        self.events.iter().find(|e| e.is_active(now_ms))
    }

    /// `false` for unknown ids.
    pub fn is_event_active(&self, id: &str, now_ms: u64) -> bool {
        self.get(id).is_some_and(|e| e.is_active(now_ms))
    }

    /// Token multiplier of the active event, 1.0 when none runs.
    pub fn multiplier(&self, now_ms: u64) -> f64 {
        self.active(now_ms).map_or(1.0, |e| e.multiplier)
    }

    pub fn is_seasonal(&self, theme: &str) -> bool {
        self.events.iter().any(|e| e.theme == theme)
    }

    /// Regular themes are always available. A seasonal theme is available
    /// only while the active event features it.
    pub fn is_theme_available(&self, theme: &str, now_ms: u64) -> bool {
        !self.is_seasonal(theme) || self.active(now_ms).is_some_and(|e| e.theme == theme)
    }

    /// Event tokens for a quiz on `theme` that scored `score`.
    ///
    /// Zero unless an event is running and features exactly that theme.
    pub fn event_tokens(&self, score: u32, theme: Option<&str>, now_ms: u64) -> u64 {
        match (self.active(now_ms), theme) {
            (Some(event), Some(theme)) if event.theme == theme => event.tokens_for(score),
            _ => 0,
        }
    }
}
