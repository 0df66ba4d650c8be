//! Seasonal event calendar loader.

use std::collections::HashSet;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use quiz_core::{EventCalendar, SeasonalEvent};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DAY_MS: u64 = 86_400_000;

/// An event as written in TOML, with `YYYY-MM-DD` dates.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSeasonalEvent {
    pub id: String,
    pub theme: String,
    #[serde(default)]
    pub kind: String,
    pub start: String,
    pub end: String,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_multiplier() -> f64 {
    SeasonalEvent::DEFAULT_MULTIPLIER
}

impl RawSeasonalEvent {
    /// The window runs from the start of `start` to the end of `end`, UTC.
    pub fn resolve(self) -> LoadResult<SeasonalEvent> {
        let start_ms = day_start_ms(&self.start)?;
        let end_ms = day_start_ms(&self.end)? + DAY_MS - 1;
        if end_ms < start_ms {
            anyhow::bail!("Event {} ends before it starts", self.id);
        }
        if !self.multiplier.is_finite() || self.multiplier < 0.0 {
            anyhow::bail!("Event {} has invalid multiplier {}", self.id, self.multiplier);
        }

        Ok(SeasonalEvent {
            id: self.id,
            theme: self.theme,
            kind: self.kind,
            start_ms,
            end_ms,
            multiplier: self.multiplier,
        })
    }
}

fn day_start_ms(date: &str) -> LoadResult<u64> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| anyhow::anyhow!("Invalid event date {:?}: {}", date, e))?;
    let millis = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    u64::try_from(millis).map_err(|_| anyhow::anyhow!("Event date {} is before 1970", date))
}

#[derive(Debug, Clone, Deserialize)]
struct EventsFile {
    #[serde(default)]
    events: Vec<RawSeasonalEvent>,
}

/// Loader for the seasonal event calendar from TOML files.
pub struct EventLoader;

impl EventLoader {
    pub fn load(path: &Path) -> LoadResult<EventCalendar> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<EventCalendar> {
        let file: EventsFile = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse events TOML: {}", e))?;

        let mut seen = HashSet::new();
        if let Some(dup) = file.events.iter().find(|e| !seen.insert(e.id.as_str())) {
            anyhow::bail!("Duplicate event id: {}", dup.id);
        }

        let events = file
            .events
            .into_iter()
            .map(RawSeasonalEvent::resolve)
            .collect::<LoadResult<Vec<_>>>()?;
        Ok(EventCalendar::new(events))
    }
}
