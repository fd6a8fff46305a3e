// Schedule module
// Wire shape of the notification feed and the immutable snapshot built from it

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::Deserialize;
use thiserror::Error;

use crate::models::event::{EventPriority, ScheduledEvent};
use crate::models::locale::LocalizedText;

/// Rejection reasons for a feed payload. Any bad entry rejects the whole
/// payload so a partially-converted snapshot can never replace a good one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedParseError {
    #[error("entry {index} has an invalid datetime: {value:?}")]
    InvalidDatetime { index: usize, value: String },
    #[error("entry {index} has an empty type tag")]
    EmptyKind { index: usize },
}

/// One entry of the feed as published by the schedule generator.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title_ar: String,
    #[serde(default)]
    pub title_bn: String,
    pub datetime: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub priority: Option<EventPriority>,
    #[serde(default)]
    pub tree: Option<String>,
}

/// Top-level feed document.
///
/// The generator writes the event list under `notifications`; the older API
/// surface published it as `upcoming_notifications`. Both spellings are
/// accepted. Unknown fields (pre-rendered countdown blocks, totals) are
/// ignored: the engine derives everything from the event list itself.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ScheduleFeed {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default, alias = "upcoming_notifications")]
    pub notifications: Vec<FeedEntry>,
}

impl FeedEntry {
    fn into_event(self, index: usize) -> Result<ScheduledEvent, FeedParseError> {
        if self.kind.trim().is_empty() {
            return Err(FeedParseError::EmptyKind { index });
        }

        let occurs_at = parse_feed_datetime(&self.datetime).ok_or_else(|| {
            FeedParseError::InvalidDatetime {
                index,
                value: self.datetime.clone(),
            }
        })?;

        Ok(ScheduledEvent {
            kind: self.kind,
            tree: self.tree,
            occurs_at,
            title: LocalizedText::new(self.title_ar, self.title_bn),
            icon: self.icon.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
        })
    }
}

/// Feed timestamps are ISO-8601. The generator emits naive local datetimes
/// (`2026-08-07T08:00:00`); an explicit offset is honored when present.
fn parse_feed_datetime(value: &str) -> Option<DateTime<Local>> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()?;
    Local.from_local_datetime(&naive).earliest()
}

/// An immutable copy of the full schedule at a point in time.
///
/// Snapshots are replaced wholesale: the engine either sees this snapshot in
/// full or its successor in full, never a mix. Events are kept in feed order;
/// chronological ordering is typical but never relied on for correctness.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSnapshot {
    pub events: Vec<ScheduledEvent>,
    pub fetched_at: DateTime<Local>,
}

impl ScheduleSnapshot {
    pub fn from_feed(
        feed: ScheduleFeed,
        fetched_at: DateTime<Local>,
    ) -> Result<Self, FeedParseError> {
        let events = feed
            .notifications
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_event(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { events, fetched_at })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
