// Event module
// Scheduled maintenance event model as consumed from the schedule feed

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::models::locale::{Locale, LocalizedText};

/// Priority assigned by the schedule generator. Purely informational for
/// rendering; urgency is derived from remaining time, not from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventPriority {
    High,
    #[default]
    Medium,
    Low,
}

/// A single scheduled maintenance task.
///
/// Events are immutable once fetched; the engine never mutates them, it only
/// filters and selects. `tree` is the optional sub-tag carried by fertilizer
/// events (the species being fertilized, e.g. `mango_small`).
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub kind: String,
    pub tree: Option<String>,
    pub occurs_at: DateTime<Local>,
    pub title: LocalizedText,
    pub icon: String,
    pub priority: EventPriority,
}

impl ScheduledEvent {
    pub fn new(kind: impl Into<String>, occurs_at: DateTime<Local>) -> Self {
        Self {
            kind: kind.into(),
            tree: None,
            occurs_at,
            title: LocalizedText::default(),
            icon: String::new(),
            priority: EventPriority::default(),
        }
    }

    pub fn with_tree(mut self, tree: impl Into<String>) -> Self {
        self.tree = Some(tree.into());
        self
    }

    pub fn with_title(mut self, title: LocalizedText) -> Self {
        self.title = title;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_priority(mut self, priority: EventPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Title in the requested display language.
    pub fn title_for(&self, locale: Locale) -> &str {
        self.title.get(locale)
    }

    /// Strictly future relative to `now`. An event occurring exactly at `now`
    /// has already started and no longer counts.
    pub fn is_future(&self, now: DateTime<Local>) -> bool {
        self.occurs_at > now
    }
}
