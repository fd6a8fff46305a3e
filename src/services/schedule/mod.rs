pub mod fetcher;

use chrono::{DateTime, Local};

use crate::models::schedule::ScheduleSnapshot;

/// Holds the most recently fetched schedule snapshot together with fetch
/// health. The snapshot is replaced wholesale on a successful refresh; a
/// failed refresh records the error and keeps whatever was there before, so
/// stale-but-present data always wins over no data.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshot: Option<ScheduleSnapshot>,
    consecutive_failures: u32,
    last_error: Option<String>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<&ScheduleSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn has_data(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Stale means readers are still served from a snapshot that at least one
    /// refresh has since failed to replace.
    pub fn is_stale(&self) -> bool {
        self.snapshot.is_some() && self.consecutive_failures > 0
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.snapshot.as_ref().map(|snapshot| snapshot.fetched_at)
    }

    /// Atomic replacement: one assignment, no partial state.
    pub fn replace(&mut self, snapshot: ScheduleSnapshot) {
        self.snapshot = Some(snapshot);
        self.consecutive_failures = 0;
        self.last_error = None;
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error.into());
    }
}
