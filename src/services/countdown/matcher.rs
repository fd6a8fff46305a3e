//! Selection of the single most relevant upcoming event for a display
//! surface: strictly-future events of an accepted kind, nearest first.

use chrono::{DateTime, Local};

use crate::models::context::DisplayContext;
use crate::models::event::ScheduledEvent;
use crate::models::schedule::ScheduleSnapshot;

/// Pick the nearest future event the context accepts, or `None`.
///
/// Events occurring exactly at `now` are already expired. Input order is not
/// assumed to be chronological; when two candidates share the exact same
/// instant the one appearing first in the feed wins (`min_by_key` keeps the
/// first of equal elements), so selection is deterministic and stable.
pub fn select_relevant<'a>(
    snapshot: &'a ScheduleSnapshot,
    context: &DisplayContext,
    now: DateTime<Local>,
) -> Option<&'a ScheduledEvent> {
    snapshot
        .events
        .iter()
        .filter(|event| event.is_future(now))
        .filter(|event| context.accepts(event))
        .min_by_key(|event| event.occurs_at)
}
