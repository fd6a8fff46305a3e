//! Deterministic engine core. Every decision runs against an injected `now`,
//! and fetching is split out into a `refresh_due` / `apply_fetch` pair, so
//! the whole refresh state machine is testable without timers or network and
//! a slow fetch can never sit inside the render pass.

use chrono::{DateTime, Duration, Local};

use crate::models::context::DisplayContext;
use crate::models::locale::Locale;
use crate::models::schedule::{ScheduleFeed, ScheduleSnapshot};
use crate::services::countdown::matcher::select_relevant;
use crate::services::countdown::models::CountdownState;
use crate::services::schedule::fetcher::FetchError;
use crate::services::schedule::SnapshotStore;

use super::{CountdownRenderer, RenderUpdate};

/// Summary of one fast-loop firing, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    /// One update per context, in context order.
    pub updates: Vec<RenderUpdate>,
    /// Whether the engine wants a (re-)fetch after this tick, either because
    /// the slow loop is due or because a target elapsed.
    pub refresh_requested: bool,
}

/// The notification engine proper: snapshot store, display contexts, slow-
/// loop due-time tracking, and the per-tick matcher → calculator →
/// classifier pass. The driver owns the clock and the fetch transport; the
/// core owns every decision.
pub struct EngineCore {
    store: SnapshotStore,
    contexts: Vec<DisplayContext>,
    /// Instant of each context's current match, kept between ticks so an
    /// elapse (target slipping into the past) can be detected.
    current_targets: Vec<Option<DateTime<Local>>>,
    /// Contexts holding their render back until the next fetch completes.
    awaiting_refresh: Vec<bool>,
    refresh_interval: Duration,
    /// `None` until the first fetch completes, so startup fetches at once.
    next_refresh_at: Option<DateTime<Local>>,
    /// An elapsed target forced an out-of-band refresh.
    refresh_forced: bool,
}

impl EngineCore {
    pub fn new(contexts: Vec<DisplayContext>, refresh_interval: Duration) -> Self {
        let count = contexts.len();
        Self {
            store: SnapshotStore::new(),
            contexts,
            current_targets: vec![None; count],
            awaiting_refresh: vec![false; count],
            refresh_interval,
            next_refresh_at: None,
            refresh_forced: false,
        }
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn contexts(&self) -> &[DisplayContext] {
        &self.contexts
    }

    /// Whether the slow loop should fetch now. Stays true until a fetch
    /// result is applied; the driver is expected to guard against launching
    /// a second fetch while one is in flight.
    pub fn refresh_due(&self, now: DateTime<Local>) -> bool {
        self.refresh_forced || self.next_refresh_at.is_none_or(|at| now >= at)
    }

    /// Fetch-completion callback, and the only place the snapshot store is
    /// written. Success replaces the snapshot wholesale; failure (transport
    /// or parse, treated identically) records the error and keeps whatever
    /// snapshot already exists. Returns whether a new snapshot was applied.
    pub fn apply_fetch(
        &mut self,
        result: Result<ScheduleFeed, FetchError>,
        now: DateTime<Local>,
    ) -> bool {
        let replaced = match result.and_then(|feed| {
            ScheduleSnapshot::from_feed(feed, now).map_err(FetchError::from)
        }) {
            Ok(snapshot) => {
                log::info!("Schedule refreshed: {} events", snapshot.len());
                self.store.replace(snapshot);
                true
            }
            Err(err) => {
                log::warn!("Schedule fetch failed, keeping previous snapshot: {}", err);
                self.store.record_failure(err.to_string());
                false
            }
        };

        self.next_refresh_at = Some(now + self.refresh_interval);
        self.refresh_forced = false;
        // Whatever the outcome, suppressed surfaces resume: either from the
        // fresh snapshot or degraded from the retained one.
        self.awaiting_refresh.fill(false);

        replaced
    }

    /// One fast-loop firing at `now`: for every context, detect elapse,
    /// then match, compute, classify, and hand the result to the renderer.
    /// A target that slipped into the past requests an immediate out-of-band
    /// refresh and holds that surface at `Refreshing` until the fetch
    /// completes.
    pub fn tick_at(
        &mut self,
        now: DateTime<Local>,
        renderer: &dyn CountdownRenderer,
        locale: Locale,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for idx in 0..self.contexts.len() {
            if self.current_targets[idx].is_some_and(|at| at <= now) {
                self.current_targets[idx] = None;
                self.awaiting_refresh[idx] = true;
                if !self.refresh_forced {
                    log::debug!(
                        "Countdown target elapsed for {}, refreshing schedule out of band",
                        self.contexts[idx].name
                    );
                }
                self.refresh_forced = true;
            }

            let context = &self.contexts[idx];
            let update = if self.awaiting_refresh[idx] {
                RenderUpdate::Refreshing
            } else {
                let (update, target) = build_update(&self.store, context, now);
                self.current_targets[idx] = target;
                update
            };

            renderer.render(context, &update, locale);
            outcome.updates.push(update);
        }

        outcome.refresh_requested = self.refresh_due(now);
        outcome
    }
}

/// Matcher → calculator → classifier for one context, returning the update
/// and the matched target instant (for elapse tracking).
fn build_update(
    store: &SnapshotStore,
    context: &DisplayContext,
    now: DateTime<Local>,
) -> (RenderUpdate, Option<DateTime<Local>>) {
    let Some(snapshot) = store.snapshot() else {
        let update = if store.consecutive_failures() > 0 {
            RenderUpdate::Unavailable
        } else {
            RenderUpdate::Loading
        };
        return (update, None);
    };

    match select_relevant(snapshot, context, now) {
        None => (RenderUpdate::Nothing, None),
        Some(event) => {
            let countdown = CountdownState::until(event.occurs_at, now);
            let urgency = countdown.urgency(context.urgency_policy);
            let target = event.occurs_at;
            (
                RenderUpdate::Countdown {
                    event: event.clone(),
                    countdown,
                    urgency,
                    stale: store.is_stale(),
                },
                Some(target),
            )
        }
    }
}
