// Engine module
// Deterministic tick core plus the thread-backed runtime driving it

pub mod core;
pub mod runtime;

pub use self::core::{EngineCore, TickOutcome};
pub use self::runtime::{CountdownEngine, SharedLocale};

use crate::models::context::DisplayContext;
use crate::models::event::ScheduledEvent;
use crate::models::locale::Locale;
use crate::services::countdown::models::{CountdownState, UrgencyLevel};

/// What the renderer is asked to draw for one context on one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUpdate {
    /// No snapshot yet and no fetch has failed either; first fetch pending.
    Loading,
    /// No snapshot exists and at least one fetch has failed.
    Unavailable,
    /// Valid empty result: nothing upcoming for this context.
    Nothing,
    /// The current target elapsed; rendering is held back while a fresh
    /// snapshot is being fetched.
    Refreshing,
    Countdown {
        event: ScheduledEvent,
        countdown: CountdownState,
        urgency: UrgencyLevel,
        /// The snapshot survives one or more failed refreshes; data may be
        /// out of date.
        stale: bool,
    },
}

impl RenderUpdate {
    pub fn is_countdown(&self) -> bool {
        matches!(self, RenderUpdate::Countdown { .. })
    }
}

/// Rendering collaborator. The engine computes, the renderer draws; the
/// engine has no dependency on any output medium.
pub trait CountdownRenderer: Send + Sync {
    fn render(&self, context: &DisplayContext, update: &RenderUpdate, locale: Locale);
}
