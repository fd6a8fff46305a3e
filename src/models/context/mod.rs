// Context module
// What a given display surface cares about: accepted task kinds, an optional
// tree filter for fertilizer events, and its urgency policy

use std::collections::HashSet;

use crate::models::event::ScheduledEvent;

/// Every kind the schedule generator emits for poultry-side tasks.
pub const POULTRY_KINDS: &[&str] = &[
    "deworming",
    "vitamins",
    "sanitization",
    "coccidiosis",
    "weekly_cleaning",
    "soil_turning",
    "ventilation",
    "feeder_cleaning",
    "water_station",
];

/// The pipe-waterer page aggregates four maintenance variants.
pub const PIPE_WATERER_KINDS: &[&str] = &[
    "pipe_waterer_change_water",
    "pipe_waterer_rinse",
    "pipe_waterer_sanitize",
    "pipe_waterer_deep_clean",
];

/// Which tree sub-tags a context accepts on fertilizer events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TreeFilter {
    /// No filter: every sub-tag (and events without one) matches.
    #[default]
    Any,
    One(String),
    AnyOf(HashSet<String>),
}

impl TreeFilter {
    pub fn any_of<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TreeFilter::AnyOf(tags.into_iter().map(Into::into).collect())
    }

    /// Membership test against an event's sub-tag. A `One`/`AnyOf` filter only
    /// accepts events that actually carry a matching sub-tag.
    pub fn accepts(&self, tree: Option<&str>) -> bool {
        match self {
            TreeFilter::Any => true,
            TreeFilter::One(tag) => tree == Some(tag.as_str()),
            TreeFilter::AnyOf(tags) => tree.is_some_and(|t| tags.contains(t)),
        }
    }
}

/// How a surface maps countdown windows to urgency levels. Task and tree
/// pages use the full three-level scheme; the dashboard cards only highlight
/// the urgent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrgencyPolicy {
    #[default]
    ThreeLevel,
    TwoLevel,
}

/// Static description of one display surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayContext {
    pub name: String,
    pub accepted_kinds: HashSet<String>,
    pub tree_filter: TreeFilter,
    pub urgency_policy: UrgencyPolicy,
}

impl DisplayContext {
    pub fn new<I, S>(name: impl Into<String>, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            accepted_kinds: kinds.into_iter().map(Into::into).collect(),
            tree_filter: TreeFilter::Any,
            urgency_policy: UrgencyPolicy::default(),
        }
    }

    pub fn with_tree_filter(mut self, filter: TreeFilter) -> Self {
        self.tree_filter = filter;
        self
    }

    pub fn with_urgency_policy(mut self, policy: UrgencyPolicy) -> Self {
        self.urgency_policy = policy;
        self
    }

    /// Whether an event belongs on this surface, ignoring time. The matcher
    /// layers the strictly-future check on top of this.
    pub fn accepts(&self, event: &ScheduledEvent) -> bool {
        self.accepted_kinds.contains(&event.kind) && self.tree_filter.accepts(event.tree.as_deref())
    }

    /// The whole-dashboard surface: every kind, no tree filter.
    pub fn dashboard() -> Self {
        let kinds = POULTRY_KINDS
            .iter()
            .chain(PIPE_WATERER_KINDS)
            .chain(&["fertilizer"])
            .copied();
        Self::new("dashboard", kinds)
    }

    /// A single-task page such as `deworming` or `ventilation`.
    pub fn task_page(kind: &str) -> Self {
        Self::new(kind, [kind])
    }

    /// The pipe-waterer page, which watches all four maintenance variants.
    pub fn pipe_waterer_page() -> Self {
        Self::new("pipe_waterer", PIPE_WATERER_KINDS.iter().copied())
    }

    /// A card overlay on the dashboard: same kinds as the matching page but
    /// with the two-level urgency scheme (cards only flag the urgent window).
    pub fn card(kind: &str) -> Self {
        Self::task_page(kind).with_urgency_policy(UrgencyPolicy::TwoLevel)
    }

    /// A tree page keyed by its page slug. The slug-to-species mapping is not
    /// 1:1: the mango page covers both plantings, and a few slugs differ from
    /// the species tag in the feed.
    pub fn tree_page(slug: &str) -> Option<Self> {
        let filter = match slug {
            "henna" | "fig" | "banana" | "pomegranate" | "grape" | "acacia" | "bougainvillea"
            | "moringa" => TreeFilter::One(slug.to_string()),
            "mango" => TreeFilter::any_of(["mango_small", "mango_large"]),
            "jackfruit" => TreeFilter::One("jackfruit_young".to_string()),
            "mint" => TreeFilter::One("mint_basil".to_string()),
            "custard" => TreeFilter::One("custard_apple".to_string()),
            _ => return None,
        };

        Some(Self::new(slug, ["fertilizer"]).with_tree_filter(filter))
    }
}
