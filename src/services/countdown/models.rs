use chrono::{DateTime, Local};

use crate::models::context::UrgencyPolicy;

/// Remaining time until a scheduled event, decomposed for display.
///
/// Recomputed on every tick and never stored. Units follow a mixed-radix
/// decomposition: hours < 24, minutes < 60, seconds < 60; days are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownState {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_elapsed: bool,
}

impl CountdownState {
    /// Countdown from `now` to `target`. The difference is truncated to whole
    /// seconds, never rounded up; a target at or before `now` is elapsed.
    pub fn until(target: DateTime<Local>, now: DateTime<Local>) -> Self {
        let diff = target.signed_duration_since(now).num_seconds();
        if diff <= 0 {
            return Self::elapsed();
        }

        Self {
            days: diff / 86_400,
            hours: diff % 86_400 / 3_600,
            minutes: diff % 3_600 / 60,
            seconds: diff % 60,
            is_elapsed: false,
        }
    }

    pub fn elapsed() -> Self {
        Self {
            is_elapsed: true,
            ..Self::default()
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * 86_400 + self.hours * 3_600 + self.minutes * 60 + self.seconds
    }

    /// Classify how soon this countdown runs out, under the surface's policy.
    ///
    /// Urgent is under six hours on the final day. The medium window (one or
    /// two full days remaining) only exists under the three-level policy;
    /// two-level surfaces fold it into normal.
    pub fn urgency(&self, policy: UrgencyPolicy) -> UrgencyLevel {
        if self.days == 0 && self.hours < 6 {
            UrgencyLevel::Urgent
        } else if policy == UrgencyPolicy::ThreeLevel && self.days >= 1 && self.days < 3 {
            UrgencyLevel::Medium
        } else {
            UrgencyLevel::Normal
        }
    }
}

/// Derived emphasis level for countdown styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyLevel {
    Urgent,
    Medium,
    Normal,
}

impl UrgencyLevel {
    /// Stable lowercase name, matching the CSS class suffixes the dashboard
    /// styles countdowns with.
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Urgent => "urgent",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::Normal => "normal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use test_case::test_case;

    fn countdown_after(seconds: i64) -> CountdownState {
        let now = Local::now();
        CountdownState::until(now + Duration::seconds(seconds), now)
    }

    #[test]
    fn decomposes_mixed_radix() {
        // 1 day + 1 hour + 1 minute + 1 second
        let state = countdown_after(90_061);
        assert_eq!(
            state,
            CountdownState {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1,
                is_elapsed: false
            }
        );
        assert_eq!(state.total_seconds(), 90_061);
    }

    #[test]
    fn zero_and_negative_diffs_are_elapsed() {
        let now = Local::now();
        assert!(CountdownState::until(now, now).is_elapsed);
        let past = CountdownState::until(now - Duration::seconds(5), now);
        assert!(past.is_elapsed);
        assert_eq!(past.total_seconds(), 0);
    }

    #[test]
    fn subsecond_remainder_truncates_down() {
        let now = Local::now();
        let state = CountdownState::until(now + Duration::milliseconds(61_900), now);
        assert_eq!(state.minutes, 1);
        assert_eq!(state.seconds, 1);
    }

    #[test_case(0, 0 => UrgencyLevel::Urgent ; "under six hours")]
    #[test_case(0, 5 => UrgencyLevel::Urgent ; "five hours left")]
    #[test_case(0, 6 => UrgencyLevel::Normal ; "six hours is not urgent")]
    #[test_case(0, 23 => UrgencyLevel::Normal ; "same day evening")]
    #[test_case(1, 0 => UrgencyLevel::Medium ; "one full day")]
    #[test_case(2, 23 => UrgencyLevel::Medium ; "two full days")]
    #[test_case(3, 0 => UrgencyLevel::Normal ; "three days")]
    #[test_case(14, 2 => UrgencyLevel::Normal ; "two weeks")]
    fn three_level_classification(days: i64, hours: i64) -> UrgencyLevel {
        let state = CountdownState {
            days,
            hours,
            minutes: 0,
            seconds: 0,
            is_elapsed: false,
        };
        state.urgency(UrgencyPolicy::ThreeLevel)
    }

    #[test_case(0, 3 => UrgencyLevel::Urgent ; "urgent window survives")]
    #[test_case(1, 0 => UrgencyLevel::Normal ; "medium folds into normal")]
    #[test_case(2, 12 => UrgencyLevel::Normal ; "two days is normal")]
    fn two_level_classification(days: i64, hours: i64) -> UrgencyLevel {
        let state = CountdownState {
            days,
            hours,
            minutes: 0,
            seconds: 0,
            is_elapsed: false,
        };
        state.urgency(UrgencyPolicy::TwoLevel)
    }

    #[test]
    fn elapsed_classifies_as_urgent() {
        assert_eq!(
            CountdownState::elapsed().urgency(UrgencyPolicy::ThreeLevel),
            UrgencyLevel::Urgent
        );
    }

    #[test]
    fn urgency_names_are_stable() {
        assert_eq!(UrgencyLevel::Urgent.as_str(), "urgent");
        assert_eq!(UrgencyLevel::Medium.as_str(), "medium");
        assert_eq!(UrgencyLevel::Normal.as_str(), "normal");
    }
}
