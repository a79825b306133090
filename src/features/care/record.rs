//! Care records and per-metric state
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Generic metric map replacing the fixed water/fertilizer columns

use std::collections::BTreeMap;

/// State of one care metric (e.g. "water") for one plant thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricState {
    /// Always positive
    pub interval_seconds: i64,
    /// Unix seconds of the last logged action, `None` if never logged
    pub last_action_time: Option<i64>,
    /// Whether the reminder for the current window has been delivered
    pub reminded: bool,
}

/// Where a metric sits in its reminder lifecycle at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricPhase {
    /// No action has ever been logged
    Unset,
    /// Action logged, deadline not reached yet
    Active { due_at: i64 },
    /// Deadline reached and no reminder sent yet
    Due,
    /// Reminder delivered; waits for the next action
    Reminded,
}

impl MetricState {
    pub fn new(interval_seconds: i64) -> Self {
        MetricState {
            interval_seconds,
            last_action_time: None,
            reminded: false,
        }
    }

    /// Instant at which the current window elapses
    pub fn due_at(&self) -> Option<i64> {
        self.last_action_time
            .map(|last| last.saturating_add(self.interval_seconds))
    }

    /// The due-ness predicate shared by status display and the scheduler
    pub fn is_due(&self, now: i64) -> bool {
        match self.due_at() {
            Some(due_at) => !self.reminded && now >= due_at,
            None => false,
        }
    }

    pub fn phase(&self, now: i64) -> MetricPhase {
        match self.due_at() {
            None => MetricPhase::Unset,
            Some(_) if self.reminded => MetricPhase::Reminded,
            Some(_) if self.is_due(now) => MetricPhase::Due,
            Some(due_at) => MetricPhase::Active { due_at },
        }
    }
}

/// Everything tracked for one plant thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareRecord {
    pub thread_id: u64,
    pub metrics: BTreeMap<String, MetricState>,
}

impl CareRecord {
    pub fn new(thread_id: u64) -> Self {
        CareRecord {
            thread_id,
            metrics: BTreeMap::new(),
        }
    }

    pub fn metric(&self, name: &str) -> Option<&MetricState> {
        self.metrics.get(name)
    }

    /// True when at least one metric has left the `Unset` phase
    pub fn is_tracked(&self) -> bool {
        self.metrics
            .values()
            .any(|state| state.last_action_time.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;

    fn logged(interval: i64, last: i64) -> MetricState {
        MetricState {
            interval_seconds: interval,
            last_action_time: Some(last),
            reminded: false,
        }
    }

    #[test]
    fn test_unset_is_never_due() {
        let state = MetricState::new(DAY);
        assert!(!state.is_due(0));
        assert!(!state.is_due(i64::MAX));
        assert_eq!(state.phase(1_000_000), MetricPhase::Unset);
    }

    #[test]
    fn test_due_exactly_at_deadline() {
        let state = logged(7 * DAY, 1_000);
        assert!(!state.is_due(1_000 + 7 * DAY - 1));
        assert!(state.is_due(1_000 + 7 * DAY));
        assert_eq!(
            state.phase(1_000),
            MetricPhase::Active {
                due_at: 1_000 + 7 * DAY
            }
        );
        assert_eq!(state.phase(1_000 + 7 * DAY), MetricPhase::Due);
    }

    #[test]
    fn test_reminded_is_not_due() {
        let mut state = logged(DAY, 0);
        state.reminded = true;
        assert!(!state.is_due(10 * DAY));
        assert_eq!(state.phase(10 * DAY), MetricPhase::Reminded);
    }

    #[test]
    fn test_due_at_saturates() {
        let state = logged(i64::MAX, 10);
        assert_eq!(state.due_at(), Some(i64::MAX));
        assert!(!state.is_due(i64::MAX - 1));
    }

    #[test]
    fn test_is_tracked() {
        let mut record = CareRecord::new(42);
        assert!(!record.is_tracked());

        record.metrics.insert("water".to_string(), MetricState::new(DAY));
        assert!(!record.is_tracked());

        record
            .metrics
            .insert("fertilizer".to_string(), logged(DAY, 5));
        assert!(record.is_tracked());
    }
}
