//! Error Ledger Module
//!
//! Time-ordered record of recent primary provider failures. The circuit
//! breaker decision is computed from it after pruning stale entries.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};

// == Error Ledger ==
/// Failure timestamps, oldest at the front.
#[derive(Debug, Clone, Default)]
pub struct ErrorLedger {
    failures: VecDeque<DateTime<Utc>>,
}

impl ErrorLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger already holding `failures`, in any order.
    pub fn with_failures(failures: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        let mut failures: Vec<_> = failures.into_iter().collect();
        failures.sort();
        Self {
            failures: failures.into(),
        }
    }

    // == Record ==
    /// Records a failure that happened at `at`.
    ///
    /// Keeps the ledger ordered even if the clock stepped backwards.
    pub fn record(&mut self, at: DateTime<Utc>) {
        match self.failures.back() {
            Some(last) if *last > at => {
                let index = self.failures.partition_point(|t| *t <= at);
                self.failures.insert(index, at);
            }
            _ => self.failures.push_back(at),
        }
    }

    // == Prune ==
    /// Drops every failure at or before `cutoff`; returns how many went.
    pub fn prune(&mut self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        while self.failures.front().is_some_and(|t| *t <= cutoff) {
            self.failures.pop_front();
            removed += 1;
        }
        removed
    }

    // == Circuit Decision ==
    /// Returns true when the primary tier should be skipped at `now`.
    ///
    /// Prunes failures outside `window` first, then trips when the remaining
    /// failures are all fresh and there are more than `threshold` of them.
    /// A window reaching past the earliest representable instant keeps
    /// every failure.
    pub fn is_tripped(&mut self, now: DateTime<Utc>, window: Duration, threshold: usize) -> bool {
        let cutoff = now
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        self.prune(cutoff);

        match self.oldest() {
            Some(oldest) => oldest > cutoff && self.failures.len() > threshold,
            None => false,
        }
    }

    pub fn oldest(&self) -> Option<DateTime<Utc>> {
        self.failures.front().copied()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Copies the recorded failures, oldest first.
    pub fn snapshot(&self) -> Vec<DateTime<Utc>> {
        self.failures.iter().copied().collect()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 16, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_ledger_never_trips() {
        let mut ledger = ErrorLedger::new();
        assert!(!ledger.is_tripped(now(), Duration::hours(1), 0));
    }

    #[test]
    fn test_with_failures_sorts() {
        let ledger = ErrorLedger::with_failures(vec![
            now() - Duration::minutes(1),
            now() - Duration::minutes(30),
            now() - Duration::minutes(10),
        ]);

        assert_eq!(ledger.oldest(), Some(now() - Duration::minutes(30)));
        assert_eq!(
            ledger.snapshot(),
            vec![
                now() - Duration::minutes(30),
                now() - Duration::minutes(10),
                now() - Duration::minutes(1),
            ]
        );
    }

    #[test]
    fn test_record_out_of_order_keeps_order() {
        let mut ledger = ErrorLedger::new();
        ledger.record(now());
        ledger.record(now() - Duration::seconds(5));
        ledger.record(now() + Duration::seconds(5));

        assert_eq!(
            ledger.snapshot(),
            vec![
                now() - Duration::seconds(5),
                now(),
                now() + Duration::seconds(5),
            ]
        );
    }

    #[test]
    fn test_prune_drops_old_entries() {
        let mut ledger = ErrorLedger::with_failures(vec![
            now() - Duration::hours(2),
            now() - Duration::hours(1),
            now() - Duration::minutes(5),
        ]);

        let removed = ledger.prune(now() - Duration::hours(1));

        assert_eq!(removed, 2);
        assert_eq!(ledger.snapshot(), vec![now() - Duration::minutes(5)]);
    }

    #[test]
    fn test_trips_above_threshold() {
        let failures = (0..4).map(|_| now() - Duration::minutes(10));
        let mut ledger = ErrorLedger::with_failures(failures);

        assert!(ledger.is_tripped(now(), Duration::hours(1), 3));
    }

    #[test]
    fn test_does_not_trip_at_threshold() {
        let failures = (0..3).map(|_| now() - Duration::minutes(10));
        let mut ledger = ErrorLedger::with_failures(failures);

        assert!(!ledger.is_tripped(now(), Duration::hours(1), 3));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_stale_failures_do_not_trip() {
        let failures = (0..10).map(|i| now() - Duration::hours(1) - Duration::minutes(i));
        let mut ledger = ErrorLedger::with_failures(failures);

        assert!(!ledger.is_tripped(now(), Duration::hours(1), 3));
        assert!(ledger.is_empty(), "stale failures should be pruned");
    }

    #[test]
    fn test_huge_window_keeps_every_failure() {
        let failures = (0..4).map(|i| now() - Duration::days(365 * 100 + i));
        let mut ledger = ErrorLedger::with_failures(failures);

        assert!(ledger.is_tripped(now(), Duration::seconds(10_000_000_000_000), 3));
        assert_eq!(ledger.len(), 4);
    }

    #[test]
    fn test_mixed_failures_count_only_fresh() {
        let mut ledger = ErrorLedger::with_failures(vec![
            now() - Duration::hours(3),
            now() - Duration::hours(2),
            now() - Duration::minutes(20),
            now() - Duration::minutes(10),
        ]);

        assert!(!ledger.is_tripped(now(), Duration::hours(1), 2));
        assert_eq!(ledger.len(), 2);
        assert!(ledger.is_tripped(now(), Duration::hours(1), 1));
    }
}
