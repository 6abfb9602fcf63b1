//! Memory statistics.
//!
//! Events are replayed in log order against a running balance. The balance
//! is sampled once after every event, whatever its kind, and
//! `average_outstanding` is the plain mean of those samples. It is not
//! weighted by the time between events.

use crate::models::{EventKind, GroupKey, MemoryAggregate, MemoryEvent};

/// Running state while replaying one cohort.
#[derive(Debug, Default)]
struct Replay {
    total_allocated: i64,
    total_freed: i64,
    allocation_count: usize,
    free_count: usize,
    balance: i64,
    sample_sum: i128,
    samples: usize,
}

impl Replay {
    fn apply(&mut self, event: &MemoryEvent) {
        match event.kind {
            EventKind::Alloc => {
                self.total_allocated = self.total_allocated.saturating_add(event.size_bytes);
                self.allocation_count += 1;
                self.balance = self.balance.saturating_add(event.size_bytes);
            }
            EventKind::Free => {
                self.total_freed = self.total_freed.saturating_add(event.size_bytes);
                self.free_count += 1;
                self.balance = self.balance.saturating_sub(event.size_bytes);
            }
            EventKind::Other(_) => {}
        }
        // Freeing more than is outstanding is a logging anomaly, not an error.
        self.balance = self.balance.max(0);

        self.sample_sum += i128::from(self.balance);
        self.samples += 1;
    }

    fn average_outstanding(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.sample_sum as f64 / self.samples as f64
        }
    }
}

/// Reduce one cohort's events (in log order) to totals, counts and average balance.
///
/// An empty cohort yields a zero-valued aggregate.
pub fn summarize(key: &GroupKey, events: &[MemoryEvent]) -> MemoryAggregate {
    let Some(first) = events.first() else {
        return MemoryAggregate::empty(key);
    };

    let mut replay = Replay::default();
    for event in events {
        replay.apply(event);
    }

    MemoryAggregate {
        algorithm: key.algorithm.clone(),
        run_label: key.run_label.clone(),
        file_label: key.file_label.clone(),
        file_size_bytes: first.file_size_bytes,
        total_allocated: replay.total_allocated,
        total_freed: replay.total_freed,
        average_outstanding: replay.average_outstanding(),
        allocation_count: replay.allocation_count,
        free_count: replay.free_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> GroupKey {
        GroupKey::new("heapsort", Some("m1".to_string()), "06_100K.bin", 100_000)
    }

    fn event(kind: &str, size: i64) -> MemoryEvent {
        MemoryEvent {
            alignment: "16".to_string(),
            kind: EventKind::from(kind),
            size_bytes: size,
            algorithm: "heapsort".to_string(),
            file_label: "06_100K.bin".to_string(),
            file_size_bytes: 100_000,
        }
    }

    #[test]
    fn test_free_clamps_balance() {
        let agg = summarize(&key(), &[event("ALLOC", 100), event("FREE", 150)]);
        assert_eq!(agg.total_allocated, 100);
        assert_eq!(agg.total_freed, 150);
        assert_eq!(agg.allocation_count, 1);
        assert_eq!(agg.free_count, 1);
        // Samples are [100, 0].
        assert_eq!(agg.average_outstanding, 50.0);
    }

    #[test]
    fn test_average_samples_every_event() {
        let agg = summarize(
            &key(),
            &[event("ALLOC", 100), event("ALLOC", 50), event("FREE", 100)],
        );
        assert_eq!(agg.average_outstanding, 100.0);
        assert_eq!(agg.allocation_count, 2);
        assert_eq!(agg.free_count, 1);
    }

    #[test]
    fn test_unknown_kind_still_samples() {
        let agg = summarize(&key(), &[event("ALLOC", 90), event("REALLOC", 500)]);
        assert_eq!(agg.allocation_count, 1);
        assert_eq!(agg.free_count, 0);
        assert_eq!(agg.total_allocated, 90);
        assert_eq!(agg.total_freed, 0);
        // Samples are [90, 90].
        assert_eq!(agg.average_outstanding, 90.0);
    }

    #[test]
    fn test_balance_recovers_after_clamp() {
        let agg = summarize(
            &key(),
            &[event("FREE", 10), event("ALLOC", 30), event("FREE", 10)],
        );
        // Samples are [0, 30, 20].
        assert!((agg.average_outstanding - 50.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_cohort_is_zero() {
        let agg = summarize(&key(), &[]);
        assert_eq!(agg, MemoryAggregate::empty(&key()));
    }
}
