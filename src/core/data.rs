//! Event storage for the loaded catalog
//!
//! The store is immutable once built and is the source of truth for every
//! pipeline run. Filtering produces a fresh [`EventSet`].

use tracing::{debug, trace, warn};

use super::events::{Event, EventSet};

/// Immutable backing collection of cleaned events
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    /// Events in source order
    events: Vec<Event>,
    /// Number of records rejected when the store was built
    rejected: usize,
}

impl EventStore {
    /// Build a store, dropping events that break the event set invariant
    /// (non-finite fields or negative magnitude).
    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut rejected = 0usize;
        let events: Vec<Event> = events
            .into_iter()
            .filter(|event| {
                let ok = event.is_valid();
                if !ok {
                    rejected += 1;
                    trace!(?event, "Event rejected");
                }
                ok
            })
            .collect();

        if rejected > 0 {
            warn!(rejected, kept = events.len(), "Dropped invalid events");
        }
        debug!(events = events.len(), "Event store built");

        Self { events, rejected }
    }

    /// Events with `magnitude >= min_magnitude`, in source order.
    ///
    /// A threshold above every magnitude (or NaN) yields an empty set.
    pub fn filter(&self, min_magnitude: f64) -> EventSet {
        let selected: Vec<Event> = self
            .events
            .iter()
            .filter(|e| e.magnitude >= min_magnitude)
            .copied()
            .collect();

        trace!(
            min_magnitude,
            selected = selected.len(),
            total = self.events.len(),
            "Filtered events"
        );

        EventSet::from_valid(selected)
    }

    /// Total event count
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Records dropped at build time
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Iterate all events in source order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(mags: &[f64]) -> EventStore {
        EventStore::from_events(
            mags.iter()
                .enumerate()
                .map(|(i, &m)| Event::new(i as f64, i as f64 * 2.0, m, 10.0)),
        )
    }

    #[test]
    fn test_filter_threshold_inclusive() {
        let s = store(&[3.0, 4.5, 5.0, 6.0, 7.2]);
        let set = s.filter(4.5);
        let mags: Vec<f64> = set.iter().map(|e| e.magnitude).collect();
        assert_eq!(mags, vec![4.5, 5.0, 6.0, 7.2]);
    }

    #[test]
    fn test_filter_preserves_source_order() {
        let s = store(&[6.0, 3.0, 5.0, 4.0, 7.0]);
        let set = s.filter(4.0);
        let lats: Vec<f64> = set.iter().map(|e| e.latitude).collect();
        assert_eq!(lats, vec![0.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_filter_monotonic() {
        let s = store(&[3.1, 8.0, 4.4, 5.9, 3.3, 6.6, 4.5, 9.1]);
        let mut prev = usize::MAX;
        for step in 0..=80 {
            let threshold = 2.0 + step as f64 * 0.1;
            let n = s.filter(threshold).len();
            assert!(n <= prev, "threshold {threshold} grew result to {n}");
            prev = n;
        }
    }

    #[test]
    fn test_filter_above_max_is_empty() {
        let s = store(&[3.0, 4.0]);
        assert!(s.filter(4.01).is_empty());
        assert!(s.filter(f64::NAN).is_empty());
        assert_eq!(s.filter(f64::NEG_INFINITY).len(), 2);
    }

    #[test]
    fn test_from_events_drops_invalid() {
        let s = EventStore::from_events(vec![
            Event::new(1.0, 1.0, 5.0, 10.0),
            Event::new(1.0, 1.0, -0.5, 10.0),
            Event::new(f64::NAN, 1.0, 5.0, 10.0),
        ]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.rejected(), 2);
    }

    #[test]
    fn test_empty_store() {
        let s = EventStore::default();
        assert!(s.is_empty());
        assert!(s.filter(0.0).is_empty());
    }
}
