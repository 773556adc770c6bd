//! Seismic event record and the ordered event set
//!
//! This module contains:
//! - Event: one cleaned catalog row (location, magnitude, depth)
//! - EventSet: an ordered, immutable sequence of events
//! - Column names of the catalog source

use serde::{Deserialize, Serialize};

// ============================================================================
// Catalog columns
// ============================================================================

pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_MAGNITUDE: &str = "magnitude";
pub const COL_DEPTH: &str = "depth";

/// Required columns, in the order they are stored on [`Event`]
pub const REQUIRED_COLUMNS: [&str; 4] = [COL_LATITUDE, COL_LONGITUDE, COL_MAGNITUDE, COL_DEPTH];

// ============================================================================
// Event
// ============================================================================

/// A single seismic event.
///
/// Depth is in kilometers. Magnitude and depth are payload only: they never
/// take part in zone distance computations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub latitude: f64,
    pub longitude: f64,
    pub magnitude: f64,
    pub depth: f64,
}

impl Event {
    pub fn new(latitude: f64, longitude: f64, magnitude: f64, depth: f64) -> Self {
        Self {
            latitude,
            longitude,
            magnitude,
            depth,
        }
    }

    /// Whether the event may enter an [`EventSet`]: latitude in [-90, 90],
    /// longitude in [-180, 180], magnitude and depth finite and non-negative.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
            && self.magnitude.is_finite()
            && self.depth.is_finite()
            && self.magnitude >= 0.0
            && self.depth >= 0.0
    }

    /// Planar (lat, lon) feature used by zone clustering
    #[inline]
    pub fn position(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

// ============================================================================
// EventSet
// ============================================================================

/// Ordered sequence of events. Order is source insertion order and is never
/// changed by filtering; each filter builds a fresh set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EventSet {
    events: Vec<Event>,
}

impl EventSet {
    /// Empty set (a valid, non-error result)
    pub fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Build from events already known to satisfy [`Event::is_valid`]
    pub(crate) fn from_valid(events: Vec<Event>) -> Self {
        debug_assert!(events.iter().all(Event::is_valid));
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    /// (lat, lon) pairs in set order
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.events.iter().map(Event::position).collect()
    }

    /// First `n` events in source order
    pub fn head(&self, n: usize) -> &[Event] {
        &self.events[..n.min(self.events.len())]
    }
}

impl<'a> IntoIterator for &'a EventSet {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
