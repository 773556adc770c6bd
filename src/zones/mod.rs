//! Zone assignment - spatial k-means over filtered events
//!
//! Only latitude and longitude take part in the clustering. The RNG seed is
//! part of the assigner's configuration, so the same `(events, k)` always
//! yields the same zones.

mod kmeans;

pub use kmeans::Point;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, trace};

use crate::core::EventSet;

/// Zone id per event of one [`EventSet`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZoneAssignment {
    /// `zones[i]` is the zone of event `i`
    zones: Vec<usize>,
    /// Requested zone count; every id is `< k`
    k: usize,
    /// Final centroid per effective zone, as (lat, lon)
    centroids: Vec<Point>,
    /// Within-zone sum of squared degree distances
    inertia: f64,
    /// Lloyd iterations run by the winning restart
    iterations: usize,
}

impl ZoneAssignment {
    /// Assignment for an empty event set ("nothing to render")
    pub fn empty(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    pub fn zone_of(&self, index: usize) -> Option<usize> {
        self.zones.get(index).copied()
    }

    pub fn zones(&self) -> &[usize] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Event count per zone id in `[0, k)`; empty zones count zero
    pub fn zone_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.k];
        for &z in &self.zones {
            if let Some(slot) = sizes.get_mut(z) {
                *slot += 1;
            }
        }
        sizes
    }
}

/// Seeded k-means zone assigner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneAssigner {
    seed: u64,
    max_iterations: usize,
    restarts: usize,
}

impl Default for ZoneAssigner {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}

impl ZoneAssigner {
    pub const DEFAULT_SEED: u64 = 42;
    pub const DEFAULT_MAX_ITERATIONS: usize = 300;

    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            restarts: 1,
        }
    }

    /// Cap on Lloyd iterations per restart
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Number of seeded initializations; the lowest-inertia result wins
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts.max(1);
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Partition `events` into at most `k` zones.
    ///
    /// Never fails: an empty set gives an empty assignment, and fewer events
    /// than `k` reduces the effective zone count while keeping ids in
    /// `[0, k)`. `k = 0` is treated as a single zone.
    pub fn cluster(&self, events: &EventSet, k: usize) -> ZoneAssignment {
        let k = k.max(1);
        if events.is_empty() {
            debug!(k, "No events to cluster");
            return ZoneAssignment::empty(k);
        }

        let points = events.positions();
        let effective_k = k.min(points.len());
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut best: Option<kmeans::Partition> = None;
        for restart in 0..self.restarts {
            let initial = kmeans::kmeans_plus_plus_init(&points, effective_k, &mut rng);
            let partition = kmeans::lloyd(&points, initial, self.max_iterations);
            trace!(
                restart,
                inertia = partition.inertia,
                iterations = partition.iterations,
                "k-means restart finished"
            );
            if best.as_ref().map_or(true, |b| partition.inertia < b.inertia) {
                best = Some(partition);
            }
        }

        let Some(best) = best else {
            return ZoneAssignment::empty(k);
        };

        debug!(
            events = points.len(),
            k,
            effective_k,
            inertia = best.inertia,
            iterations = best.iterations,
            "Zones assigned"
        );

        ZoneAssignment {
            zones: best.assignments,
            k,
            centroids: best.centroids,
            inertia: best.inertia,
            iterations: best.iterations,
        }
    }
}
