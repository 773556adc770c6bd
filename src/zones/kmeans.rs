//! K-means over planar (latitude, longitude) points.
//!
//! Distances are squared Euclidean on raw degree coordinates, with no
//! geodesic correction. Initialization is k-means++ drawn from a caller
//! supplied seeded RNG.

use rand::rngs::StdRng;
use rand::Rng;

pub type Point = [f64; 2];

/// One converged (or iteration-capped) partition
#[derive(Debug, Clone)]
pub struct Partition {
    pub assignments: Vec<usize>,
    pub centroids: Vec<Point>,
    pub inertia: f64,
    pub iterations: usize,
}

#[inline]
pub fn squared_distance(a: &Point, b: &Point) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Index and squared distance of the closest centroid. Ties go to the
/// lowest index.
pub fn nearest_centroid(point: &Point, centroids: &[Point]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (idx, centroid) in centroids.iter().enumerate() {
        let dist = squared_distance(point, centroid);
        if dist < best.1 {
            best = (idx, dist);
        }
    }
    best
}

/// Pick `k` initial centroids with k-means++ seeding.
///
/// Each next centroid is drawn with probability proportional to its squared
/// distance from the nearest centroid chosen so far. When every point already
/// sits on a centroid, the first point not yet chosen is used, or a duplicate
/// of the first point once none remain.
pub fn kmeans_plus_plus_init(points: &[Point], k: usize, rng: &mut StdRng) -> Vec<Point> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    if n == 0 || k == 0 {
        return centroids;
    }

    centroids.push(points[rng.random_range(0..n)]);
    let mut min_distances = vec![f64::INFINITY; n];

    while centroids.len() < k {
        let last = centroids[centroids.len() - 1];
        for (dist, point) in min_distances.iter_mut().zip(points) {
            *dist = dist.min(squared_distance(point, &last));
        }

        let total: f64 = min_distances.iter().sum();
        let next = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            weighted_pick(&min_distances, target)
        } else {
            min_distances.iter().position(|&d| d > 0.0).unwrap_or(0)
        };
        centroids.push(points[next]);
    }

    centroids
}

/// Index whose cumulative weight first exceeds `target`, skipping zero
/// weights. Falls back to the last positive weight for rounding at the top
/// of the range.
fn weighted_pick(weights: &[f64], target: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (idx, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        cumulative += w;
        last_positive = idx;
        if cumulative > target {
            return idx;
        }
    }
    last_positive
}

/// Assign every point to its nearest centroid
pub fn assign(points: &[Point], centroids: &[Point]) -> Vec<usize> {
    points
        .iter()
        .map(|p| nearest_centroid(p, centroids).0)
        .collect()
}

/// Mean of each cluster; an empty cluster keeps its previous centroid
pub fn compute_centroids(points: &[Point], assignments: &[usize], previous: &[Point]) -> Vec<Point> {
    let k = previous.len();
    let mut sums = vec![[0.0f64; 2]; k];
    let mut counts = vec![0usize; k];

    for (point, &cluster) in points.iter().zip(assignments) {
        counts[cluster] += 1;
        sums[cluster][0] += point[0];
        sums[cluster][1] += point[1];
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((sum, count), prev)| {
            if count > 0 {
                [sum[0] / count as f64, sum[1] / count as f64]
            } else {
                *prev
            }
        })
        .collect()
}

/// Within-cluster sum of squared distances
pub fn compute_inertia(points: &[Point], assignments: &[usize], centroids: &[Point]) -> f64 {
    points
        .iter()
        .zip(assignments)
        .map(|(p, &c)| squared_distance(p, &centroids[c]))
        .sum()
}

/// Lloyd iterations from the given centroids until assignments stop changing
/// or `max_iterations` updates have run. The returned assignments always
/// match the returned centroids.
pub fn lloyd(points: &[Point], initial: Vec<Point>, max_iterations: usize) -> Partition {
    let mut centroids = initial;
    let mut assignments = assign(points, &centroids);
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;
        centroids = compute_centroids(points, &assignments, &centroids);
        let next = assign(points, &centroids);
        if next == assignments {
            break;
        }
        assignments = next;
    }

    let inertia = compute_inertia(points, &assignments, &centroids);
    Partition {
        assignments,
        centroids,
        inertia,
        iterations,
    }
}
