//! Descriptive statistics for the side panel

use serde::Serialize;

use crate::core::{Event, EventSet};

/// Rows shown in the raw data preview
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Summary of one numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; undefined for a single value
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub magnitude: ColumnSummary,
    pub depth: ColumnSummary,
    pub latitude: ColumnSummary,
    pub longitude: ColumnSummary,
}

/// Statistics over a filtered set
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Statistics {
    /// Nothing to describe
    NoData,
    Summary(Summary),
}

impl Statistics {
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            Statistics::NoData => None,
            Statistics::Summary(s) => Some(s),
        }
    }
}

/// Describe magnitude, depth, latitude and longitude of `events`
pub fn describe(events: &EventSet) -> Statistics {
    match (
        column(events, |e| e.magnitude),
        column(events, |e| e.depth),
        column(events, |e| e.latitude),
        column(events, |e| e.longitude),
    ) {
        (Some(magnitude), Some(depth), Some(latitude), Some(longitude)) => {
            Statistics::Summary(Summary {
                magnitude,
                depth,
                latitude,
                longitude,
            })
        }
        _ => Statistics::NoData,
    }
}

/// First `rows` events for the raw data panel
pub fn preview(events: &EventSet, rows: usize) -> Vec<Event> {
    events.head(rows).to_vec()
}

fn column<F: Fn(&Event) -> f64>(events: &EventSet, field: F) -> Option<ColumnSummary> {
    summarize(events.iter().map(field).collect())
}

fn summarize(mut values: Vec<f64>) -> Option<ColumnSummary> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Some(ColumnSummary {
        count: n,
        mean,
        std,
        min: values[0],
        p25: quantile(&values, 0.25),
        p50: quantile(&values, 0.50),
        p75: quantile(&values, 0.75),
        max: values[n - 1],
    })
}

/// Linear interpolation between closest ranks of a sorted, non-empty slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
