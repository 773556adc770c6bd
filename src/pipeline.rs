//! Filter → cluster → render pipeline
//!
//! One run per parameter change. Each run is a pure function of the loaded
//! catalog and the parameters; nothing carries over between runs.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::{CatalogState, Event, EventStore};
use crate::error::ParamError;
use crate::map::{MapRenderer, MapView, RenderedMap, DEFAULT_DISPLAY_CAP};
use crate::stats::{describe, preview, Statistics, DEFAULT_PREVIEW_ROWS};
use crate::theme::Palette;
use crate::zones::{ZoneAssigner, ZoneAssignment};

/// Recommended slider ranges of the UI shell
pub const MAGNITUDE_RANGE: (f64, f64) = (3.0, 9.0);
pub const ZONES_RANGE: (usize, usize) = (2, 10);

/// Parameters of one pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub min_magnitude: f64,
    pub zones: usize,
    /// Markers drawn at most; zero or negative draws none
    pub display_cap: i64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            min_magnitude: 4.5,
            zones: 5,
            display_cap: DEFAULT_DISPLAY_CAP as i64,
        }
    }
}

impl Params {
    /// Reject unusable values; values outside the recommended ranges are
    /// accepted with a warning.
    pub fn validate(&self) -> Result<(), ParamError> {
        if !self.min_magnitude.is_finite() {
            return Err(ParamError::NonFiniteMagnitude(self.min_magnitude));
        }
        if self.zones == 0 {
            return Err(ParamError::ZeroZones);
        }

        let (mag_lo, mag_hi) = MAGNITUDE_RANGE;
        if !(mag_lo..=mag_hi).contains(&self.min_magnitude) {
            warn!(
                min_magnitude = self.min_magnitude,
                "Magnitude threshold outside recommended range"
            );
        }
        let (k_lo, k_hi) = ZONES_RANGE;
        if !(k_lo..=k_hi).contains(&self.zones) {
            warn!(zones = self.zones, "Zone count outside recommended range");
        }
        Ok(())
    }

    /// Display cap as a marker count, with `display_cap <= 0` clamped to 0
    pub fn marker_cap(&self) -> usize {
        if self.display_cap <= 0 {
            0
        } else {
            usize::try_from(self.display_cap).unwrap_or(usize::MAX)
        }
    }
}

/// Everything produced by a run that had events to show
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub params: Params,
    pub headline: String,
    /// Filtered event count
    pub events: usize,
    pub zones: ZoneAssignment,
    pub map: RenderedMap,
    pub stats: Statistics,
    /// Head of the filtered set for the raw data panel
    pub preview: Vec<Event>,
}

/// Result of one run. "No data" (source unavailable) and "no matches"
/// (valid empty filter result) are distinct states.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    NoData { reason: String },
    NoMatches { min_magnitude: f64, notice: String },
    Rendered(Box<Report>),
}

impl Outcome {
    pub fn report(&self) -> Option<&Report> {
        match self {
            Outcome::Rendered(report) => Some(report),
            _ => None,
        }
    }
}

/// Configured pipeline: zone assigner, palette and map viewport
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    assigner: ZoneAssigner,
    palette: Palette,
    view: MapView,
}

impl Pipeline {
    pub fn new(assigner: ZoneAssigner, palette: Palette) -> Self {
        Self {
            assigner,
            palette,
            view: MapView::default(),
        }
    }

    pub fn with_view(mut self, view: MapView) -> Self {
        self.view = view;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Run against a cached catalog; an unavailable source short-circuits
    /// before filtering.
    pub fn run(&self, catalog: &CatalogState, params: &Params) -> Result<Outcome, ParamError> {
        params.validate()?;
        match catalog {
            CatalogState::Ready(store) => Ok(self.run_validated(store, params)),
            CatalogState::Unavailable(reason) => {
                warn!(reason = %reason, "No data available");
                Ok(Outcome::NoData {
                    reason: reason.clone(),
                })
            }
        }
    }

    /// Run against an event store directly
    pub fn run_store(&self, store: &EventStore, params: &Params) -> Result<Outcome, ParamError> {
        params.validate()?;
        Ok(self.run_validated(store, params))
    }

    fn run_validated(&self, store: &EventStore, params: &Params) -> Outcome {
        let started = Instant::now();

        let filtered = store.filter(params.min_magnitude);
        debug!(
            min_magnitude = params.min_magnitude,
            selected = filtered.len(),
            "Filter stage done"
        );

        if filtered.is_empty() {
            info!(min_magnitude = params.min_magnitude, "No matching events");
            return Outcome::NoMatches {
                min_magnitude: params.min_magnitude,
                notice: "No earthquakes match the selected magnitude.".to_string(),
            };
        }

        let zones = self.assigner.cluster(&filtered, params.zones);
        let map = MapRenderer::new(params.marker_cap())
            .with_view(self.view.clone())
            .render(&filtered, &zones, &self.palette);
        let stats = describe(&filtered);

        info!(
            events = filtered.len(),
            zones = params.zones,
            markers = map.marker_count(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Pipeline run complete"
        );

        Outcome::Rendered(Box::new(Report {
            params: *params,
            headline: format!(
                "Showing {} earthquakes with magnitude >= {}",
                filtered.len(),
                params.min_magnitude
            ),
            events: filtered.len(),
            zones,
            map,
            stats,
            preview: preview(&filtered, DEFAULT_PREVIEW_ROWS),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn synthetic() -> EventStore {
        EventStore::from_events([
            Event::new(-6.2, 106.8, 3.0, 10.0),
            Event::new(-7.8, 110.4, 4.5, 25.0),
            Event::new(-3.1, 128.2, 5.0, 33.0),
            Event::new(-0.9, 119.9, 6.0, 60.0),
            Event::new(3.6, 98.7, 7.2, 120.0),
        ])
    }

    #[test]
    fn test_end_to_end_synthetic() {
        let params = Params {
            min_magnitude: 4.5,
            zones: 2,
            display_cap: 1000,
        };
        let outcome = Pipeline::default().run_store(&synthetic(), &params).unwrap();
        let report = outcome.report().expect("events to render");

        assert_eq!(report.events, 4);
        assert_eq!(report.zones.len(), 4);
        assert!(report.zones.zones().iter().all(|&z| z < 2));
        assert_eq!(report.map.marker_count(), 4);
        assert_eq!(report.preview.len(), 4);
        assert_eq!(report.headline, "Showing 4 earthquakes with magnitude >= 4.5");
        let stats = report.stats.summary().unwrap();
        assert_eq!(stats.magnitude.min, 4.5);
    }

    #[test]
    fn test_no_matches_is_distinct_from_no_data() {
        let params = Params {
            min_magnitude: 8.0,
            ..Params::default()
        };
        let ready = CatalogState::Ready(Arc::new(synthetic()));
        let outcome = Pipeline::default().run(&ready, &params).unwrap();
        assert!(matches!(outcome, Outcome::NoMatches { min_magnitude, .. } if min_magnitude == 8.0));

        let missing = CatalogState::Unavailable("file not found".to_string());
        let outcome = Pipeline::default().run(&missing, &params).unwrap();
        assert!(matches!(outcome, Outcome::NoData { .. }));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let store = synthetic();
        let zero = Params {
            zones: 0,
            ..Params::default()
        };
        assert_eq!(
            Pipeline::default().run_store(&store, &zero),
            Err(ParamError::ZeroZones)
        );

        let nan = Params {
            min_magnitude: f64::NAN,
            ..Params::default()
        };
        assert!(matches!(
            Pipeline::default().run_store(&store, &nan),
            Err(ParamError::NonFiniteMagnitude(_))
        ));
    }

    #[test]
    fn test_display_cap_applies_to_markers_only() {
        let params = Params {
            min_magnitude: 3.0,
            zones: 3,
            display_cap: 2,
        };
        let outcome = Pipeline::default().run_store(&synthetic(), &params).unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.events, 5);
        assert_eq!(report.zones.len(), 5);
        assert_eq!(report.map.marker_count(), 2);
        assert_eq!(report.map.markers[1].radius, 7.2);
        assert_eq!(report.map.markers[0].radius, 6.0);
    }

    #[test]
    fn test_negative_display_cap_renders_no_markers() {
        for cap in [0, -1, i64::MIN] {
            let params = Params {
                min_magnitude: 3.0,
                zones: 2,
                display_cap: cap,
            };
            assert_eq!(params.marker_cap(), 0);
            let outcome = Pipeline::default().run_store(&synthetic(), &params).unwrap();
            let report = outcome.report().unwrap();
            assert_eq!(report.events, 5);
            assert_eq!(report.map.marker_count(), 0);
            assert_eq!(report.map.total_events, 5);
        }
    }

    #[test]
    fn test_params_accept_negative_display_cap_from_json() {
        let params: Params = serde_json::from_str(r#"{"display_cap": -1}"#).unwrap();
        assert_eq!(params.display_cap, -1);
        assert_eq!(params.marker_cap(), 0);
        assert_eq!(params.zones, 5);
    }

    #[test]
    fn test_runs_are_repeatable() {
        let pipeline = Pipeline::new(ZoneAssigner::new(1234), Palette::default());
        let store = synthetic();
        let params = Params {
            min_magnitude: 3.0,
            zones: 3,
            display_cap: 10,
        };
        assert_eq!(
            pipeline.run_store(&store, &params),
            pipeline.run_store(&store, &params)
        );
    }

    #[test]
    fn test_outcome_serializes_status() {
        let outcome = Outcome::NoMatches {
            min_magnitude: 9.0,
            notice: "none".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "no_matches");

        let rendered = Pipeline::default()
            .run_store(&synthetic(), &Params::default())
            .unwrap();
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["status"], "rendered");
        assert_eq!(json["map"]["markers"][0]["color"].as_str().map(|s| s.len()), Some(7));
    }
}
