//! Renderable map structures
//!
//! - Marker: one styled circle marker with its popup text
//! - MapView: initial viewport and tile set
//! - LegendEntry: zone id and its color
//! - RenderedMap: everything a map sink needs to draw one pipeline run

use serde::Serialize;

use crate::core::Event;
use crate::theme::{style, Color};

// ============================================================================
// Marker
// ============================================================================

/// Circle marker for one event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// (latitude, longitude)
    pub location: [f64; 2],
    /// Radius, equal to the event magnitude (no scaling)
    pub radius: f64,
    /// Border color
    pub color: Color,
    pub fill: bool,
    pub fill_color: Color,
    pub fill_opacity: f64,
    /// Shown when the marker is clicked
    pub popup: String,
    /// Zone the event belongs to
    pub zone: usize,
}

impl Marker {
    pub fn new(event: &Event, zone: usize, color: Color) -> Self {
        Self {
            location: [event.latitude, event.longitude],
            radius: event.magnitude,
            color,
            fill: true,
            fill_color: color,
            fill_opacity: style::FILL_OPACITY,
            popup: popup_text(event),
            zone,
        }
    }
}

/// Popup annotation with magnitude and depth. Whole values keep their
/// fractional digit (`10.0`, not `10`).
pub fn popup_text(event: &Event) -> String {
    format!("Mag: {:?} | Depth: {:?} km", event.magnitude, event.depth)
}

// ============================================================================
// MapView / Legend
// ============================================================================

/// Initial viewport of the map sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tiles: String,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: style::MAP_CENTER,
            zoom: style::MAP_ZOOM,
            tiles: style::MAP_TILES.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegendEntry {
    pub zone: usize,
    pub color: Color,
    /// Events of this zone among the rendered markers
    pub markers: usize,
}

// ============================================================================
// RenderedMap
// ============================================================================

/// Output of one render: pure data, no drawing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMap {
    pub view: MapView,
    pub markers: Vec<Marker>,
    pub legend: Vec<LegendEntry>,
    /// Events in the set before the display cap was applied
    pub total_events: usize,
    pub caption: String,
}

impl RenderedMap {
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Whether the display cap dropped events
    pub fn is_truncated(&self) -> bool {
        self.markers.len() < self.total_events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::colors;

    #[test]
    fn test_marker_geometry() {
        let event = Event::new(-6.2, 106.8, 5.5, 33.0);
        let marker = Marker::new(&event, 3, colors::YELLOW);
        assert_eq!(marker.location, [-6.2, 106.8]);
        assert_eq!(marker.radius, 5.5);
        assert_eq!(marker.color, colors::YELLOW);
        assert_eq!(marker.fill_color, colors::YELLOW);
        assert!(marker.fill);
        assert_eq!(marker.fill_opacity, 0.7);
        assert_eq!(marker.zone, 3);
    }

    #[test]
    fn test_popup_text() {
        assert_eq!(popup_text(&Event::new(0.0, 0.0, 4.5, 10.0)), "Mag: 4.5 | Depth: 10.0 km");
        assert_eq!(popup_text(&Event::new(0.0, 0.0, 6.0, 0.0)), "Mag: 6.0 | Depth: 0.0 km");
        assert_eq!(popup_text(&Event::new(0.0, 0.0, 7.2, 33.5)), "Mag: 7.2 | Depth: 33.5 km");
    }

    #[test]
    fn test_default_view() {
        let view = MapView::default();
        assert_eq!(view.center, [-2.5, 118.0]);
        assert_eq!(view.zoom, 5);
        assert_eq!(view.tiles, "CartoDB dark_matter");
    }
}
