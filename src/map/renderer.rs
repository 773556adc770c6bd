//! Map renderer: zoned events to styled markers.
//!
//! Under load only the last `display_cap` events in source order are drawn.
//! This is a reproducible tail truncation, not a statistical sample.

use tracing::{debug, warn};

use super::data::{LegendEntry, MapView, Marker, RenderedMap};
use crate::core::EventSet;
use crate::theme::Palette;
use crate::zones::ZoneAssignment;

/// Default display cap for marker output
pub const DEFAULT_DISPLAY_CAP: usize = 1000;

/// Marker renderer with a fixed viewport and display cap
#[derive(Debug, Clone, PartialEq)]
pub struct MapRenderer {
    view: MapView,
    display_cap: usize,
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY_CAP)
    }
}

impl MapRenderer {
    pub fn new(display_cap: usize) -> Self {
        Self {
            view: MapView::default(),
            display_cap,
        }
    }

    pub fn with_view(mut self, view: MapView) -> Self {
        self.view = view;
        self
    }

    pub fn display_cap(&self) -> usize {
        self.display_cap
    }

    pub fn render(&self, events: &EventSet, zones: &ZoneAssignment, palette: &Palette) -> RenderedMap {
        render_with_view(self.view.clone(), events, zones, palette, self.display_cap)
    }
}

/// Render with the default viewport
pub fn render(
    events: &EventSet,
    zones: &ZoneAssignment,
    palette: &Palette,
    display_cap: usize,
) -> RenderedMap {
    render_with_view(MapView::default(), events, zones, palette, display_cap)
}

fn render_with_view(
    view: MapView,
    events: &EventSet,
    zones: &ZoneAssignment,
    palette: &Palette,
    display_cap: usize,
) -> RenderedMap {
    let total = events.len();
    if zones.len() != total && !zones.is_empty() {
        warn!(
            events = total,
            zones = zones.len(),
            "Zone assignment does not match event set"
        );
    }

    // Tail window: the last `display_cap` events keep their source order
    let start = total.saturating_sub(display_cap);
    let mut legend: Vec<LegendEntry> = (0..zones.k())
        .map(|zone| LegendEntry {
            zone,
            color: palette.color_for(zone),
            markers: 0,
        })
        .collect();

    let markers: Vec<Marker> = events
        .iter()
        .enumerate()
        .skip(start)
        .filter_map(|(idx, event)| {
            let zone = zones.zone_of(idx)?;
            if let Some(entry) = legend.get_mut(zone) {
                entry.markers += 1;
            }
            Some(Marker::new(event, zone, palette.color_for(zone)))
        })
        .collect();

    debug!(
        total,
        rendered = markers.len(),
        display_cap,
        "Map rendered"
    );

    RenderedMap {
        view,
        markers,
        legend,
        total_events: total,
        caption: format!("Distribution map of {} earthquake zones.", zones.k()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Event, EventStore};
    use crate::theme::colors;
    use crate::zones::ZoneAssigner;

    fn events(n: usize) -> EventSet {
        EventStore::from_events(
            (0..n).map(|i| Event::new(-(i as f64), 100.0 + i as f64, 4.0 + i as f64 * 0.1, 10.0)),
        )
        .filter(0.0)
    }

    fn zoned(n: usize, k: usize) -> (EventSet, ZoneAssignment) {
        let set = events(n);
        let zones = ZoneAssigner::default().cluster(&set, k);
        (set, zones)
    }

    #[test]
    fn test_zero_cap_renders_nothing() {
        let (set, zones) = zoned(5, 2);
        let map = render(&set, &zones, &Palette::default(), 0);
        assert_eq!(map.marker_count(), 0);
        assert_eq!(map.total_events, 5);
        assert!(map.is_truncated());
    }

    #[test]
    fn test_under_cap_renders_all() {
        let (set, zones) = zoned(5, 2);
        for cap in [5, 6, 1000] {
            let map = render(&set, &zones, &Palette::default(), cap);
            assert_eq!(map.marker_count(), 5);
            assert!(!map.is_truncated());
        }
    }

    #[test]
    fn test_cap_keeps_tail_in_order() {
        let (set, zones) = zoned(3, 1);
        let map = render(&set, &zones, &Palette::default(), 2);
        let locations: Vec<[f64; 2]> = map.markers.iter().map(|m| m.location).collect();
        let expected: Vec<[f64; 2]> = set.iter().skip(1).map(|e| e.position()).collect();
        assert_eq!(locations, expected);
    }

    #[test]
    fn test_marker_colors_follow_zones() {
        let (set, zones) = zoned(8, 3);
        let palette = Palette::default();
        let map = render(&set, &zones, &palette, 100);
        for (idx, marker) in map.markers.iter().enumerate() {
            let zone = zones.zone_of(idx).unwrap();
            assert_eq!(marker.zone, zone);
            assert_eq!(marker.color, palette.color_for(zone));
            assert_eq!(marker.radius, set.get(idx).unwrap().magnitude);
        }
    }

    #[test]
    fn test_large_k_wraps_palette() {
        let (set, _) = zoned(2, 1);
        let zones = ZoneAssigner::default().cluster(&set, 25);
        let palette = Palette::new(vec![colors::RED, colors::BLUE]).unwrap();
        let map = render(&set, &zones, &palette, 10);
        assert_eq!(map.legend.len(), 25);
        assert_eq!(map.legend[24].color, colors::RED);
        assert_eq!(map.legend[23].color, colors::BLUE);
        assert_eq!(map.legend.iter().map(|l| l.markers).sum::<usize>(), 2);
    }

    #[test]
    fn test_empty_assignment_renders_nothing() {
        let set = EventSet::empty();
        let zones = ZoneAssigner::default().cluster(&set, 4);
        let map = MapRenderer::default().render(&set, &zones, &Palette::default());
        assert!(map.markers.is_empty());
        assert_eq!(map.legend.len(), 4);
        assert_eq!(map.caption, "Distribution map of 4 earthquake zones.");
    }
}
