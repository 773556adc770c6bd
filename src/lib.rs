//! Earthquake zoning - filter, cluster and map a seismic catalog
//!
//! Pipeline for one parameter change:
//! - Filter: events with magnitude at or above the threshold
//! - Cluster: seeded k-means over (latitude, longitude) into zones
//! - Render: one colored circle marker per event, capped to the newest events
//! - Describe: summary statistics of the filtered set

pub mod config;
pub mod core;
pub mod error;
pub mod map;
pub mod pipeline;
pub mod stats;
pub mod theme;
pub mod zones;

pub use crate::config::Config;
pub use crate::core::{CatalogCache, CatalogState, Event, EventSet, EventStore};
pub use crate::error::{CatalogError, PaletteError, ParamError};
pub use crate::map::{render, MapRenderer, Marker, RenderedMap};
pub use crate::pipeline::{Outcome, Params, Pipeline, Report};
pub use crate::stats::{describe, Statistics};
pub use crate::theme::{Color, Palette};
pub use crate::zones::{ZoneAssigner, ZoneAssignment};
