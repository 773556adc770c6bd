//! Earthquake zone map
//!
//! Converts zoned events into circle markers with popups. Drawing itself is
//! left to whatever map library consumes [`RenderedMap`].

mod data;
mod renderer;

pub use data::{popup_text, LegendEntry, MapView, Marker, RenderedMap};
pub use renderer::{render, MapRenderer, DEFAULT_DISPLAY_CAP};
