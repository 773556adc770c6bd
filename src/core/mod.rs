//! Catalog core - event records, storage, parsing and the load cache

pub mod cache;
pub mod data;
pub mod events;
pub mod parser;

pub use cache::{CatalogCache, CatalogState};
pub use data::EventStore;
pub use events::{Event, EventSet, REQUIRED_COLUMNS};
pub use parser::{parse_catalog, parse_catalog_with, ParseReport};
