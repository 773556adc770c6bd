//! Read-once catalog cache
//!
//! Maps a source identity (usually the catalog path) to its loaded event
//! store. Sources are immutable, so entries are never invalidated. A source
//! that failed to load is cached as unavailable too.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::parser::parse_catalog;
use super::EventStore;
use crate::error::CatalogError;

/// Result of loading a catalog source
#[derive(Debug, Clone)]
pub enum CatalogState {
    /// Source loaded; shared, immutable store
    Ready(Arc<EventStore>),
    /// Source missing or unreadable ("no data available")
    Unavailable(String),
}

impl CatalogState {
    pub fn store(&self) -> Option<&Arc<EventStore>> {
        match self {
            CatalogState::Ready(store) => Some(store),
            CatalogState::Unavailable(_) => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, CatalogState::Ready(_))
    }
}

/// Explicit cache of loaded catalogs keyed by source identity
#[derive(Debug, Default)]
pub struct CatalogCache {
    entries: HashMap<String, CatalogState>,
    /// Optional magnitude floor applied once at load time
    load_floor: Option<f64>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache that keeps only events with `magnitude >= floor` at load
    pub fn with_load_floor(floor: Option<f64>) -> Self {
        Self {
            entries: HashMap::new(),
            load_floor: floor,
        }
    }

    /// Return the cached state for `source`, calling `read` only on the first
    /// request for that source.
    pub fn load<F>(&mut self, source: &str, read: F) -> CatalogState
    where
        F: FnOnce() -> Result<String, CatalogError>,
    {
        if let Some(state) = self.entries.get(source) {
            debug!(source, "Catalog cache hit");
            return state.clone();
        }

        let state = match read().and_then(|text| parse_catalog(&text)) {
            Ok((store, report)) => {
                let store = match self.load_floor {
                    Some(floor) => EventStore::from_events(store.filter(floor).iter().copied()),
                    None => store,
                };
                info!(
                    source,
                    events = store.len(),
                    rows = report.rows,
                    dropped = report.dropped,
                    "Catalog loaded"
                );
                CatalogState::Ready(Arc::new(store))
            }
            Err(e) => {
                warn!(source, error = %e, "Catalog unavailable");
                CatalogState::Unavailable(e.to_string())
            }
        };

        self.entries.insert(source.to_string(), state.clone());
        state
    }

    /// Load a catalog file from disk through the cache
    pub fn load_file(&mut self, path: &Path) -> CatalogState {
        let key = path.display().to_string();
        self.load(&key, || {
            std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                path: path.to_path_buf(),
                source,
            })
        })
    }

    /// Number of cached sources
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "latitude\tlongitude\tmagnitude\tdepth\n\
                           -6.2\t106.8\t2.5\t10\n\
                           -3.1\t128.2\t5.1\t33\n";

    #[test]
    fn test_load_reads_once() {
        let mut cache = CatalogCache::new();
        let mut reads = 0;
        let first = cache.load("a", || {
            reads += 1;
            Ok(CATALOG.to_string())
        });
        assert!(first.is_available());

        let second = cache.load("a", || {
            reads += 1;
            Ok(String::new())
        });
        assert_eq!(reads, 1);
        assert_eq!(second.store().map(|s| s.len()), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let mut cache = CatalogCache::new();
        let path = std::env::temp_dir().join("quake-zones-definitely-missing.tsv");
        let state = cache.load_file(&path);
        assert!(!state.is_available());
        assert!(state.store().is_none());
    }

    #[test]
    fn test_load_file_from_disk() {
        let path = std::env::temp_dir().join(format!("quake-zones-cache-{}.tsv", std::process::id()));
        std::fs::write(&path, CATALOG).unwrap();

        let mut cache = CatalogCache::new();
        let state = cache.load_file(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(state.store().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_load_floor_applied() {
        let mut cache = CatalogCache::with_load_floor(Some(3.0));
        let state = cache.load("floor", || Ok(CATALOG.to_string()));
        let store = state.store().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.iter().next().map(|e| e.magnitude), Some(5.1));
    }

    #[test]
    fn test_bad_header_is_unavailable() {
        let mut cache = CatalogCache::new();
        let state = cache.load("bad", || Ok("lat\tlon\n1\t2\n".to_string()));
        assert!(matches!(state, CatalogState::Unavailable(_)));
    }
}
