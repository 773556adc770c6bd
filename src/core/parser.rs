//! Catalog parser for tab-separated earthquake catalogs
//!
//! The header row locates the required columns by name; all other columns
//! are ignored. Rows with a missing or unparsable required field are dropped,
//! never failing the whole catalog.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, trace, warn};

use super::events::{Event, REQUIRED_COLUMNS};
use super::EventStore;
use crate::error::CatalogError;

/// Field delimiter of the catalog format
pub const DEFAULT_DELIMITER: u8 = b'\t';

/// Row accounting for one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Data rows seen (blank lines excluded)
    pub rows: usize,
    /// Rows dropped for missing or malformed required fields
    pub dropped: usize,
}

/// Parse a catalog using the default tab delimiter
pub fn parse_catalog(text: &str) -> Result<(EventStore, ParseReport), CatalogError> {
    parse_catalog_with(text, DEFAULT_DELIMITER)
}

/// Parse a catalog with an explicit delimiter.
///
/// Fields may be double-quoted; a quoted field can contain the delimiter.
pub fn parse_catalog_with(
    text: &str,
    delimiter: u8,
) -> Result<(EventStore, ParseReport), CatalogError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if is_blank(&headers) {
        return Err(CatalogError::MissingHeader);
    }
    let columns = locate_columns(&headers)?;
    debug!(?columns, "Catalog header parsed");

    let mut report = ParseReport::default();
    let mut events = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                report.rows += 1;
                report.dropped += 1;
                trace!(error = %e, "Dropped unreadable row");
                continue;
            }
        };
        if is_blank(&record) {
            continue;
        }

        report.rows += 1;
        match parse_record(&record, &columns) {
            Some(event) => events.push(event),
            None => {
                report.dropped += 1;
                let line = record.position().map(|p| p.line());
                trace!(?line, "Dropped malformed row");
            }
        }
    }

    if report.dropped > 0 {
        warn!(
            dropped = report.dropped,
            rows = report.rows,
            "Catalog rows dropped for missing fields"
        );
    }

    Ok((EventStore::from_events(events), report))
}

/// Column indices of latitude, longitude, magnitude, depth
fn locate_columns(headers: &StringRecord) -> Result<[usize; 4], CatalogError> {
    let mut indices = [0usize; 4];
    for (slot, required) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|name| name.eq_ignore_ascii_case(required))
            .ok_or(CatalogError::MissingColumn(required))?;
    }
    Ok(indices)
}

fn parse_record(record: &StringRecord, columns: &[usize; 4]) -> Option<Event> {
    let field = |idx: usize| -> Option<f64> {
        let raw = record.get(idx)?;
        if is_missing(raw) {
            return None;
        }
        raw.parse::<f64>().ok()
    };

    Some(Event::new(
        field(columns[0])?,
        field(columns[1])?,
        field(columns[2])?,
        field(columns[3])?,
    ))
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(str::is_empty)
}

/// Markers a spreadsheet export uses for an empty cell
fn is_missing(raw: &str) -> bool {
    raw.is_empty()
        || raw.eq_ignore_ascii_case("nan")
        || raw.eq_ignore_ascii_case("na")
        || raw.eq_ignore_ascii_case("null")
        || raw.eq_ignore_ascii_case("none")
}
