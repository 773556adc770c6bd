//! Error types for the zoning pipeline.
//!
//! Only source-level failures and invalid parameters are errors. Empty
//! filter results and degenerate clustering input are valid outcomes.

use std::path::PathBuf;

/// The catalog source could not be read as a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The file is missing or unreadable.
    #[error("cannot read catalog {path}: {source}")]
    Io {
        /// Source path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The source has no header line.
    #[error("catalog has no header row")]
    MissingHeader,

    /// A required column is absent from the header.
    #[error("catalog is missing required column `{0}`")]
    MissingColumn(&'static str),

    /// The header row could not be decoded.
    #[error("cannot read catalog header: {0}")]
    Csv(#[from] csv::Error),
}

/// Pipeline parameters rejected before a run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// Zone count must be at least one.
    #[error("zone count must be at least 1")]
    ZeroZones,

    /// Magnitude threshold must be a finite number.
    #[error("minimum magnitude must be finite, got {0}")]
    NonFiniteMagnitude(f64),
}

/// Palette construction failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PaletteError {
    /// A palette needs at least one color.
    #[error("palette must contain at least one color")]
    Empty,

    /// A color string is not `#RRGGBB`.
    #[error("invalid hex color `{0}`")]
    InvalidHex(String),
}
