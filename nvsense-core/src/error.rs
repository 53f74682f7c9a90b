//! Error types for nvsense-core.

use thiserror::Error;

/// Result type alias for nvsense operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for nvsense operations.
///
/// An absent simulation row is *not* an error: `CurveStore::lookup` returns
/// `Option::None` for that case, since most parameter combinations were
/// never simulated.
#[derive(Error, Debug)]
pub enum Error {
    /// Markers requested at zero field strength (divide by zero).
    #[error("field strength must be nonzero to compare with gyromagnetic ratios")]
    ZeroField,

    /// Marker label absent from the gyromagnetic ratio table.
    #[error("unknown isotope label: {0}")]
    UnknownIsotope(String),

    /// Overlay rescale requested but this render found no simulated curve.
    #[error("no simulated reference curve available for overlay rescaling")]
    NoReferenceCurve,

    /// Overlay series contains no points.
    #[error("experimental overlay contains no data points")]
    EmptyOverlay,

    /// Overlay series is flat after baseline correction (rescale would
    /// divide by zero).
    #[error("experimental overlay is flat; cannot rescale to reference peak")]
    FlatOverlay,

    /// Overlay file malformed or unreadable.
    #[error("overlay data error: {0}")]
    Overlay(String),

    /// Stored probability series with a non-canonical length.
    #[error("probability series has {actual} points, expected {expected}")]
    SeriesLength { expected: usize, actual: usize },

    /// Duplicate isotope label in the gyromagnetic ratio table.
    #[error("duplicate isotope label: {0}")]
    DuplicateIsotope(String),
}
