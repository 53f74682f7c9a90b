//! Plain-text experimental overlay files.
//!
//! Two whitespace- or tab-delimited numeric columns (x, signal), no header
//! row. Blank lines are skipped; anything else is a format error.

use std::fs;
use std::path::Path;

use nvsense_core::{Error as CoreError, OverlaySeries, OverlaySource};

/// Reader for two-column text overlay files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOverlayReader;

impl TextOverlayReader {
    /// Creates a reader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl OverlaySource for TextOverlayReader {
    fn load(&self, path: &Path) -> nvsense_core::Result<OverlaySeries> {
        let text = fs::read_to_string(path)
            .map_err(|e| CoreError::Overlay(format!("{}: {e}", path.display())))?;
        parse_columns(&text)
    }
}

fn parse_columns(text: &str) -> nvsense_core::Result<OverlaySeries> {
    let mut points = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(x), Some(y), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(CoreError::Overlay(format!(
                "line {}: expected exactly two columns",
                line_no + 1
            )));
        };
        let x: f64 = x.parse().map_err(|_| {
            CoreError::Overlay(format!("line {}: invalid number {x:?}", line_no + 1))
        })?;
        let y: f64 = y.parse().map_err(|_| {
            CoreError::Overlay(format!("line {}: invalid number {y:?}", line_no + 1))
        })?;
        points.push((x, y));
    }
    Ok(OverlaySeries::new(points))
}
