//! Experimental data overlay: baseline correction and peak rescaling onto
//! a simulated reference curve.

use std::path::Path;

use crate::error::{Error, Result};

/// Externally measured (x, signal) pairs, in file order.
///
/// x values are used as-is, with no unit conversion: the overlay file must
/// already be in the axis unit currently selected for the render. This is a
/// deliberate contract so existing experimental datasets keep their
/// comparison semantics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlaySeries {
    points: Vec<(f64, f64)>,
}

impl OverlaySeries {
    /// Wraps loaded points.
    #[must_use]
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// The raw (x, y) pairs.
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Baseline-corrects the signal (floor at 0) and rescales it so its
    /// peak matches the reference curve's peak.
    ///
    /// # Errors
    /// - [`Error::NoReferenceCurve`] if `reference` is empty.
    /// - [`Error::EmptyOverlay`] if this series has no points.
    /// - [`Error::FlatOverlay`] if the signal is flat after baseline
    ///   correction (the rescale factor would divide by zero).
    pub fn rescale_to(&self, reference: &[f64]) -> Result<Vec<(f64, f64)>> {
        if reference.is_empty() {
            return Err(Error::NoReferenceCurve);
        }
        if self.points.is_empty() {
            return Err(Error::EmptyOverlay);
        }

        let reference_max = reference.iter().copied().fold(f64::MIN, f64::max);
        let baseline = self
            .points
            .iter()
            .map(|&(_, y)| y)
            .fold(f64::MAX, f64::min);
        let corrected_max = self
            .points
            .iter()
            .map(|&(_, y)| y - baseline)
            .fold(f64::MIN, f64::max);

        if corrected_max == 0.0 {
            return Err(Error::FlatOverlay);
        }

        let factor = reference_max / corrected_max;
        Ok(self
            .points
            .iter()
            .map(|&(x, y)| (x, (y - baseline) * factor))
            .collect())
    }
}

/// Seam for loading experimental overlay files.
///
/// The core never touches the filesystem; the io layer supplies an
/// implementation for whitespace-delimited two-column text files.
pub trait OverlaySource {
    /// Loads an overlay file into an ordered point series.
    ///
    /// # Errors
    /// Returns [`Error::Overlay`] if the file cannot be read or parsed as
    /// two numeric columns.
    fn load(&self, path: &Path) -> Result<OverlaySeries>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rescale_matches_reference_peak() {
        let series = OverlaySeries::new(vec![(0.1, 3.0), (0.2, 7.0), (0.3, 5.0)]);
        let reference = [0.2, 0.9, 0.4];
        let rescaled = series.rescale_to(&reference).unwrap();

        let max_y = rescaled.iter().map(|&(_, y)| y).fold(f64::MIN, f64::max);
        let min_y = rescaled.iter().map(|&(_, y)| y).fold(f64::MAX, f64::min);
        assert_relative_eq!(max_y, 0.9, max_relative = 1e-12);
        assert_relative_eq!(min_y, 0.0);
    }

    #[test]
    fn test_rescale_leaves_x_untouched() {
        let series = OverlaySeries::new(vec![(0.12, 1.0), (0.34, 2.0)]);
        let rescaled = series.rescale_to(&[1.0]).unwrap();
        assert_eq!(rescaled[0].0, 0.12);
        assert_eq!(rescaled[1].0, 0.34);
    }

    #[test]
    fn test_rescale_preserves_shape() {
        // (y - min) scaling is affine, so ratios of corrected values hold.
        let series = OverlaySeries::new(vec![(0.0, 2.0), (1.0, 4.0), (2.0, 6.0)]);
        let rescaled = series.rescale_to(&[1.0]).unwrap();
        assert_relative_eq!(rescaled[1].1, rescaled[2].1 / 2.0, max_relative = 1e-12);
        assert_relative_eq!(rescaled[0].1, 0.0);
    }

    #[test]
    fn test_empty_reference_is_precondition_error() {
        let series = OverlaySeries::new(vec![(0.1, 1.0)]);
        assert!(matches!(series.rescale_to(&[]), Err(Error::NoReferenceCurve)));
    }

    #[test]
    fn test_empty_overlay_rejected() {
        let series = OverlaySeries::default();
        assert!(matches!(series.rescale_to(&[1.0]), Err(Error::EmptyOverlay)));
    }

    #[test]
    fn test_flat_overlay_rejected() {
        let series = OverlaySeries::new(vec![(0.1, 2.5), (0.2, 2.5), (0.3, 2.5)]);
        assert!(matches!(series.rescale_to(&[1.0]), Err(Error::FlatOverlay)));
    }
}
