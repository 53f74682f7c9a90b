//! Resonance marker positions from gyromagnetic ratios.
//!
//! A nuclear species with gyromagnetic ratio γ (MHz/T) in field B0
//! resonates at pulse spacing τ = 1/(2·γ·B0). Ratios are stored per tesla
//! while fields are selected in millitesla, and γ is folded into the
//! selected presentation unit, so the full form is
//! τ = 1 / (2 · (γ / mult) · B0_mT · 1e-3).

use crate::axis::{AxisDomain, UnitScale};
use crate::constants::ReferenceConstants;
use crate::error::{Error, Result};

/// A labeled vertical marker on the render axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Isotope label, e.g. `"1-H"`.
    pub label: String,
    /// Position on the x axis, in the render's domain and unit scale.
    pub position: f64,
}

/// Computes marker positions for the selected isotope labels.
///
/// Output preserves the order of `labels` so the caller's color assignment
/// stays stable. An empty label list yields an empty marker list for any
/// field strength.
///
/// # Errors
/// - [`Error::ZeroField`] if `field_mt == 0` with at least one label
///   selected (the position would divide by zero).
/// - [`Error::UnknownIsotope`] if a label is absent from the constants.
pub fn marker_positions(
    constants: &ReferenceConstants,
    field_mt: f64,
    scale: UnitScale,
    domain: AxisDomain,
    labels: &[String],
) -> Result<Vec<Marker>> {
    if labels.is_empty() {
        return Ok(Vec::new());
    }
    if field_mt == 0.0 {
        return Err(Error::ZeroField);
    }

    labels
        .iter()
        .map(|label| {
            let gamma = constants
                .ratio(label)
                .ok_or_else(|| Error::UnknownIsotope(label.clone()))?;
            let tau = 1.0 / (2.0 * (gamma / scale.multiplier()) * field_mt * 1e-3);
            let position = match domain {
                AxisDomain::Time => tau,
                AxisDomain::Frequency => 1.0 / (2.0 * tau),
            };
            Ok(Marker {
                label: label.clone(),
                position,
            })
        })
        .collect()
}
