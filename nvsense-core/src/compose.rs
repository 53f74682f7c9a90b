//! Render composition: one plot request in, one renderable curve set out.
//!
//! The composer replaces the original per-isotope render paths with a
//! single parameterized pipeline over [`SpeciesSelection`]. All failure
//! modes are recoverable per-request: a missing row, a bad overlay file or
//! a zero-field marker request each suppress only their own contribution.

use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::axis::{AxisDomain, CanonicalAxis, UnitScale};
use crate::constants::ReferenceConstants;
use crate::error::Error;
use crate::markers::{marker_positions, Marker};
use crate::overlay::OverlaySource;
use crate::store::{CurveStore, RowKey, Selector};

/// Label used for the simulated N15 curve.
const SIM_LABEL: &str = "Sim";

/// Label used for the experimental overlay curve.
const EXP_LABEL: &str = "Exp";

/// Which rows a render addresses: one for N15, one per family for C13.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpeciesSelection {
    /// N15 at a misalignment angle.
    N15 {
        /// Misalignment angle between B0 and the NV axis, degrees.
        angle_deg: f64,
    },
    /// C13, one curve per selected hyperfine family.
    C13 {
        /// Selected family labels, in presentation order.
        families: Vec<String>,
    },
}

/// Parameter bundle for one render. Constructed fresh per request.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlotRequest {
    /// Electronic spin projection (ms = -1 or +1).
    pub ms: i32,
    /// XY8-M sequence repetition count.
    pub order: u32,
    /// Field strength in millitesla.
    pub field_mt: f64,
    /// Species and species-specific key parts.
    pub selection: SpeciesSelection,
    /// Time vs frequency representation of the x axis.
    pub domain: AxisDomain,
    /// Presentation magnitude for the x axis.
    pub scale: UnitScale,
    /// Isotope labels to mark, in selection order.
    pub marker_labels: Vec<String>,
    /// Experimental overlay file, if one has been picked.
    pub overlay_path: Option<PathBuf>,
    /// Whether the overlay is enabled for this render.
    pub overlay_enabled: bool,
}

impl PlotRequest {
    /// Human-readable summary of the simulated parameters, e.g. for a plot
    /// title: `XY8-8, B0 = 5 mT, theta = 0 deg`.
    #[must_use]
    pub fn title(&self) -> String {
        match &self.selection {
            SpeciesSelection::N15 { angle_deg } => format!(
                "XY8-{}, B0 = {} mT, theta = {} deg",
                self.order, self.field_mt, angle_deg
            ),
            SpeciesSelection::C13 { .. } => {
                format!("XY8-{}, B0 = {} mT", self.order, self.field_mt)
            }
        }
    }
}

/// One named curve of the render.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Curve {
    /// Display label (`"Sim"`, a family label, or `"Exp"`).
    pub label: String,
    /// x values in the render's domain and unit scale.
    pub x: Vec<f64>,
    /// y values: transition probabilities, or the rescaled overlay signal.
    pub y: Vec<f64>,
}

/// Everything the rendering layer needs for one plot. Consumed immediately.
#[derive(Debug, Default)]
pub struct RenderedCurveSet {
    /// Simulated curves plus (last) the overlay curve, if any.
    pub curves: Vec<Curve>,
    /// Labels of requested keys with no simulated data.
    pub placeholders: Vec<String>,
    /// Vertical markers in label-selection order.
    pub markers: Vec<Marker>,
    /// Non-fatal errors collected during composition.
    pub errors: Vec<Error>,
}

impl RenderedCurveSet {
    /// Whether any simulated data was found for this request.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.curves.is_empty()
    }
}

/// Immutable render context: the loaded tables plus the canonical axis,
/// constructed once and shared by reference across requests.
#[derive(Debug)]
pub struct Composer<'a> {
    store: &'a CurveStore,
    constants: &'a ReferenceConstants,
    axis: CanonicalAxis,
}

impl<'a> Composer<'a> {
    /// Creates a composer over loaded tables.
    #[must_use]
    pub fn new(store: &'a CurveStore, constants: &'a ReferenceConstants) -> Self {
        Self {
            store,
            constants,
            axis: CanonicalAxis::new(),
        }
    }

    /// The canonical axis this composer renders against.
    #[must_use]
    pub fn axis(&self) -> &CanonicalAxis {
        &self.axis
    }

    /// Composes one render. Never fails as a whole; partial failures are
    /// reported in [`RenderedCurveSet::errors`].
    pub fn render<S: OverlaySource>(
        &self,
        request: &PlotRequest,
        overlay_source: &S,
    ) -> RenderedCurveSet {
        let mut result = RenderedCurveSet::default();

        let x_values = self.axis.values(request.domain, request.scale);
        for (label, key) in request_keys(request) {
            match self.store.lookup(&key) {
                Some(series) => result.curves.push(Curve {
                    label,
                    x: x_values.clone(),
                    y: series.to_vec(),
                }),
                None => result.placeholders.push(label),
            }
        }

        if request.overlay_enabled {
            if let Some(path) = &request.overlay_path {
                // Rescale against the first found simulated curve; without
                // one the rescale factor is undefined.
                let reference = result.curves.first().map(|c| c.y.clone());
                let loaded = overlay_source.load(path).and_then(|series| {
                    series.rescale_to(reference.as_deref().unwrap_or(&[]))
                });
                match loaded {
                    Ok(points) => {
                        let (x, y): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();
                        result.curves.push(Curve {
                            label: EXP_LABEL.to_string(),
                            x,
                            y,
                        });
                    }
                    Err(err) => result.errors.push(err),
                }
            }
        }

        match marker_positions(
            self.constants,
            request.field_mt,
            request.scale,
            request.domain,
            &request.marker_labels,
        ) {
            Ok(markers) => result.markers = markers,
            Err(err) => result.errors.push(err),
        }

        result
    }
}

/// Expands a request into its (label, key) lookups: a single `"Sim"` key
/// for N15, one key per selected family for C13.
fn request_keys(request: &PlotRequest) -> Vec<(String, RowKey)> {
    match &request.selection {
        SpeciesSelection::N15 { angle_deg } => vec![(
            SIM_LABEL.to_string(),
            RowKey {
                ms: request.ms,
                order: request.order,
                field_mt: request.field_mt,
                selector: Selector::N15 {
                    angle_deg: *angle_deg,
                },
            },
        )],
        SpeciesSelection::C13 { families } => families
            .iter()
            .map(|family| {
                (
                    family.clone(),
                    RowKey {
                        ms: request.ms,
                        order: request.order,
                        field_mt: request.field_mt,
                        selector: Selector::C13 {
                            family: family.clone(),
                        },
                    },
                )
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::axis::AXIS_LEN;
    use crate::constants::GyromagneticEntry;
    use crate::error::Result;
    use crate::overlay::OverlaySeries;
    use crate::store::{C13Row, N15Row};
    use approx::assert_relative_eq;
    use std::path::Path;

    struct FixedOverlay(Vec<(f64, f64)>);

    impl OverlaySource for FixedOverlay {
        fn load(&self, _path: &Path) -> Result<OverlaySeries> {
            Ok(OverlaySeries::new(self.0.clone()))
        }
    }

    struct FailingOverlay;

    impl OverlaySource for FailingOverlay {
        fn load(&self, _path: &Path) -> Result<OverlaySeries> {
            Err(Error::Overlay("bad column count".to_string()))
        }
    }

    fn ramp_series() -> Vec<f64> {
        (0..AXIS_LEN).map(|i| i as f64 / (AXIS_LEN - 1) as f64).collect()
    }

    fn store() -> CurveStore {
        CurveStore::new(
            vec![N15Row::new(-1, 8, 5.0, 0.0, ramp_series()).unwrap()],
            vec![C13Row::new(-1, 8, 5.0, "A".to_string(), vec![0.5; AXIS_LEN]).unwrap()],
        )
    }

    fn constants() -> ReferenceConstants {
        ReferenceConstants::new(
            vec![GyromagneticEntry {
                label: "1-H".to_string(),
                mhz_per_tesla: 42.577,
            }],
            vec!["A".to_string(), "B".to_string()],
        )
        .unwrap()
    }

    fn n15_request() -> PlotRequest {
        PlotRequest {
            ms: -1,
            order: 8,
            field_mt: 5.0,
            selection: SpeciesSelection::N15 { angle_deg: 0.0 },
            domain: AxisDomain::Time,
            scale: UnitScale::Microseconds,
            marker_labels: vec![],
            overlay_path: None,
            overlay_enabled: false,
        }
    }

    #[test]
    fn test_n15_render_found() {
        let (store, constants) = (store(), constants());
        let composer = Composer::new(&store, &constants);
        let result = composer.render(&n15_request(), &FailingOverlay);

        assert!(result.has_data());
        assert_eq!(result.curves.len(), 1);
        assert_eq!(result.curves[0].label, "Sim");
        assert_eq!(result.curves[0].x.len(), AXIS_LEN);
        assert_relative_eq!(result.curves[0].x[0], 0.05);
        assert_relative_eq!(result.curves[0].x[AXIS_LEN - 1], 3.0);
        assert!(result.curves[0].y.iter().all(|&y| (0.0..=1.0).contains(&y)));
        assert!(result.placeholders.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_n15_render_not_found_placeholder() {
        let (store, constants) = (store(), constants());
        let composer = Composer::new(&store, &constants);
        let mut request = n15_request();
        request.order = 4;
        let result = composer.render(&request, &FailingOverlay);

        assert!(!result.has_data());
        assert_eq!(result.placeholders, ["Sim"]);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_c13_partial_families() {
        let (store, constants) = (store(), constants());
        let composer = Composer::new(&store, &constants);
        let mut request = n15_request();
        request.selection = SpeciesSelection::C13 {
            families: vec!["A".to_string(), "B".to_string()],
        };
        let result = composer.render(&request, &FailingOverlay);

        assert_eq!(result.curves.len(), 1);
        assert_eq!(result.curves[0].label, "A");
        assert_eq!(result.placeholders, ["B"]);
    }

    #[test]
    fn test_overlay_appended_and_rescaled() {
        let (store, constants) = (store(), constants());
        let composer = Composer::new(&store, &constants);
        let mut request = n15_request();
        request.overlay_path = Some(PathBuf::from("exp.txt"));
        request.overlay_enabled = true;

        let source = FixedOverlay(vec![(0.1, 10.0), (0.2, 30.0), (0.3, 20.0)]);
        let result = composer.render(&request, &source);

        assert_eq!(result.curves.len(), 2);
        let exp = &result.curves[1];
        assert_eq!(exp.label, "Exp");
        // Peak rescaled onto the simulated curve's maximum (ramp peaks at 1).
        let max_y = exp.y.iter().copied().fold(f64::MIN, f64::max);
        assert_relative_eq!(max_y, 1.0, max_relative = 1e-12);
        assert_relative_eq!(exp.y[0], 0.0);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_overlay_disabled_flag_suppresses_load() {
        let (store, constants) = (store(), constants());
        let composer = Composer::new(&store, &constants);
        let mut request = n15_request();
        request.overlay_path = Some(PathBuf::from("exp.txt"));
        request.overlay_enabled = false;

        let result = composer.render(&request, &FailingOverlay);
        assert_eq!(result.curves.len(), 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_overlay_without_reference_reports_precondition() {
        let (store, constants) = (store(), constants());
        let composer = Composer::new(&store, &constants);
        let mut request = n15_request();
        request.order = 4; // not simulated
        request.overlay_path = Some(PathBuf::from("exp.txt"));
        request.overlay_enabled = true;

        let source = FixedOverlay(vec![(0.1, 1.0), (0.2, 2.0)]);
        let result = composer.render(&request, &source);

        assert!(result.curves.is_empty());
        assert_eq!(result.placeholders, ["Sim"]);
        assert!(matches!(result.errors.as_slice(), [Error::NoReferenceCurve]));
    }

    #[test]
    fn test_overlay_load_failure_is_nonfatal() {
        let (store, constants) = (store(), constants());
        let composer = Composer::new(&store, &constants);
        let mut request = n15_request();
        request.overlay_path = Some(PathBuf::from("exp.txt"));
        request.overlay_enabled = true;
        request.marker_labels = vec!["1-H".to_string()];

        let result = composer.render(&request, &FailingOverlay);

        // Simulated curve and markers render despite the overlay failure.
        assert_eq!(result.curves.len(), 1);
        assert_eq!(result.markers.len(), 1);
        assert!(matches!(result.errors.as_slice(), [Error::Overlay(_)]));
    }

    #[test]
    fn test_zero_field_markers_leave_curves_intact() {
        let store = CurveStore::new(
            vec![N15Row::new(-1, 8, 0.0, 0.0, ramp_series()).unwrap()],
            vec![],
        );
        let constants = constants();
        let composer = Composer::new(&store, &constants);
        let mut request = n15_request();
        request.field_mt = 0.0;
        request.marker_labels = vec!["1-H".to_string()];

        let result = composer.render(&request, &FailingOverlay);

        assert_eq!(result.curves.len(), 1);
        assert!(result.markers.is_empty());
        assert!(matches!(result.errors.as_slice(), [Error::ZeroField]));
    }

    #[test]
    fn test_markers_follow_domain_and_scale() {
        let (store, constants) = (store(), constants());
        let composer = Composer::new(&store, &constants);
        let mut request = n15_request();
        request.domain = AxisDomain::Frequency;
        request.scale = UnitScale::Nanoseconds;
        request.marker_labels = vec!["1-H".to_string()];

        let result = composer.render(&request, &FailingOverlay);

        // tau(ns) = 1 / (2 * gamma/1e3 * 5e-3); frequency flip is 1/(2 tau).
        let tau_ns = 1.0 / (2.0 * (42.577 / 1e3) * 5.0e-3);
        assert_relative_eq!(
            result.markers[0].position,
            1.0 / (2.0 * tau_ns),
            max_relative = 1e-12
        );
        // x axis is GHz-scaled frequency.
        assert_relative_eq!(
            result.curves[0].x[0],
            1.0 / (2.0 * 0.05) / 1e3,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_title_summarizes_parameters() {
        let request = n15_request();
        assert_eq!(request.title(), "XY8-8, B0 = 5 mT, theta = 0 deg");
    }
}
