//! nvsense-core: Curve lookup and overlay composition for precomputed
//! NV-center sensing data.
//!
//! This crate maps selected physical parameters (spin state, XY8-M order,
//! field strength, misalignment angle or hyperfine family) to precomputed
//! transition-probability curves, scales them onto a selectable time or
//! frequency axis, rescales experimental overlay data for comparison, and
//! places resonance markers from gyromagnetic ratios.
//!

pub mod axis;
pub mod compose;
pub mod constants;
pub mod error;
pub mod markers;
pub mod overlay;
pub mod store;

pub use axis::{AxisDomain, CanonicalAxis, UnitScale, AXIS_LEN};
pub use compose::{Composer, Curve, PlotRequest, RenderedCurveSet, SpeciesSelection};
pub use constants::{GyromagneticEntry, ReferenceConstants};
pub use error::{Error, Result};
pub use markers::{marker_positions, Marker};
pub use overlay::{OverlaySeries, OverlaySource};
pub use store::{C13Row, CurveStore, N15Row, RowKey, Selector, Species};
