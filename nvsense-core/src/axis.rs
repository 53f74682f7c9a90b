//! Canonical time/frequency axis and unit algebra.
#![allow(clippy::cast_precision_loss)]
//!
//! All precomputed probability series share one fixed time axis: 1000
//! evenly spaced pulse spacings from 0.05 to 3 microseconds. The paired
//! frequency axis is f = 1/(2τ) in megahertz. Storage units are always
//! μs/MHz; presentation units are selected per render.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of points in the canonical axis.
pub const AXIS_LEN: usize = 1000;

/// First pulse spacing on the canonical axis, microseconds.
pub const TAU_MIN_US: f64 = 0.05;

/// Last pulse spacing on the canonical axis, microseconds.
pub const TAU_MAX_US: f64 = 3.0;

/// Converts a pulse spacing (μs) to its resonance frequency (MHz).
#[inline]
#[must_use]
pub fn time_to_freq(tau: f64) -> f64 {
    1.0 / (2.0 * tau)
}

/// Converts a resonance frequency (MHz) to its pulse spacing (μs).
#[inline]
#[must_use]
pub fn freq_to_time(freq: f64) -> f64 {
    1.0 / (2.0 * freq)
}

/// Presentation magnitude for the time axis, with the fixed paired
/// frequency magnitude.
///
/// The pairing is a contract, not independently configurable: ns↔GHz,
/// μs↔MHz, ms↔kHz, s↔Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnitScale {
    /// Nanoseconds / gigahertz.
    Nanoseconds,
    /// Microseconds / megahertz (the canonical storage unit).
    #[default]
    Microseconds,
    /// Milliseconds / kilohertz.
    Milliseconds,
    /// Seconds / hertz.
    Seconds,
}

impl UnitScale {
    /// All scales in index order.
    pub const ALL: [UnitScale; 4] = [
        UnitScale::Nanoseconds,
        UnitScale::Microseconds,
        UnitScale::Milliseconds,
        UnitScale::Seconds,
    ];

    /// Magnitude multiplier applied to canonical time values (μs).
    #[inline]
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            UnitScale::Nanoseconds => 1e3,
            UnitScale::Microseconds => 1.0,
            UnitScale::Milliseconds => 1e-3,
            UnitScale::Seconds => 1e-6,
        }
    }

    /// Scales a canonical time value (μs) into this unit.
    #[inline]
    #[must_use]
    pub fn scale_time(self, value_us: f64) -> f64 {
        value_us * self.multiplier()
    }

    /// Scales a canonical frequency value (MHz) into the paired unit.
    #[inline]
    #[must_use]
    pub fn scale_freq(self, value_mhz: f64) -> f64 {
        value_mhz / self.multiplier()
    }

    /// Time axis label.
    #[must_use]
    pub fn time_label(self) -> &'static str {
        match self {
            UnitScale::Nanoseconds => "tau (ns)",
            UnitScale::Microseconds => "tau (us)",
            UnitScale::Milliseconds => "tau (ms)",
            UnitScale::Seconds => "tau (s)",
        }
    }

    /// Paired frequency axis label.
    #[must_use]
    pub fn freq_label(self) -> &'static str {
        match self {
            UnitScale::Nanoseconds => "f (GHz)",
            UnitScale::Microseconds => "f (MHz)",
            UnitScale::Milliseconds => "f (kHz)",
            UnitScale::Seconds => "f (Hz)",
        }
    }
}

/// Which representation of the shared axis a render uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AxisDomain {
    /// Pulse spacing τ.
    #[default]
    Time,
    /// Resonance frequency f = 1/(2τ).
    Frequency,
}

impl AxisDomain {
    /// Axis label in the given unit scale.
    #[must_use]
    pub fn label(self, scale: UnitScale) -> &'static str {
        match self {
            AxisDomain::Time => scale.time_label(),
            AxisDomain::Frequency => scale.freq_label(),
        }
    }
}

/// The fixed time axis shared by every precomputed series, with its
/// derived frequency axis. Computed once and held for the process lifetime.
#[derive(Debug, Clone)]
pub struct CanonicalAxis {
    tau_us: Vec<f64>,
    freq_mhz: Vec<f64>,
}

impl CanonicalAxis {
    /// Builds the canonical axis: `AXIS_LEN` evenly spaced τ points from
    /// `TAU_MIN_US` to `TAU_MAX_US` inclusive.
    #[must_use]
    pub fn new() -> Self {
        let step = (TAU_MAX_US - TAU_MIN_US) / (AXIS_LEN - 1) as f64;
        let tau_us: Vec<f64> = (0..AXIS_LEN)
            .map(|i| TAU_MIN_US + step * i as f64)
            .collect();
        let freq_mhz = tau_us.iter().map(|&t| time_to_freq(t)).collect();
        Self { tau_us, freq_mhz }
    }

    /// Pulse spacings in microseconds.
    #[inline]
    #[must_use]
    pub fn tau_us(&self) -> &[f64] {
        &self.tau_us
    }

    /// Resonance frequencies in megahertz.
    #[inline]
    #[must_use]
    pub fn freq_mhz(&self) -> &[f64] {
        &self.freq_mhz
    }

    /// The axis in the requested domain and unit scale.
    #[must_use]
    pub fn values(&self, domain: AxisDomain, scale: UnitScale) -> Vec<f64> {
        match domain {
            AxisDomain::Time => self.tau_us.iter().map(|&t| scale.scale_time(t)).collect(),
            AxisDomain::Frequency => self
                .freq_mhz
                .iter()
                .map(|&f| scale.scale_freq(f))
                .collect(),
        }
    }
}

impl Default for CanonicalAxis {
    fn default() -> Self {
        Self::new()
    }
}
