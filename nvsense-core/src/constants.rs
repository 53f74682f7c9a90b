//! Reference constants loaded from the dataset: gyromagnetic ratios and
//! the C13 family-label domain.

use crate::error::{Error, Result};

/// One isotope's gyromagnetic ratio.
///
/// Labels follow the dataset convention "mass number - element symbol",
/// e.g. `"1-H"`, and are unique within the table.
#[derive(Debug, Clone, PartialEq)]
pub struct GyromagneticEntry {
    /// Isotope label, e.g. `"1-H"`.
    pub label: String,
    /// Gyromagnetic ratio in MHz per tesla.
    pub mhz_per_tesla: f64,
}

/// Read-only lookup tables loaded once from the dataset.
///
/// Entry order is preserved from the source table so marker presentation
/// stays stable across renders.
#[derive(Debug, Clone, Default)]
pub struct ReferenceConstants {
    gyro: Vec<GyromagneticEntry>,
    families: Vec<String>,
}

impl ReferenceConstants {
    /// Builds the constants from loaded table contents.
    ///
    /// # Errors
    /// Returns [`Error::DuplicateIsotope`] if two entries share a label.
    pub fn new(gyro: Vec<GyromagneticEntry>, families: Vec<String>) -> Result<Self> {
        for (i, entry) in gyro.iter().enumerate() {
            if gyro[..i].iter().any(|e| e.label == entry.label) {
                return Err(Error::DuplicateIsotope(entry.label.clone()));
            }
        }
        Ok(Self { gyro, families })
    }

    /// Gyromagnetic ratio (MHz/T) for an isotope label, if present.
    #[must_use]
    pub fn ratio(&self, label: &str) -> Option<f64> {
        self.gyro
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.mhz_per_tesla)
    }

    /// All gyromagnetic entries in table order.
    #[inline]
    #[must_use]
    pub fn gyro_entries(&self) -> &[GyromagneticEntry] {
        &self.gyro
    }

    /// All known C13 family labels in table order.
    #[inline]
    #[must_use]
    pub fn families(&self) -> &[String] {
        &self.families
    }
}

/// Splits an isotope label into (mass number, element symbol) for display,
/// e.g. `"1-H"` → `("1", "H")`. Labels without a separator come back whole.
#[must_use]
pub fn split_isotope_label(label: &str) -> (&str, &str) {
    match label.split_once('-') {
        Some((mass, element)) => (mass, element),
        None => ("", label),
    }
}
