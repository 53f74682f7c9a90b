//! Exact-match storage for precomputed transition-probability series.
#![allow(clippy::float_cmp)]
//
// Lookup is exact equality on every key field, floats included: the tables
// hold a small discrete set of simulated parameter values, and callers only
// ever offer values drawn from that set (the domain accessors below). A
// tolerance comparison would change the contract.

use crate::axis::AXIS_LEN;
use crate::error::{Error, Result};

/// Isotope species of the target nuclear spin bath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    /// Nitrogen-15 (the NV center's own nitrogen).
    N15,
    /// Carbon-13 bath spins, grouped into hyperfine families.
    C13,
}

/// Species-specific part of a row key.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// N15 rows are keyed by field misalignment angle (degrees).
    N15 {
        /// Misalignment angle between B0 and the NV axis, degrees.
        angle_deg: f64,
    },
    /// C13 rows are keyed by hyperfine family label (exact, case-sensitive).
    C13 {
        /// Family label, e.g. `"A"`.
        family: String,
    },
}

impl Selector {
    /// The species this selector addresses.
    #[must_use]
    pub fn species(&self) -> Species {
        match self {
            Selector::N15 { .. } => Species::N15,
            Selector::C13 { .. } => Species::C13,
        }
    }
}

/// Full key identifying at most one precomputed row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowKey {
    /// Electronic spin projection (ms = -1 or +1).
    pub ms: i32,
    /// XY8-M sequence repetition count.
    pub order: u32,
    /// Field strength in millitesla.
    pub field_mt: f64,
    /// Species-specific key part.
    pub selector: Selector,
}

/// One precomputed N15 simulation result.
#[derive(Debug, Clone, PartialEq)]
pub struct N15Row {
    pub ms: i32,
    pub order: u32,
    pub field_mt: f64,
    pub angle_deg: f64,
    series: Vec<f64>,
}

impl N15Row {
    /// Creates a row, validating the series length.
    ///
    /// # Errors
    /// Returns [`Error::SeriesLength`] if `series` is not canonical length.
    pub fn new(ms: i32, order: u32, field_mt: f64, angle_deg: f64, series: Vec<f64>) -> Result<Self> {
        check_series_len(&series)?;
        Ok(Self {
            ms,
            order,
            field_mt,
            angle_deg,
            series,
        })
    }

    /// Transition probabilities aligned to the canonical axis.
    #[inline]
    #[must_use]
    pub fn series(&self) -> &[f64] {
        &self.series
    }
}

/// One precomputed C13 simulation result.
#[derive(Debug, Clone, PartialEq)]
pub struct C13Row {
    pub ms: i32,
    pub order: u32,
    pub field_mt: f64,
    pub family: String,
    series: Vec<f64>,
}

impl C13Row {
    /// Creates a row, validating the series length.
    ///
    /// # Errors
    /// Returns [`Error::SeriesLength`] if `series` is not canonical length.
    pub fn new(ms: i32, order: u32, field_mt: f64, family: String, series: Vec<f64>) -> Result<Self> {
        check_series_len(&series)?;
        Ok(Self {
            ms,
            order,
            field_mt,
            family,
            series,
        })
    }

    /// Transition probabilities aligned to the canonical axis.
    #[inline]
    #[must_use]
    pub fn series(&self) -> &[f64] {
        &self.series
    }
}

fn check_series_len(series: &[f64]) -> Result<()> {
    if series.len() == AXIS_LEN {
        Ok(())
    } else {
        Err(Error::SeriesLength {
            expected: AXIS_LEN,
            actual: series.len(),
        })
    }
}

/// Immutable store of the two simulation tables, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct CurveStore {
    n15: Vec<N15Row>,
    c13: Vec<C13Row>,
}

impl CurveStore {
    /// Wraps loaded tables.
    #[must_use]
    pub fn new(n15: Vec<N15Row>, c13: Vec<C13Row>) -> Self {
        Self { n15, c13 }
    }

    /// Exact-match lookup. `None` means the parameter combination was never
    /// simulated — an expected outcome, not an error.
    #[must_use]
    pub fn lookup(&self, key: &RowKey) -> Option<&[f64]> {
        match &key.selector {
            Selector::N15 { angle_deg } => self
                .n15
                .iter()
                .find(|row| {
                    row.ms == key.ms
                        && row.order == key.order
                        && row.field_mt == key.field_mt
                        && row.angle_deg == *angle_deg
                })
                .map(N15Row::series),
            Selector::C13 { family } => self
                .c13
                .iter()
                .find(|row| {
                    row.ms == key.ms
                        && row.order == key.order
                        && row.field_mt == key.field_mt
                        && row.family == *family
                })
                .map(C13Row::series),
        }
    }

    /// Number of rows stored for a species.
    #[must_use]
    pub fn len(&self, species: Species) -> usize {
        match species {
            Species::N15 => self.n15.len(),
            Species::C13 => self.c13.len(),
        }
    }

    /// Whether a species table is empty.
    #[must_use]
    pub fn is_empty(&self, species: Species) -> bool {
        self.len(species) == 0
    }

    /// Distinct ms values present for a species, ascending.
    #[must_use]
    pub fn ms_values(&self, species: Species) -> Vec<i32> {
        let mut values: Vec<i32> = match species {
            Species::N15 => self.n15.iter().map(|r| r.ms).collect(),
            Species::C13 => self.c13.iter().map(|r| r.ms).collect(),
        };
        values.sort_unstable();
        values.dedup();
        values
    }

    /// Distinct sequence orders present for a species, ascending.
    #[must_use]
    pub fn order_values(&self, species: Species) -> Vec<u32> {
        let mut values: Vec<u32> = match species {
            Species::N15 => self.n15.iter().map(|r| r.order).collect(),
            Species::C13 => self.c13.iter().map(|r| r.order).collect(),
        };
        values.sort_unstable();
        values.dedup();
        values
    }

    /// Distinct field strengths (mT) present for a species, ascending.
    #[must_use]
    pub fn field_values(&self, species: Species) -> Vec<f64> {
        let values = match species {
            Species::N15 => self.n15.iter().map(|r| r.field_mt).collect(),
            Species::C13 => self.c13.iter().map(|r| r.field_mt).collect(),
        };
        sorted_distinct(values)
    }

    /// Distinct N15 misalignment angles (degrees), ascending.
    #[must_use]
    pub fn angle_values(&self) -> Vec<f64> {
        sorted_distinct(self.n15.iter().map(|r| r.angle_deg).collect())
    }

    /// Distinct C13 family labels actually present in the table, sorted.
    #[must_use]
    pub fn family_values(&self) -> Vec<String> {
        let mut values: Vec<String> = self.c13.iter().map(|r| r.family.clone()).collect();
        values.sort_unstable();
        values.dedup();
        values
    }
}

fn sorted_distinct(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_unstable_by(f64::total_cmp);
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(fill: f64) -> Vec<f64> {
        vec![fill; AXIS_LEN]
    }

    fn sample_store() -> CurveStore {
        CurveStore::new(
            vec![
                N15Row::new(-1, 8, 5.0, 0.0, series(0.25)).unwrap(),
                N15Row::new(-1, 8, 5.0, 2.0, series(0.5)).unwrap(),
                N15Row::new(1, 16, 10.0, 0.0, series(0.75)).unwrap(),
            ],
            vec![
                C13Row::new(-1, 8, 5.0, "A".to_string(), series(0.1)).unwrap(),
                C13Row::new(-1, 8, 5.0, "B".to_string(), series(0.2)).unwrap(),
            ],
        )
    }

    #[test]
    fn test_n15_exact_match() {
        let store = sample_store();
        let key = RowKey {
            ms: -1,
            order: 8,
            field_mt: 5.0,
            selector: Selector::N15 { angle_deg: 0.0 },
        };
        let found = store.lookup(&key).unwrap();
        assert_eq!(found.len(), AXIS_LEN);
        assert_eq!(found[0], 0.25);
    }

    #[test]
    fn test_absent_key_is_none() {
        let store = sample_store();
        let key = RowKey {
            ms: -1,
            order: 4, // not simulated
            field_mt: 5.0,
            selector: Selector::N15 { angle_deg: 0.0 },
        };
        assert!(store.lookup(&key).is_none());
    }

    #[test]
    fn test_field_is_exact_not_tolerant() {
        let store = sample_store();
        let key = RowKey {
            ms: -1,
            order: 8,
            field_mt: 5.000001,
            selector: Selector::N15 { angle_deg: 0.0 },
        };
        assert!(store.lookup(&key).is_none());
    }

    #[test]
    fn test_c13_family_is_case_sensitive() {
        let store = sample_store();
        let mut key = RowKey {
            ms: -1,
            order: 8,
            field_mt: 5.0,
            selector: Selector::C13 {
                family: "a".to_string(),
            },
        };
        assert!(store.lookup(&key).is_none());
        key.selector = Selector::C13 {
            family: "A".to_string(),
        };
        assert!(store.lookup(&key).is_some());
    }

    #[test]
    fn test_series_length_validated() {
        let result = N15Row::new(-1, 8, 5.0, 0.0, vec![0.5; 10]);
        assert!(matches!(
            result,
            Err(Error::SeriesLength {
                expected: AXIS_LEN,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_domain_enumeration() {
        let store = sample_store();
        assert_eq!(store.ms_values(Species::N15), [-1, 1]);
        assert_eq!(store.order_values(Species::N15), [8, 16]);
        assert_eq!(store.field_values(Species::N15), [5.0, 10.0]);
        assert_eq!(store.angle_values(), [0.0, 2.0]);
        assert_eq!(store.family_values(), ["A", "B"]);
        assert_eq!(store.ms_values(Species::C13), [-1]);
    }
}
