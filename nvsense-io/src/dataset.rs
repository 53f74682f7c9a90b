//! HDF5 dataset loading.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
//!
//! The published dataset file carries three logical table groups:
//! `/n15_group/n15_table` and `/c13_group/c13_table` with the precomputed
//! probability series, and `/val_group` with the gyromagnetic ratio table
//! (`gyro_table`) and the C13 family-label domain (`cfam_table`). The HDF5
//! library converts compound fields by name, so integer widths and string
//! lengths in the file may differ from the in-memory records below.

use hdf5::types::FixedAscii;
use hdf5::{File, Group, H5Type};
use std::path::Path;

use nvsense_core::{C13Row, CurveStore, GyromagneticEntry, N15Row, ReferenceConstants, AXIS_LEN};

use crate::error::Result;

/// Maximum stored length of family and isotope labels.
const LABEL_LEN: usize = 32;

/// A loaded dataset: both simulation tables plus the reference constants.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// The two simulation tables behind exact-match lookup.
    pub store: CurveStore,
    /// Gyromagnetic ratios and the family-label domain.
    pub constants: ReferenceConstants,
}

#[derive(H5Type, Clone)]
#[repr(C)]
struct N15Record {
    ms: i64,
    order: i64,
    field: f64,
    field_angle: f64,
    data: [f64; AXIS_LEN],
}

#[derive(H5Type, Clone)]
#[repr(C)]
struct C13Record {
    ms: i64,
    order: i64,
    field: f64,
    fam: FixedAscii<LABEL_LEN>,
    data: [f64; AXIS_LEN],
}

#[derive(H5Type, Clone)]
#[repr(C)]
struct GyroRecord {
    substance: FixedAscii<LABEL_LEN>,
    value: f64,
}

#[derive(H5Type, Clone)]
#[repr(C)]
struct FamRecord {
    fam: FixedAscii<LABEL_LEN>,
}

/// Reads a dataset file into immutable lookup structures.
///
/// # Errors
/// Returns an error if the file cannot be opened, a table is missing or
/// malformed, a series is not canonical length, or the gyromagnetic table
/// carries duplicate labels.
pub fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let file = File::open(path)?;

    let n15 = read_n15_table(&file.group("n15_group")?)?;
    let c13 = read_c13_table(&file.group("c13_group")?)?;

    let val_group = file.group("val_group")?;
    let gyro = read_gyro_table(&val_group)?;
    let families = read_family_domain(&val_group)?;

    Ok(Dataset {
        store: CurveStore::new(n15, c13),
        constants: ReferenceConstants::new(gyro, families)?,
    })
}

fn read_n15_table(group: &Group) -> Result<Vec<N15Row>> {
    let records = group.dataset("n15_table")?.read_raw::<N15Record>()?;
    records
        .into_iter()
        .map(|r| {
            N15Row::new(
                r.ms as i32,
                r.order as u32,
                r.field,
                r.field_angle,
                r.data.to_vec(),
            )
            .map_err(Into::into)
        })
        .collect()
}

fn read_c13_table(group: &Group) -> Result<Vec<C13Row>> {
    let records = group.dataset("c13_table")?.read_raw::<C13Record>()?;
    records
        .into_iter()
        .map(|r| {
            C13Row::new(
                r.ms as i32,
                r.order as u32,
                r.field,
                r.fam.as_str().to_string(),
                r.data.to_vec(),
            )
            .map_err(Into::into)
        })
        .collect()
}

fn read_gyro_table(group: &Group) -> Result<Vec<GyromagneticEntry>> {
    let records = group.dataset("gyro_table")?.read_raw::<GyroRecord>()?;
    Ok(records
        .into_iter()
        .map(|r| GyromagneticEntry {
            label: r.substance.as_str().to_string(),
            mhz_per_tesla: r.value,
        })
        .collect())
}

fn read_family_domain(group: &Group) -> Result<Vec<String>> {
    let records = group.dataset("cfam_table")?.read_raw::<FamRecord>()?;
    let mut families: Vec<String> = records
        .into_iter()
        .map(|r| r.fam.as_str().to_string())
        .collect();
    families.sort_unstable();
    families.dedup();
    Ok(families)
}
