//! nvsense-io: file I/O for nvsense.
//!
//! Loads the published HDF5 dataset into [`nvsense_core`] lookup
//! structures and reads plain-text experimental overlay files.

pub mod dataset;
pub mod error;
pub mod overlay;

pub use dataset::{read_dataset, Dataset};
pub use error::{Error, Result};
pub use overlay::TextOverlayReader;
