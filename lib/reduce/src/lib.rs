//! # tabula Reduce
//!
//! Two-dimensional projection of normalized objects for visualization.
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{DataObject, ParameterValue};
//! use tabula_reduce::reduce_dimensions;
//!
//! let objects = vec![
//!     DataObject::new(1, "a", vec![ParameterValue::numeric(1, 0.0)]),
//!     DataObject::new(2, "b", vec![ParameterValue::numeric(1, 1.0)]),
//! ];
//!
//! let coords = reduce_dimensions(&objects).unwrap();
//! assert_eq!(coords.len(), 2);
//! assert_eq!(coords[0].y, 0.0);
//! ```

pub mod pca;

pub use pca::{DataObjectCoordinate, EigenDecomposition, PcaReducer, DIMENSIONS};

use tabula_core::{DataObject, Result};
use tracing::info;

/// Project every object onto the two principal components of the set
pub fn reduce_dimensions(objects: &[DataObject]) -> Result<Vec<DataObjectCoordinate>> {
    let coordinates = PcaReducer::new().reduce(objects)?;
    info!(objects = coordinates.len(), "dimensionality reduction finished");
    Ok(coordinates)
}
