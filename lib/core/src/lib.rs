//! # tabula Core
//!
//! Core library for the tabula analysis engine.
//!
//! This crate provides the data model and the vector math shared by every
//! analysis:
//!
//! - [`Dataset`], [`DataObject`], [`ParameterState`], [`ParameterValue`] - the tabular model
//! - [`normalize`] - min-max scaling and one-hot encoding of a whole dataset
//! - [`NumericMetric`], [`CategoricalMetric`] - distances over normalized vectors
//! - [`DistanceCalculator`] - mixed numeric/categorical distance between two objects
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{
//!     normalize, DataObject, Dataset, DistanceCalculator, ParameterState, ParameterValue,
//! };
//!
//! let dataset = Dataset::new(
//!     1,
//!     "fruit",
//!     vec![ParameterState::numeric(1, "weight"), ParameterState::categorical(2, "color")],
//!     vec![
//!         DataObject::new(
//!             1,
//!             "apple",
//!             vec![ParameterValue::raw(1, "150"), ParameterValue::raw(2, "red")],
//!         ),
//!         DataObject::new(
//!             2,
//!             "lime",
//!             vec![ParameterValue::raw(1, "50"), ParameterValue::raw(2, "green")],
//!         ),
//!     ],
//! );
//!
//! let normalized = normalize(&dataset).unwrap();
//! let calc = DistanceCalculator::default();
//! let d = calc.distance(&normalized.objects[0], &normalized.objects[1]).unwrap();
//! assert!((d - 1.0).abs() < 1e-9);
//! ```

pub mod error;
pub mod parameter;
pub mod object;
pub mod dataset;
pub mod normalizer;
pub mod dataset_normalizer;
pub mod metric;
pub mod distance;

pub use error::{Error, Result};
pub use parameter::{ParameterId, ParameterState, ParameterType};
pub use object::{DataObject, NormalizedValue, ObjectId, ParameterValue};
pub use dataset::Dataset;
pub use normalizer::{
    normalizer_for, split_tokens, CategoricalNormalizer, NumericNormalizer, ParameterNormalizer,
};
pub use dataset_normalizer::normalize;
pub use metric::{CategoricalMetric, NumericMetric};
pub use distance::{DistanceCalculator, SplitVector};
