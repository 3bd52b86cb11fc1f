//! # tabula Similarity
//!
//! Weighted all-pairs similarity scoring for tabular objects.
//!
//! Every unordered pair of objects is scored by comparing the raw values of
//! each active parameter with an injected [`ValueComparer`] and averaging the
//! per-parameter results by parameter weight.
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{Dataset, DataObject, ParameterState, ParameterValue};
//! use tabula_similarity::{compare_all_objects, StandardComparer};
//!
//! let dataset = Dataset::new(
//!     1,
//!     "cars",
//!     vec![ParameterState::numeric(1, "price"), ParameterState::categorical(2, "fuel")],
//!     vec![
//!         DataObject::new(
//!             1,
//!             "a",
//!             vec![ParameterValue::raw(1, "10000"), ParameterValue::raw(2, "diesel")],
//!         ),
//!         DataObject::new(
//!             2,
//!             "b",
//!             vec![ParameterValue::raw(1, "20000"), ParameterValue::raw(2, "diesel")],
//!         ),
//!     ],
//! );
//!
//! let pairs = compare_all_objects(&dataset, StandardComparer::default()).unwrap();
//! assert_eq!(pairs.len(), 1);
//! assert!((pairs[0].similarity - 0.5).abs() < 1e-9);
//! ```

pub mod comparer;
pub mod similarity;

pub use comparer::{
    categorical_similarity, number_similarity, CategoricalComparison, NumericComparison,
    StandardComparer, ValueComparer,
};
pub use similarity::{compare_all_objects, SimilarityComparer, SimilarityPair};
