//! # tabula
//!
//! An exploratory analysis engine for tabular datasets.
//!
//! A dataset is a set of objects described by named parameters, each either
//! numeric or categorical. tabula normalizes the dataset and then runs one of
//! three analyses on it: weighted all-pairs similarity, clustering (KMeans,
//! DBSCAN or agglomerative), or a PCA projection onto two dimensions.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! tabula --dataset cars.json normalize
//! tabula --dataset cars.json similarity --numeric range --categorical overlap
//! tabula --dataset cars.json cluster --algorithm dbscan --epsilon 0.2 --min-points 3
//! tabula --dataset cars.json --pretty reduce
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use tabula::prelude::*;
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
//!             vec![ParameterValue::raw(1, "12000"), ParameterValue::raw(2, "diesel")],
//!         ),
//!         DataObject::new(
//!             3,
//!             "c",
//!             vec![ParameterValue::raw(1, "40000"), ParameterValue::raw(2, "petrol")],
//!         ),
//!     ],
//! );
//!
//! let normalized = normalize(&dataset).unwrap();
//!
//! let pairs = compare_all_objects(&normalized, StandardComparer::default()).unwrap();
//! assert_eq!(pairs.len(), 3);
//!
//! let clusters = cluster(&normalized.objects, &ClusteringSettings::agglomerative(0.2)).unwrap();
//! assert_eq!(clusters[0].member_ids(), vec![1, 2]);
//!
//! let coords = reduce_dimensions(&normalized.objects).unwrap();
//! assert_eq!(coords.len(), 3);
//! ```
//!
//! ## Crate Structure
//!
//! - `tabula-core` - data model, normalizers, distance metrics
//! - `tabula-similarity` - value comparison and all-pairs similarity
//! - `tabula-cluster` - centroids and the three clustering algorithms
//! - `tabula-reduce` - PCA projection

pub mod config;

// Re-export core types
pub use tabula_core::{
    normalize, CategoricalMetric, DataObject, Dataset, DistanceCalculator, Error,
    NormalizedValue, NumericMetric, ObjectId, ParameterId, ParameterState, ParameterType,
    ParameterValue, Result,
};

// Re-export analyses
pub use tabula_similarity::{
    compare_all_objects, CategoricalComparison, NumericComparison, SimilarityPair,
    StandardComparer, ValueComparer,
};
pub use tabula_cluster::{
    cluster, AlgorithmKind, AlgorithmSettings, Centroid, Cluster, ClusterPayload,
    ClusteringAlgorithm, ClusteringSettings,
};
pub use tabula_reduce::{reduce_dimensions, DataObjectCoordinate};

pub use config::{load_dataset, load_settings, LoadError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        cluster, compare_all_objects, normalize, reduce_dimensions,
        AlgorithmSettings, CategoricalMetric, Cluster, ClusteringSettings, DataObject,
        DataObjectCoordinate, Dataset, Error, NumericMetric, ParameterState, ParameterValue,
        Result, SimilarityPair, StandardComparer,
    };
}
