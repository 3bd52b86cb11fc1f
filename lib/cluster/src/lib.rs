//! # tabula Cluster
//!
//! Clustering of normalized tabular objects.
//!
//! Three interchangeable strategies share the [`ClusteringAlgorithm`] contract:
//!
//! - [`KMeans`] - fixed number of centroid-based clusters
//! - [`Dbscan`] - density-based clusters plus a "Noise" cluster
//! - [`Agglomerative`] - bottom-up merging until a distance threshold
//!
//! ## Example
//!
//! ```rust
//! use tabula_core::{DataObject, ParameterValue};
//! use tabula_cluster::{cluster, ClusteringSettings};
//!
//! let objects: Vec<DataObject> = [0.0, 0.05, 0.9, 0.95]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, v)| {
//!         DataObject::new(i as u64, format!("o{}", i), vec![ParameterValue::numeric(1, *v)])
//!     })
//!     .collect();
//!
//! let clusters = cluster(&objects, &ClusteringSettings::kmeans(2, 100)).unwrap();
//! assert_eq!(clusters.len(), 2);
//! assert_eq!(clusters[0].member_ids(), vec![0, 1]);
//! ```

pub mod agglomerative;
pub mod centroid;
pub mod cluster;
pub mod dbscan;
pub mod kmeans;
pub mod settings;

pub use agglomerative::Agglomerative;
pub use centroid::{Centroid, CentroidCalculator, CATEGORICAL_THRESHOLD};
pub use cluster::{Cluster, ClusterPayload};
pub use dbscan::{Dbscan, NOISE_CLUSTER_NAME};
pub use kmeans::KMeans;
pub use settings::{AlgorithmKind, AlgorithmSettings, ClusteringSettings, DEFAULT_MAX_ITERATIONS};

use tabula_core::{DataObject, DistanceCalculator, Result};
use tracing::info;

/// Common contract of all clustering strategies
pub trait ClusteringAlgorithm: Send + Sync {
    fn name(&self) -> &'static str;

    /// Group `objects` (already normalized) into clusters
    ///
    /// An empty input yields an empty result.
    fn cluster(
        &self,
        objects: &[DataObject],
        calculator: &DistanceCalculator,
    ) -> Result<Vec<Cluster>>;
}

/// Run the algorithm selected by `settings`
///
/// Settings are validated before any object is looked at, so malformed
/// settings fail even for an empty input.
pub fn cluster(objects: &[DataObject], settings: &ClusteringSettings) -> Result<Vec<Cluster>> {
    let algorithm = settings.algorithm.build()?;
    if objects.is_empty() {
        return Ok(Vec::new());
    }

    let clusters = algorithm.cluster(objects, &settings.calculator())?;
    info!(
        algorithm = algorithm.name(),
        objects = objects.len(),
        clusters = clusters.len(),
        "clustering finished"
    );
    Ok(clusters)
}
