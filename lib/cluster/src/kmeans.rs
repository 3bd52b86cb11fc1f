use crate::centroid::{Centroid, CentroidCalculator};
use crate::cluster::{cluster_name, Cluster, ClusterPayload};
use crate::ClusteringAlgorithm;
use rayon::prelude::*;
use tabula_core::{DataObject, DistanceCalculator, Error, Result};
use tracing::{debug, warn};

/// Centroid-based partitioning into a fixed number of clusters
///
/// Centroids are seeded from the first `k` distinct objects, so results are
/// deterministic for a given input order.
#[derive(Debug, Clone)]
pub struct KMeans {
    number_of_clusters: usize,
    max_iterations: usize,
    centroids: CentroidCalculator,
}

impl KMeans {
    pub fn new(number_of_clusters: usize, max_iterations: usize) -> Result<Self> {
        if number_of_clusters == 0 {
            return Err(Error::InvalidSettings(
                "number_of_clusters must be > 0".to_string(),
            ));
        }
        if max_iterations == 0 {
            return Err(Error::InvalidSettings("max_iterations must be > 0".to_string()));
        }

        Ok(Self {
            number_of_clusters,
            max_iterations,
            centroids: CentroidCalculator::default(),
        })
    }

    pub fn number_of_clusters(&self) -> usize {
        self.number_of_clusters
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Indices of the seed objects: first `k` distinct objects, padded by
    /// cycling through the input when there are fewer distinct ones
    fn seed_indices(&self, objects: &[DataObject]) -> Vec<usize> {
        let mut seeds: Vec<usize> = Vec::with_capacity(self.number_of_clusters);
        for (i, object) in objects.iter().enumerate() {
            if seeds.len() == self.number_of_clusters {
                break;
            }
            let duplicate = seeds.iter().any(|&s| same_values(&objects[s], object));
            if !duplicate {
                seeds.push(i);
            }
        }

        let mut next = 0;
        while seeds.len() < self.number_of_clusters {
            seeds.push(next % objects.len());
            next += 1;
        }
        seeds
    }

    /// Index of the nearest centroid for every object; ties go to the
    /// lowest cluster index
    fn assign(
        objects: &[DataObject],
        centroids: &[Centroid],
        calculator: &DistanceCalculator,
    ) -> Result<Vec<usize>> {
        objects
            .par_iter()
            .map(|object| {
                let mut best = 0;
                let mut best_distance = f64::INFINITY;
                for (k, centroid) in centroids.iter().enumerate() {
                    let distance = calculator.distance(object, centroid.as_object())?;
                    if distance < best_distance {
                        best_distance = distance;
                        best = k;
                    }
                }
                Ok(best)
            })
            .collect()
    }

    fn members_of<'a>(
        objects: &'a [DataObject],
        assignments: &[usize],
        k: usize,
    ) -> Vec<&'a DataObject> {
        assignments
            .iter()
            .zip(objects)
            .filter(|(a, _)| **a == k)
            .map(|(_, o)| o)
            .collect()
    }
}

/// Whether two objects hold the same normalized values for the same parameters
fn same_values(a: &DataObject, b: &DataObject) -> bool {
    let a = a.sorted_values();
    let b = b.sorted_values();
    a.len() == b.len()
        && a
            .iter()
            .zip(&b)
            .all(|(x, y)| x.parameter_id == y.parameter_id && x.value == y.value)
}

impl ClusteringAlgorithm for KMeans {
    fn name(&self) -> &'static str {
        "kmeans"
    }

    fn cluster(
        &self,
        objects: &[DataObject],
        calculator: &DistanceCalculator,
    ) -> Result<Vec<Cluster>> {
        if objects.is_empty() {
            return Ok(Vec::new());
        }

        let mut centroids: Vec<Centroid> = self
            .seed_indices(objects)
            .into_iter()
            .map(|i| Centroid::from_object(&objects[i]))
            .collect();

        let mut assignments: Vec<usize> = Vec::new();
        let mut converged = false;

        for iteration in 0..self.max_iterations {
            let next = Self::assign(objects, &centroids, calculator)?;
            if next == assignments {
                converged = true;
                debug!(iteration, "kmeans converged");
                break;
            }

            for (k, centroid) in centroids.iter_mut().enumerate() {
                let members = Self::members_of(objects, &next, k);
                *centroid = self.centroids.recalculate(centroid, &members)?;
            }

            let moved = if assignments.is_empty() {
                objects.len()
            } else {
                assignments.iter().zip(&next).filter(|(a, b)| a != b).count()
            };
            debug!(iteration, moved, "kmeans iteration");
            assignments = next;
        }

        if !converged {
            warn!(
                max_iterations = self.max_iterations,
                "kmeans stopped before membership stabilized"
            );
        }

        Ok(centroids
            .into_iter()
            .enumerate()
            .map(|(k, centroid)| {
                let members = Self::members_of(objects, &assignments, k)
                    .into_iter()
                    .cloned()
                    .collect();
                Cluster::new(cluster_name(k), members)
                    .with_payload(ClusterPayload::KMeans { centroid })
            })
            .collect())
    }
}
