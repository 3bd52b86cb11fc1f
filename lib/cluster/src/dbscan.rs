use crate::cluster::{cluster_name, Cluster};
use crate::ClusteringAlgorithm;
use rayon::prelude::*;
use std::collections::VecDeque;
use tabula_core::{DataObject, DistanceCalculator, Error, Result};
use tracing::debug;

pub const NOISE_CLUSTER_NAME: &str = "Noise";

/// Density-based clustering
///
/// An object is a core point when at least `min_points` objects (itself
/// included) lie within `epsilon`. Objects not density-reachable from any
/// core point end up in a single "Noise" cluster.
#[derive(Debug, Clone)]
pub struct Dbscan {
    epsilon: f64,
    min_points: usize,
}

impl Dbscan {
    pub fn new(epsilon: f64, min_points: usize) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(Error::InvalidSettings(format!(
                "epsilon must be > 0, got {}",
                epsilon
            )));
        }
        if min_points == 0 {
            return Err(Error::InvalidSettings("min_points must be > 0".to_string()));
        }

        Ok(Self {
            epsilon,
            min_points,
        })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }

    /// Epsilon-neighborhood (indices, self included) of every object
    fn neighborhoods(
        &self,
        objects: &[DataObject],
        calculator: &DistanceCalculator,
    ) -> Result<Vec<Vec<usize>>> {
        (0..objects.len())
            .into_par_iter()
            .map(|i| {
                let mut neighbors = Vec::new();
                for (j, other) in objects.iter().enumerate() {
                    let distance = if i == j {
                        0.0
                    } else {
                        calculator.distance(&objects[i], other)?
                    };
                    if distance <= self.epsilon {
                        neighbors.push(j);
                    }
                }
                Ok(neighbors)
            })
            .collect()
    }
}

impl ClusteringAlgorithm for Dbscan {
    fn name(&self) -> &'static str {
        "dbscan"
    }

    fn cluster(
        &self,
        objects: &[DataObject],
        calculator: &DistanceCalculator,
    ) -> Result<Vec<Cluster>> {
        if objects.is_empty() {
            return Ok(Vec::new());
        }

        let n = objects.len();
        let neighborhoods = self.neighborhoods(objects, calculator)?;
        let mut visited = vec![false; n];
        let mut labels: Vec<Option<usize>> = vec![None; n];
        let mut cluster_count = 0;

        for i in 0..n {
            if visited[i] {
                continue;
            }
            visited[i] = true;

            // Tentative noise; a later cluster may still claim it as a border point
            if neighborhoods[i].len() < self.min_points {
                continue;
            }

            let current = cluster_count;
            cluster_count += 1;
            labels[i] = Some(current);

            let mut queue: VecDeque<usize> = neighborhoods[i].iter().copied().collect();
            while let Some(j) = queue.pop_front() {
                if labels[j].is_none() {
                    labels[j] = Some(current);
                }
                if visited[j] {
                    continue;
                }
                visited[j] = true;

                if neighborhoods[j].len() >= self.min_points {
                    let unclaimed = neighborhoods[j]
                        .iter()
                        .copied()
                        .filter(|&k| !visited[k] || labels[k].is_none());
                    queue.extend(unclaimed);
                }
            }
        }

        let mut members: Vec<Vec<DataObject>> = vec![Vec::new(); cluster_count];
        let mut noise = Vec::new();
        for (object, label) in objects.iter().zip(&labels) {
            match label {
                Some(c) => members[*c].push(object.clone()),
                None => noise.push(object.clone()),
            }
        }

        debug!(clusters = cluster_count, noise = noise.len(), "dbscan finished");

        let mut clusters: Vec<Cluster> = members
            .into_iter()
            .enumerate()
            .map(|(c, m)| Cluster::new(cluster_name(c), m))
            .collect();
        if !noise.is_empty() {
            clusters.push(Cluster::new(NOISE_CLUSTER_NAME, noise));
        }
        Ok(clusters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{CategoricalMetric, NumericMetric, ParameterValue};

    fn point(id: u64, x: f64, y: f64) -> DataObject {
        DataObject::new(
            id,
            format!("p{}", id),
            vec![ParameterValue::numeric(1, x), ParameterValue::numeric(2, y)],
        )
    }

    fn calculator() -> DistanceCalculator {
        DistanceCalculator::new(NumericMetric::Euclidean, CategoricalMetric::Jaccard)
    }

    #[test]
    fn test_dbscan_basic() {
        let objects = vec![
            point(1, 0.0, 0.0),
            point(2, 0.05, 0.0),
            point(3, 0.0, 0.05),
            point(4, 0.9, 0.9),
            point(5, 0.95, 0.9),
            point(6, 0.9, 0.95),
            point(7, 0.0, 1.0), // Outlier
        ];

        let dbscan = Dbscan::new(0.1, 2).unwrap();
        let clusters = dbscan.cluster(&objects, &calculator()).unwrap();

        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].member_ids(), vec![1, 2, 3]);
        assert_eq!(clusters[1].member_ids(), vec![4, 5, 6]);
        assert_eq!(clusters[2].name, NOISE_CLUSTER_NAME);
        assert_eq!(clusters[2].member_ids(), vec![7]);
    }

    #[test]
    fn test_dbscan_all_noise() {
        let objects = vec![point(1, 0.0, 0.0), point(2, 0.5, 0.5), point(3, 1.0, 1.0)];
        let dbscan = Dbscan::new(0.1, 2).unwrap();
        let clusters = dbscan.cluster(&objects, &calculator()).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name, NOISE_CLUSTER_NAME);
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn test_dbscan_no_noise_cluster_when_empty() {
        let objects = vec![point(1, 0.0, 0.0), point(2, 0.01, 0.0)];
        let dbscan = Dbscan::new(0.1, 2).unwrap();
        let clusters = dbscan.cluster(&objects, &calculator()).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name, "Cluster 1");
    }

    #[test]
    fn test_dbscan_border_point_claimed_after_noise() {
        // p1 is visited first and is not core, but p2 (core) reaches it later
        let objects = vec![
            point(1, 0.0, 0.0),
            point(2, 0.1, 0.0),
            point(3, 0.2, 0.0),
            point(4, 0.3, 0.0),
        ];
        let dbscan = Dbscan::new(0.08, 3).unwrap();
        let clusters = dbscan.cluster(&objects, &calculator()).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].member_ids(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_dbscan_chain_expansion() {
        let objects: Vec<_> = (0..6).map(|i| point(i, i as f64 * 0.05, 0.0)).collect();
        let dbscan = Dbscan::new(0.04, 2).unwrap();
        let clusters = dbscan.cluster(&objects, &calculator()).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 6);
    }

    #[test]
    fn test_dbscan_invalid_settings() {
        assert!(Dbscan::new(0.0, 2).is_err());
        assert!(Dbscan::new(-1.0, 2).is_err());
        assert!(Dbscan::new(0.5, 0).is_err());
    }

    #[test]
    fn test_dbscan_empty_input() {
        let dbscan = Dbscan::new(0.5, 2).unwrap();
        assert!(dbscan.cluster(&[], &calculator()).unwrap().is_empty());
    }
}
