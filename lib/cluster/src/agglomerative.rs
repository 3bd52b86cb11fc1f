use crate::centroid::{Centroid, CentroidCalculator};
use crate::cluster::{cluster_name, Cluster, ClusterPayload};
use crate::ClusteringAlgorithm;
use rayon::prelude::*;
use tabula_core::{DataObject, DistanceCalculator, Error, Result};
use tracing::debug;

/// Bottom-up merging of singleton clusters
///
/// Linkage is the distance between cluster representatives (the mean of all
/// members), not between member pairs.
#[derive(Debug, Clone)]
pub struct Agglomerative {
    threshold: f64,
    centroids: CentroidCalculator,
}

struct Node {
    members: Vec<DataObject>,
    representative: Centroid,
    absorbed: bool,
    grown: bool,
}

/// Upper-triangular distance cache between node representatives
struct DistanceMatrix {
    rows: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    fn build(nodes: &[Node], calculator: &DistanceCalculator) -> Result<Self> {
        let rows = (0..nodes.len())
            .into_par_iter()
            .map(|i| {
                nodes[i + 1..]
                    .iter()
                    .map(|other| {
                        calculator.distance(
                            nodes[i].representative.as_object(),
                            other.representative.as_object(),
                        )
                    })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> f64 {
        let (low, high) = if i < j { (i, j) } else { (j, i) };
        self.rows[low][high - low - 1]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, distance: f64) {
        let (low, high) = if i < j { (i, j) } else { (j, i) };
        self.rows[low][high - low - 1] = distance;
    }

    /// Closest pair of live nodes; ties go to the lowest (i, j)
    fn closest(&self, nodes: &[Node]) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..nodes.len() {
            if nodes[i].absorbed {
                continue;
            }
            for j in i + 1..nodes.len() {
                if nodes[j].absorbed {
                    continue;
                }
                let distance = self.get(i, j);
                if best.map_or(true, |(_, _, d)| distance < d) {
                    best = Some((i, j, distance));
                }
            }
        }
        best
    }
}

impl Agglomerative {
    pub fn new(threshold: f64) -> Result<Self> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(Error::InvalidSettings(format!(
                "threshold must be >= 0, got {}",
                threshold
            )));
        }

        Ok(Self {
            threshold,
            centroids: CentroidCalculator::default(),
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Absorb node `j` into node `i` and refresh the distances of `i`
    fn merge(
        &self,
        nodes: &mut [Node],
        distances: &mut DistanceMatrix,
        i: usize,
        j: usize,
        calculator: &DistanceCalculator,
    ) -> Result<()> {
        let absorbed = std::mem::take(&mut nodes[j].members);
        nodes[j].absorbed = true;

        let target = &mut nodes[i];
        target.members.extend(absorbed);
        target.representative = self.centroids.mean_of(&target.members)?;
        target.grown = true;

        let nodes = &*nodes;
        let updated = (0..nodes.len())
            .into_par_iter()
            .filter(|&k| k != i && !nodes[k].absorbed)
            .map(|k| {
                let distance = calculator.distance(
                    nodes[i].representative.as_object(),
                    nodes[k].representative.as_object(),
                )?;
                Ok((k, distance))
            })
            .collect::<Result<Vec<_>>>()?;

        for (k, distance) in updated {
            distances.set(i, k, distance);
        }
        Ok(())
    }
}

impl ClusteringAlgorithm for Agglomerative {
    fn name(&self) -> &'static str {
        "agglomerative"
    }

    fn cluster(
        &self,
        objects: &[DataObject],
        calculator: &DistanceCalculator,
    ) -> Result<Vec<Cluster>> {
        if objects.is_empty() {
            return Ok(Vec::new());
        }

        let mut nodes: Vec<Node> = objects
            .iter()
            .map(|object| Node {
                members: vec![object.clone()],
                representative: Centroid::from_object(object),
                absorbed: false,
                grown: false,
            })
            .collect();
        let mut distances = DistanceMatrix::build(&nodes, calculator)?;

        let mut merges = 0;
        while let Some((i, j, distance)) = distances.closest(&nodes) {
            if distance > self.threshold {
                break;
            }
            self.merge(&mut nodes, &mut distances, i, j, calculator)?;
            merges += 1;
        }

        debug!(merges, remaining = objects.len() - merges, "agglomerative finished");

        Ok(nodes
            .into_iter()
            .filter(|node| !node.absorbed)
            .enumerate()
            .map(|(index, node)| {
                Cluster::new(cluster_name(index), node.members).with_payload(
                    ClusterPayload::Agglomerative {
                        representative: node.representative,
                        merged: node.grown,
                    },
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::ParameterValue;

    fn line(values: &[f64]) -> Vec<DataObject> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let id = i as u64 + 1;
                DataObject::new(id, format!("o{}", id), vec![ParameterValue::numeric(1, *v)])
            })
            .collect()
    }

    fn largest(clusters: &[Cluster]) -> usize {
        clusters.iter().map(Cluster::len).max().unwrap_or(0)
    }

    #[test]
    fn test_agglomerative_merges_closest_first() {
        let objects = line(&[0.0, 0.1, 0.3, 0.7]);
        let agglomerative = Agglomerative::new(0.15).unwrap();
        let clusters = agglomerative
            .cluster(&objects, &DistanceCalculator::default())
            .unwrap();

        assert_eq!(clusters.len(), 3);
        assert_eq!(clusters[0].name, "Cluster 1");
        assert_eq!(clusters[0].member_ids(), vec![1, 2]);
        assert!(clusters[0].is_merged());
        assert_eq!(clusters[1].member_ids(), vec![3]);
        assert!(!clusters[1].is_merged());
        assert_eq!(clusters[2].name, "Cluster 3");
    }

    #[test]
    fn test_agglomerative_representative_is_mean() {
        let objects = line(&[0.0, 0.1, 0.3, 0.7]);
        let agglomerative = Agglomerative::new(0.3).unwrap();
        let clusters = agglomerative
            .cluster(&objects, &DistanceCalculator::default())
            .unwrap();

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].member_ids(), vec![1, 2, 3]);
        let representative = clusters[0].centroid().unwrap();
        match representative.values()[0].value {
            tabula_core::NormalizedValue::Numeric(x) => assert!((x - 0.4 / 3.0).abs() < 1e-9),
            _ => panic!("expected numeric representative"),
        }
    }

    #[test]
    fn test_agglomerative_threshold_is_inclusive() {
        let objects = line(&[0.0, 0.5]);
        let clusters = Agglomerative::new(0.5)
            .unwrap()
            .cluster(&objects, &DistanceCalculator::default())
            .unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn test_agglomerative_zero_threshold_keeps_singletons() {
        let objects = line(&[0.0, 0.1, 0.3]);
        let clusters = Agglomerative::new(0.0)
            .unwrap()
            .cluster(&objects, &DistanceCalculator::default())
            .unwrap();
        assert_eq!(clusters.len(), 3);
        assert!(clusters.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_agglomerative_monotonic_in_threshold() {
        let objects = line(&[0.0, 0.1, 0.3, 0.7]);
        let calculator = DistanceCalculator::default();

        let sizes: Vec<usize> = [0.0, 0.15, 0.3, 1.0]
            .iter()
            .map(|t| {
                let agglomerative = Agglomerative::new(*t).unwrap();
                largest(&agglomerative.cluster(&objects, &calculator).unwrap())
            })
            .collect();

        assert_eq!(sizes, vec![1, 2, 3, 4]);
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_agglomerative_objects_with_reordered_values() {
        let objects = vec![
            DataObject::new(
                1,
                "a",
                vec![ParameterValue::numeric(1, 0.0), ParameterValue::numeric(2, 0.0)],
            ),
            DataObject::new(
                2,
                "b",
                vec![ParameterValue::numeric(2, 0.0), ParameterValue::numeric(1, 0.1)],
            ),
            DataObject::new(
                3,
                "c",
                vec![ParameterValue::numeric(1, 0.9), ParameterValue::numeric(2, 0.9)],
            ),
        ];
        let clusters = Agglomerative::new(0.2)
            .unwrap()
            .cluster(&objects, &DistanceCalculator::default())
            .unwrap();

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].member_ids(), vec![1, 2]);
        assert_eq!(clusters[1].member_ids(), vec![3]);
        let representative = clusters[0].centroid().unwrap();
        assert_eq!(
            representative.values()[0].value,
            tabula_core::NormalizedValue::Numeric(0.05)
        );
    }

    #[test]
    fn test_agglomerative_every_object_kept_once() {
        let objects = line(&[0.9, 0.05, 0.5, 0.0, 0.45, 1.0]);
        let clusters = Agglomerative::new(0.1)
            .unwrap()
            .cluster(&objects, &DistanceCalculator::default())
            .unwrap();

        let mut ids: Vec<u64> = clusters.iter().flat_map(Cluster::member_ids).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_agglomerative_invalid_settings() {
        assert!(matches!(Agglomerative::new(-0.1), Err(Error::InvalidSettings(_))));
        assert!(Agglomerative::new(f64::NAN).is_err());
    }

    #[test]
    fn test_agglomerative_empty_input() {
        let clusters = Agglomerative::new(0.5)
            .unwrap()
            .cluster(&[], &DistanceCalculator::default())
            .unwrap();
        assert!(clusters.is_empty());
    }
}
