//! Principal component projection onto two axes
//!
//! Every object becomes one row of a feature matrix: numeric values followed
//! by categorical one-hot bits, both in parameter id order. Rows are centered,
//! the column covariance is eigen-decomposed, and each row is projected onto
//! the two eigenvectors with the largest eigenvalues.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tabula_core::{DataObject, Error, ObjectId, Result, SplitVector};
use tracing::debug;

/// Number of output dimensions
pub const DIMENSIONS: usize = 2;

/// Projected position of one object
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DataObjectCoordinate {
    pub object_id: ObjectId,
    pub x: f64,
    pub y: f64,
}

impl DataObjectCoordinate {
    pub fn new(object_id: ObjectId, x: f64, y: f64) -> Self {
        Self { object_id, x, y }
    }
}

/// Eigenvectors (as columns) and eigenvalues of one symmetric matrix
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    pub eigenvectors: DMatrix<f64>,
    pub eigenvalues: DVector<f64>,
}

impl EigenDecomposition {
    pub fn of_symmetric(matrix: DMatrix<f64>) -> Self {
        let eigen = matrix.symmetric_eigen();
        Self {
            eigenvectors: eigen.eigenvectors,
            eigenvalues: eigen.eigenvalues,
        }
    }

    /// Eigenvector indices by descending eigenvalue; ties keep index order
    pub fn ranked(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| self.eigenvalues[b].total_cmp(&self.eigenvalues[a]));
        order
    }

    /// `features x count` projection matrix built from the top `count`
    /// eigenvectors; slots without an eigenvector stay zero
    pub fn principal_axes(self, count: usize) -> DMatrix<f64> {
        let features = self.eigenvectors.nrows();
        let mut axes = DMatrix::zeros(features, count);
        for (slot, index) in self.ranked().into_iter().take(count).enumerate() {
            for row in 0..features {
                axes[(row, slot)] = self.eigenvectors[(row, index)];
            }
        }
        axes
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PcaReducer;

impl PcaReducer {
    pub fn new() -> Self {
        Self
    }

    /// One feature row per object; every row must have the same width
    pub fn feature_rows(&self, objects: &[DataObject]) -> Result<Vec<Vec<f64>>> {
        let rows = objects
            .iter()
            .map(|object| {
                let split = SplitVector::from_object(object)?;
                let mut row = split.numeric;
                row.extend(split.categorical.into_iter().map(f64::from));
                Ok(row)
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        if let Some(first) = rows.first() {
            if let Some(row) = rows.iter().find(|r| r.len() != first.len()) {
                return Err(Error::LengthMismatch {
                    left: first.len(),
                    right: row.len(),
                });
            }
        }
        Ok(rows)
    }

    pub fn reduce(&self, objects: &[DataObject]) -> Result<Vec<DataObjectCoordinate>> {
        if objects.is_empty() {
            return Ok(Vec::new());
        }

        let rows = self.feature_rows(objects)?;
        let samples = rows.len();
        let features = rows[0].len();
        if features == 0 {
            return Ok(objects
                .iter()
                .map(|o| DataObjectCoordinate::new(o.id, 0.0, 0.0))
                .collect());
        }

        let means: Vec<f64> = (0..features)
            .map(|c| rows.iter().map(|r| r[c]).sum::<f64>() / samples as f64)
            .collect();
        let centered = DMatrix::from_fn(samples, features, |r, c| rows[r][c] - means[c]);

        let divisor = samples.saturating_sub(1).max(1) as f64;
        let covariance = (centered.transpose() * &centered) / divisor;

        let axes = EigenDecomposition::of_symmetric(covariance).principal_axes(DIMENSIONS);
        let projected = &centered * &axes;
        debug!(samples, features, "pca projection computed");

        Ok(objects
            .iter()
            .enumerate()
            .map(|(r, o)| DataObjectCoordinate::new(o.id, projected[(r, 0)], projected[(r, 1)]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::ParameterValue;

    const EPS: f64 = 1e-9;

    fn numeric(id: u64, values: &[f64]) -> DataObject {
        DataObject::new(
            id,
            format!("o{}", id),
            values
                .iter()
                .enumerate()
                .map(|(i, v)| ParameterValue::numeric(i as u64 + 1, *v))
                .collect(),
        )
    }

    #[test]
    fn test_empty_input() {
        assert!(PcaReducer::new().reduce(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_zero_features_map_to_origin() {
        let objects = vec![DataObject::new(1, "a", vec![]), DataObject::new(2, "b", vec![])];
        let coords = PcaReducer::new().reduce(&objects).unwrap();
        assert_eq!(
            coords,
            vec![DataObjectCoordinate::new(1, 0.0, 0.0), DataObjectCoordinate::new(2, 0.0, 0.0)]
        );
    }

    #[test]
    fn test_identical_objects_collapse() {
        let objects = vec![
            numeric(1, &[0.3, 0.7]),
            numeric(2, &[0.3, 0.7]),
            numeric(3, &[0.3, 0.7]),
        ];
        let coords = PcaReducer::new().reduce(&objects).unwrap();
        for c in &coords {
            assert!((c.x - coords[0].x).abs() < EPS);
            assert!((c.y - coords[0].y).abs() < EPS);
        }
    }

    #[test]
    fn test_collinear_points_lie_on_first_axis() {
        let objects = vec![
            numeric(1, &[0.0, 0.0]),
            numeric(2, &[0.5, 0.5]),
            numeric(3, &[1.0, 1.0]),
        ];
        let coords = PcaReducer::new().reduce(&objects).unwrap();

        let half_diagonal = 0.5 * 2f64.sqrt();
        assert!((coords[0].x.abs() - half_diagonal).abs() < 1e-6);
        assert!(coords[1].x.abs() < 1e-6);
        assert!((coords[0].x + coords[2].x).abs() < 1e-6);
        assert!(coords.iter().all(|c| c.y.abs() < 1e-6));
    }

    #[test]
    fn test_single_feature_has_zero_second_axis() {
        let objects = vec![numeric(1, &[0.0]), numeric(2, &[1.0])];
        let coords = PcaReducer::new().reduce(&objects).unwrap();
        assert!((coords[0].x.abs() - 0.5).abs() < EPS);
        assert!((coords[1].x.abs() - 0.5).abs() < EPS);
        assert_eq!(coords[0].y, 0.0);
        assert_eq!(coords[1].y, 0.0);
    }

    #[test]
    fn test_categorical_bits_are_features() {
        let objects = vec![
            DataObject::new(1, "a", vec![ParameterValue::categorical(1, vec![1, 0])]),
            DataObject::new(2, "b", vec![ParameterValue::categorical(1, vec![0, 1])]),
        ];
        let rows = PcaReducer::new().feature_rows(&objects).unwrap();
        assert_eq!(rows, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);

        let coords = PcaReducer::new().reduce(&objects).unwrap();
        assert!((coords[0].x + coords[1].x).abs() < 1e-6);
        assert!(coords[0].x.abs() > 0.1);
    }

    #[test]
    fn test_ranked_ties_keep_index_order() {
        let eigen = EigenDecomposition {
            eigenvectors: DMatrix::identity(3, 3),
            eigenvalues: DVector::from_vec(vec![1.0, 2.0, 1.0]),
        };
        assert_eq!(eigen.ranked(), vec![1, 0, 2]);
    }

    #[test]
    fn test_raw_values_rejected() {
        let objects = vec![DataObject::new(1, "a", vec![ParameterValue::raw(1, "3")])];
        assert!(matches!(
            PcaReducer::new().reduce(&objects),
            Err(Error::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let objects = vec![numeric(1, &[0.1, 0.2]), numeric(2, &[0.1])];
        assert!(matches!(
            PcaReducer::new().reduce(&objects),
            Err(Error::LengthMismatch { left: 2, right: 1 })
        ));
    }
}
