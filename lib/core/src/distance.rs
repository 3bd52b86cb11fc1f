//! Mixed-type distance between two objects
//!
//! Each object's values are ordered by parameter id and split into a numeric
//! sub-vector and a categorical sub-vector (one-hot bits concatenated). The
//! two partial distances are combined as an average weighted by sub-vector
//! length.

use crate::metric::{validate_pair, CategoricalMetric, NumericMetric};
use crate::object::{DataObject, NormalizedValue, ParameterValue};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Numeric and categorical sub-vectors of one object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitVector {
    pub numeric: Vec<f64>,
    pub categorical: Vec<u8>,
}

impl SplitVector {
    /// Partition values (in parameter id order) by normalized variant
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a ParameterValue>) -> Result<Self> {
        let mut split = SplitVector::default();
        for value in values {
            match &value.value {
                NormalizedValue::Numeric(v) => split.numeric.push(*v),
                NormalizedValue::Categorical(bits) => split.categorical.extend_from_slice(bits),
                NormalizedValue::Raw => {
                    return Err(Error::UnsupportedValue {
                        parameter_id: value.parameter_id,
                        variant: value.value.variant_name(),
                    })
                }
            }
        }
        Ok(split)
    }

    pub fn from_object(object: &DataObject) -> Result<Self> {
        Self::from_values(object.sorted_values())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DistanceCalculator {
    #[serde(default)]
    pub numeric_metric: NumericMetric,
    #[serde(default)]
    pub categorical_metric: CategoricalMetric,
}

impl DistanceCalculator {
    pub fn new(numeric_metric: NumericMetric, categorical_metric: CategoricalMetric) -> Self {
        Self {
            numeric_metric,
            categorical_metric,
        }
    }

    /// Distance in [0, 1] between two normalized objects
    pub fn distance(&self, a: &DataObject, b: &DataObject) -> Result<f64> {
        validate_pair(&a.values, &b.values)?;

        let values_a = a.sorted_values();
        let values_b = b.sorted_values();
        for (va, vb) in values_a.iter().zip(&values_b) {
            if va.parameter_id != vb.parameter_id {
                return Err(Error::ParameterMismatch {
                    expected: va.parameter_id,
                    actual: vb.parameter_id,
                });
            }
        }

        let split_a = SplitVector::from_values(values_a)?;
        let split_b = SplitVector::from_values(values_b)?;
        self.split_distance(&split_a, &split_b)
    }

    /// Distance between two already-partitioned vectors
    pub fn split_distance(&self, a: &SplitVector, b: &SplitVector) -> Result<f64> {
        let numeric_count = a.numeric.len();
        let categorical_count = a.categorical.len();

        let numeric_distance = if a.numeric.is_empty() || b.numeric.is_empty() {
            0.0
        } else {
            self.numeric_metric.distance(&a.numeric, &b.numeric)?
        };
        let categorical_distance = if a.categorical.is_empty() || b.categorical.is_empty() {
            0.0
        } else {
            self.categorical_metric.distance(&a.categorical, &b.categorical)?
        };

        let total = numeric_count + categorical_count;
        if total == 0 {
            return Ok(0.0);
        }

        Ok((numeric_distance * numeric_count as f64
            + categorical_distance * categorical_count as f64)
            / total as f64)
    }
}
