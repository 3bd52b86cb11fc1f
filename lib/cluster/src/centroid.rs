//! Centroids and their incremental recalculation
//!
//! A centroid is a synthetic object shaped like the objects it summarizes.
//! Numeric values hold a running mean; categorical values hold a majority
//! one-hot vector obtained by thresholding the averaged bits.

use serde::Serialize;
use tabula_core::{DataObject, Error, NormalizedValue, ParameterValue, Result};

/// Averaged bits at or above this value become 1
pub const CATEGORICAL_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Centroid {
    object: DataObject,
}

impl Centroid {
    /// Seed a centroid with the values of an existing object
    ///
    /// The centroid never carries the seed's id or name.
    pub fn from_object(object: &DataObject) -> Self {
        Self::from_values(object.values.clone())
    }

    pub fn from_values(values: Vec<ParameterValue>) -> Self {
        Self {
            object: DataObject::new(0, "centroid", values),
        }
    }

    #[inline]
    pub fn as_object(&self) -> &DataObject {
        &self.object
    }

    #[inline]
    pub fn values(&self) -> &[ParameterValue] {
        &self.object.values
    }
}

/// Per-parameter accumulator used while merging
enum Accumulator {
    Numeric(f64),
    Categorical(Vec<f64>),
}

impl Accumulator {
    fn start(value: &ParameterValue) -> Result<Self> {
        match &value.value {
            NormalizedValue::Numeric(v) => Ok(Accumulator::Numeric(*v)),
            NormalizedValue::Categorical(bits) => {
                Ok(Accumulator::Categorical(bits.iter().map(|b| *b as f64).collect()))
            }
            NormalizedValue::Raw => Err(unsupported(value)),
        }
    }

    fn add(&mut self, value: &ParameterValue) -> Result<()> {
        match (self, &value.value) {
            (Accumulator::Numeric(sum), NormalizedValue::Numeric(v)) => *sum += v,
            (Accumulator::Categorical(sums), NormalizedValue::Categorical(bits)) => {
                if sums.len() != bits.len() {
                    return Err(Error::LengthMismatch {
                        left: sums.len(),
                        right: bits.len(),
                    });
                }
                sums.iter_mut().zip(bits).for_each(|(s, b)| *s += *b as f64);
            }
            _ => return Err(unsupported(value)),
        }
        Ok(())
    }

    fn finish(self, count: f64, threshold: f64) -> NormalizedValue {
        match self {
            Accumulator::Numeric(sum) => NormalizedValue::Numeric(sum / count),
            Accumulator::Categorical(sums) => NormalizedValue::Categorical(
                sums.into_iter().map(|s| (s / count >= threshold) as u8).collect(),
            ),
        }
    }
}

/// Values of `object` in the parameter order of `base`
fn align<'a>(base: &[&ParameterValue], object: &'a DataObject) -> Result<Vec<&'a ParameterValue>> {
    if object.values.len() != base.len() {
        return Err(Error::LengthMismatch {
            left: base.len(),
            right: object.values.len(),
        });
    }
    let sorted = object.sorted_values();
    for (expected, value) in base.iter().zip(&sorted) {
        if value.parameter_id != expected.parameter_id {
            return Err(Error::ParameterMismatch {
                expected: expected.parameter_id,
                actual: value.parameter_id,
            });
        }
    }
    Ok(sorted)
}

fn unsupported(value: &ParameterValue) -> Error {
    Error::UnsupportedValue {
        parameter_id: value.parameter_id,
        variant: value.value.variant_name(),
    }
}

/// Merges objects into centroids
#[derive(Debug, Clone, Copy)]
pub struct CentroidCalculator {
    threshold: f64,
}

impl Default for CentroidCalculator {
    fn default() -> Self {
        Self {
            threshold: CATEGORICAL_THRESHOLD,
        }
    }
}

impl CentroidCalculator {
    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Average `centroid` with every object in `merge_objects`
    ///
    /// Values are matched by parameter id, so merge objects may list their
    /// values in any order. Returns a new centroid with values sorted by
    /// parameter id; the input is left untouched. An empty merge list
    /// returns an unchanged copy.
    pub fn recalculate(
        &self,
        centroid: &Centroid,
        merge_objects: &[&DataObject],
    ) -> Result<Centroid> {
        if merge_objects.is_empty() {
            return Ok(centroid.clone());
        }

        let base = centroid.as_object().sorted_values();
        let aligned = merge_objects
            .iter()
            .map(|object| align(&base, object))
            .collect::<Result<Vec<_>>>()?;

        let count = (merge_objects.len() + 1) as f64;
        let values = base
            .iter()
            .enumerate()
            .map(|(index, base)| {
                let mut accumulator = Accumulator::start(base)?;
                for values in &aligned {
                    accumulator.add(values[index])?;
                }
                Ok(ParameterValue {
                    parameter_id: base.parameter_id,
                    raw: String::new(),
                    value: accumulator.finish(count, self.threshold),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Centroid::from_values(values))
    }

    /// Mean of a non-empty group of objects
    pub fn mean_of(&self, objects: &[DataObject]) -> Result<Centroid> {
        let (first, rest) = objects.split_first().ok_or(Error::EmptyVector)?;
        let rest: Vec<&DataObject> = rest.iter().collect();
        self.recalculate(&Centroid::from_object(first), &rest)
    }
}
