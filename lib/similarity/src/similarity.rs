//! All-pairs weighted similarity
//!
//! Scores every unordered pair of objects in a dataset by comparing the raw
//! values of each active parameter and averaging the per-parameter
//! similarities by parameter weight.

use crate::comparer::{parse_number, ValueComparer};
use ahash::AHashMap;
use rayon::prelude::*;
use serde::Serialize;
use tabula_core::{DataObject, Dataset, Error, ParameterId, ParameterState, Result};
use tracing::{debug, info};

/// Similarity of one unordered object pair
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityPair<'a> {
    pub first: &'a DataObject,
    pub second: &'a DataObject,
    /// Weighted similarity in [0, 1]
    pub similarity: f64,
}

/// An active parameter together with the range used to scale its differences
#[derive(Debug, Clone)]
struct ScoredParameter<'a> {
    state: &'a ParameterState,
    max_range: f64,
}

/// Computes weighted similarity for every pair of objects in a dataset
#[derive(Debug, Clone)]
pub struct SimilarityComparer<C> {
    comparer: C,
}

impl<C: ValueComparer> SimilarityComparer<C> {
    pub fn new(comparer: C) -> Self {
        Self { comparer }
    }

    pub fn comparer(&self) -> &C {
        &self.comparer
    }

    /// Score all pairs (i, j) with i < j, in row-major order
    pub fn compare_all<'a>(&self, dataset: &'a Dataset) -> Result<Vec<SimilarityPair<'a>>> {
        if dataset.objects.is_empty() {
            return Err(Error::EmptyDataset);
        }
        if dataset.parameters.is_empty() {
            return Err(Error::NoParameters);
        }

        let ranges = numeric_ranges(dataset);
        let parameters: Vec<ScoredParameter> = dataset
            .active_parameters()
            .map(|state| ScoredParameter {
                state,
                max_range: if state.is_numeric() {
                    ranges.get(&state.id).copied().unwrap_or(1.0)
                } else {
                    1.0
                },
            })
            .collect();
        debug!(
            active = parameters.len(),
            total = dataset.parameters.len(),
            "scoring parameters"
        );

        let objects = &dataset.objects;
        let n = objects.len();
        let rows = (0..n)
            .into_par_iter()
            .map(|i| {
                ((i + 1)..n)
                    .map(|j| self.score_pair(&objects[i], &objects[j], &parameters))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let pairs: Vec<SimilarityPair> = rows.into_iter().flatten().collect();
        info!(dataset = dataset.id, pairs = pairs.len(), "compared all objects");
        Ok(pairs)
    }

    fn score_pair<'a>(
        &self,
        first: &'a DataObject,
        second: &'a DataObject,
        parameters: &[ScoredParameter],
    ) -> Result<SimilarityPair<'a>> {
        if first.values.len() != second.values.len() {
            return Err(Error::LengthMismatch {
                left: first.values.len(),
                right: second.values.len(),
            });
        }
        if first.values.is_empty() {
            return Err(Error::EmptyVector);
        }

        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;

        for parameter in parameters {
            let (Some(a), Some(b)) = (
                first.value_for(parameter.state.id),
                second.value_for(parameter.state.id),
            ) else {
                continue;
            };

            let similarity =
                self.comparer
                    .compare(parameter.state, &a.raw, &b.raw, parameter.max_range)?;
            weighted_sum += similarity * parameter.state.weight;
            weight_total += parameter.state.weight;
        }

        let similarity = if weight_total > 0.0 {
            (weighted_sum / weight_total).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(SimilarityPair {
            first,
            second,
            similarity,
        })
    }
}

/// Score all object pairs of `dataset` using `comparer`
pub fn compare_all_objects<'a, C: ValueComparer>(
    dataset: &'a Dataset,
    comparer: C,
) -> Result<Vec<SimilarityPair<'a>>> {
    SimilarityComparer::new(comparer).compare_all(dataset)
}

/// Per numeric parameter: max - min over parseable values, 1.0 when constant
/// or when nothing parses
fn numeric_ranges(dataset: &Dataset) -> AHashMap<ParameterId, f64> {
    dataset
        .parameters
        .iter()
        .filter(|p| p.is_numeric())
        .map(|parameter| {
            let (min, max) = dataset
                .objects
                .iter()
                .filter_map(|o| o.value_for(parameter.id))
                .filter_map(|v| parse_number(parameter, &v.raw).ok().flatten())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                });
            let range = max - min;
            let range = if range.is_finite() && range > 0.0 { range } else { 1.0 };
            (parameter.id, range)
        })
        .collect()
}
