//! Distance metrics over normalized vectors
//!
//! Every metric returns a distance in [0.0, 1.0] where 0.0 means identical.
//! Numeric metrics work on min-max scaled values, categorical metrics on
//! one-hot bit vectors.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reject vectors that cannot be compared element-for-element
pub fn validate_pair<T>(a: &[T], b: &[T]) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    if a.is_empty() {
        return Err(Error::EmptyVector);
    }
    Ok(())
}

/// Metric for numeric sub-vectors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NumericMetric {
    /// sqrt(sum((a - b)^2)) / sqrt(n)
    #[default]
    Euclidean,
    /// sum(|a - b|) / n
    Manhattan,
    /// 1 - cos(a, b); 1.0 when either vector has zero magnitude
    Cosine,
}

impl NumericMetric {
    pub fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        validate_pair(a, b)?;
        let n = a.len() as f64;

        let distance = match self {
            NumericMetric::Euclidean => {
                let sum: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                sum.sqrt() / n.sqrt()
            }
            NumericMetric::Manhattan => {
                a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum::<f64>() / n
            }
            NumericMetric::Cosine => {
                let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
                let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
                if norm_a == 0.0 || norm_b == 0.0 {
                    1.0
                } else {
                    1.0 - dot / (norm_a * norm_b)
                }
            }
        };

        Ok(distance.clamp(0.0, 1.0))
    }
}

impl FromStr for NumericMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(NumericMetric::Euclidean),
            "manhattan" => Ok(NumericMetric::Manhattan),
            "cosine" => Ok(NumericMetric::Cosine),
            other => Err(Error::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for NumericMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumericMetric::Euclidean => "euclidean",
            NumericMetric::Manhattan => "manhattan",
            NumericMetric::Cosine => "cosine",
        };
        f.write_str(name)
    }
}

/// Metric for one-hot categorical sub-vectors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoricalMetric {
    /// Fraction of differing bit positions
    Hamming,
    /// 1 - |A ∩ B| / |A ∪ B|; 0.0 when both sets are empty
    #[default]
    Jaccard,
}

impl CategoricalMetric {
    pub fn distance(&self, a: &[u8], b: &[u8]) -> Result<f64> {
        validate_pair(a, b)?;

        let distance = match self {
            CategoricalMetric::Hamming => {
                let differing = a.iter().zip(b).filter(|(x, y)| (**x != 0) != (**y != 0)).count();
                differing as f64 / a.len() as f64
            }
            CategoricalMetric::Jaccard => {
                let (intersection, union) =
                    a.iter().zip(b).fold((0usize, 0usize), |(i, u), (x, y)| {
                        let (x, y) = (*x != 0, *y != 0);
                        (i + (x && y) as usize, u + (x || y) as usize)
                    });
                if union == 0 {
                    0.0
                } else {
                    1.0 - intersection as f64 / union as f64
                }
            }
        };

        Ok(distance.clamp(0.0, 1.0))
    }
}

impl FromStr for CategoricalMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hamming" => Ok(CategoricalMetric::Hamming),
            "jaccard" => Ok(CategoricalMetric::Jaccard),
            other => Err(Error::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Display for CategoricalMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CategoricalMetric::Hamming => "hamming",
            CategoricalMetric::Jaccard => "jaccard",
        };
        f.write_str(name)
    }
}
