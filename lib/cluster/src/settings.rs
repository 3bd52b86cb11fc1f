//! Clustering settings
//!
//! Settings arrive range-checked from the caller; only structurally invalid
//! values are rejected here, before any clustering starts.

use crate::agglomerative::Agglomerative;
use crate::dbscan::Dbscan;
use crate::kmeans::KMeans;
use crate::ClusteringAlgorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tabula_core::{CategoricalMetric, DistanceCalculator, Error, NumericMetric, Result};

pub const DEFAULT_MAX_ITERATIONS: usize = 100;

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

/// Identifier used to select an algorithm
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    KMeans,
    Dbscan,
    Agglomerative,
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kmeans" | "k-means" => Ok(AlgorithmKind::KMeans),
            "dbscan" => Ok(AlgorithmKind::Dbscan),
            "agglomerative" | "hierarchical" => Ok(AlgorithmKind::Agglomerative),
            other => Err(Error::UnknownAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlgorithmKind::KMeans => "kmeans",
            AlgorithmKind::Dbscan => "dbscan",
            AlgorithmKind::Agglomerative => "agglomerative",
        };
        f.write_str(name)
    }
}

/// Algorithm-specific parameters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AlgorithmSettings {
    KMeans {
        number_of_clusters: usize,
        #[serde(default = "default_max_iterations")]
        max_iterations: usize,
    },
    Dbscan {
        epsilon: f64,
        min_points: usize,
    },
    Agglomerative {
        threshold: f64,
    },
}

impl AlgorithmSettings {
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            AlgorithmSettings::KMeans { .. } => AlgorithmKind::KMeans,
            AlgorithmSettings::Dbscan { .. } => AlgorithmKind::Dbscan,
            AlgorithmSettings::Agglomerative { .. } => AlgorithmKind::Agglomerative,
        }
    }

    /// Instantiate the configured algorithm, validating its parameters
    pub fn build(&self) -> Result<Box<dyn ClusteringAlgorithm>> {
        Ok(match *self {
            AlgorithmSettings::KMeans {
                number_of_clusters,
                max_iterations,
            } => Box::new(KMeans::new(number_of_clusters, max_iterations)?),
            AlgorithmSettings::Dbscan {
                epsilon,
                min_points,
            } => Box::new(Dbscan::new(epsilon, min_points)?),
            AlgorithmSettings::Agglomerative { threshold } => {
                Box::new(Agglomerative::new(threshold)?)
            }
        })
    }
}

/// Full settings of one clustering request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusteringSettings {
    #[serde(default)]
    pub numeric_metric: NumericMetric,
    #[serde(default)]
    pub categorical_metric: CategoricalMetric,
    /// Whether member values are reported downstream
    #[serde(default)]
    pub include_parameters: bool,
    pub algorithm: AlgorithmSettings,
}

impl ClusteringSettings {
    pub fn new(algorithm: AlgorithmSettings) -> Self {
        Self {
            numeric_metric: NumericMetric::default(),
            categorical_metric: CategoricalMetric::default(),
            include_parameters: false,
            algorithm,
        }
    }

    pub fn kmeans(number_of_clusters: usize, max_iterations: usize) -> Self {
        Self::new(AlgorithmSettings::KMeans {
            number_of_clusters,
            max_iterations,
        })
    }

    pub fn dbscan(epsilon: f64, min_points: usize) -> Self {
        Self::new(AlgorithmSettings::Dbscan {
            epsilon,
            min_points,
        })
    }

    pub fn agglomerative(threshold: f64) -> Self {
        Self::new(AlgorithmSettings::Agglomerative { threshold })
    }

    pub fn with_metrics(mut self, numeric: NumericMetric, categorical: CategoricalMetric) -> Self {
        self.numeric_metric = numeric;
        self.categorical_metric = categorical;
        self
    }

    pub fn calculator(&self) -> DistanceCalculator {
        DistanceCalculator::new(self.numeric_metric, self.categorical_metric)
    }

    pub fn validate(&self) -> Result<()> {
        self.algorithm.build().map(|_| ())
    }
}
