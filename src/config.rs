//! Loading datasets and clustering settings from JSON files

use std::fs;
use std::path::{Path, PathBuf};
use tabula_cluster::ClusteringSettings;
use tabula_core::Dataset;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Invalid(#[from] tabula_core::Error),
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path, text: &str) -> Result<T, LoadError> {
    serde_json::from_str(text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Check a freshly parsed dataset and rescale its weights to sum to 1
pub fn prepare_dataset(mut dataset: Dataset) -> Result<Dataset, LoadError> {
    dataset.validate()?;
    if !dataset.parameters.is_empty() {
        dataset.normalize_weights()?;
    }
    Ok(dataset)
}

pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let dataset: Dataset = parse(path, &read(path)?)?;
    debug!(
        parameters = dataset.parameters.len(),
        objects = dataset.objects.len(),
        "dataset loaded from {}",
        path.display()
    );
    prepare_dataset(dataset)
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<ClusteringSettings, LoadError> {
    let path = path.as_ref();
    let settings: ClusteringSettings = parse(path, &read(path)?)?;
    settings.validate()?;
    Ok(settings)
}
