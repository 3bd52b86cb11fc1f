//! Whole-dataset normalization
//!
//! Runs two passes over the objects: the first feeds every raw value into
//! its parameter's normalizer, the second emits the normalized values.
//! Normalizers live only for the duration of one call.

use crate::dataset::Dataset;
use crate::normalizer::{normalizer_for, ParameterNormalizer};
use crate::object::DataObject;
use crate::parameter::ParameterId;
use crate::{Error, Result};
use ahash::AHashMap;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Produce a normalized copy of `dataset`
pub fn normalize(dataset: &Dataset) -> Result<Dataset> {
    let mut normalizers: AHashMap<ParameterId, Box<dyn ParameterNormalizer>> = AHashMap::new();

    for object in &dataset.objects {
        for value in &object.values {
            let normalizer = match normalizers.entry(value.parameter_id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    let parameter = dataset
                        .parameter(value.parameter_id)
                        .ok_or(Error::UnknownParameter(value.parameter_id))?;
                    entry.insert(normalizer_for(parameter))
                }
            };
            normalizer.add_value(&value.raw)?;
        }
    }

    let objects = dataset
        .objects
        .iter()
        .map(|object| {
            let values = object
                .values
                .iter()
                .map(|value| {
                    let normalizer = normalizers
                        .get(&value.parameter_id)
                        .ok_or(Error::UnknownParameter(value.parameter_id))?;
                    Ok(value.with_value(normalizer.normalize(&value.raw)?))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(DataObject::new(object.id, object.name.clone(), values))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        dataset = dataset.id,
        objects = objects.len(),
        parameters = normalizers.len(),
        "normalized dataset"
    );

    Ok(Dataset::new(
        dataset.id,
        dataset.name.clone(),
        dataset.parameters.clone(),
        objects,
    ))
}
