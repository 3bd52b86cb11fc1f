//! Dataset container
//!
//! A dataset is a list of parameter definitions plus the objects whose
//! values are aligned against them.

use crate::object::DataObject;
use crate::parameter::{ParameterId, ParameterState};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dataset {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterState>,
    #[serde(default)]
    pub objects: Vec<DataObject>,
}

impl Dataset {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        parameters: Vec<ParameterState>,
        objects: Vec<DataObject>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            parameters,
            objects,
        }
    }

    pub fn parameter(&self, id: ParameterId) -> Option<&ParameterState> {
        self.parameters.iter().find(|p| p.id == id)
    }

    pub fn active_parameters(&self) -> impl Iterator<Item = &ParameterState> {
        self.parameters.iter().filter(|p| p.is_active)
    }

    /// Check that every object references declared parameters and that all
    /// objects share the same parameter alignment
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.objects.first() else {
            return Ok(());
        };
        let reference: Vec<ParameterId> =
            first.sorted_values().iter().map(|v| v.parameter_id).collect();

        for object in &self.objects {
            if object.len() != reference.len() {
                return Err(Error::LengthMismatch {
                    left: reference.len(),
                    right: object.len(),
                });
            }
            for (expected, value) in reference.iter().zip(object.sorted_values()) {
                if self.parameter(value.parameter_id).is_none() {
                    return Err(Error::UnknownParameter(value.parameter_id));
                }
                if *expected != value.parameter_id {
                    return Err(Error::ParameterMismatch {
                        expected: *expected,
                        actual: value.parameter_id,
                    });
                }
            }
        }

        Ok(())
    }

    /// Rescale parameter weights so that they sum to 1.0
    pub fn normalize_weights(&mut self) -> Result<()> {
        if self.parameters.is_empty() {
            return Err(Error::NoParameters);
        }

        for parameter in &self.parameters {
            if parameter.weight < 0.0 {
                return Err(Error::NegativeWeight(parameter.name.clone()));
            }
        }

        let weight_sum: f64 = self.parameters.iter().map(|p| p.weight).sum();
        if weight_sum <= 0.0 {
            return Err(Error::ZeroTotalWeight);
        }

        if (weight_sum - 1.0).abs() > 1e-9 {
            for parameter in &mut self.parameters {
                parameter.weight /= weight_sum;
            }
        }

        Ok(())
    }
}
