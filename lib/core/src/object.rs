use crate::parameter::ParameterId;
use serde::{Deserialize, Serialize};

pub type ObjectId = u64;

/// The normalized form of a parameter value
///
/// Values start out as `Raw` when loaded and are replaced by one of the
/// normalized variants by the dataset normalizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum NormalizedValue {
    /// Not normalized yet; only the raw string is meaningful
    #[default]
    Raw,
    /// Min-max scaled number in [0, 1]
    Numeric(f64),
    /// One-hot bits over the parameter's category vocabulary
    Categorical(Vec<u8>),
}

impl NormalizedValue {
    pub fn variant_name(&self) -> &'static str {
        match self {
            NormalizedValue::Raw => "raw",
            NormalizedValue::Numeric(_) => "numeric",
            NormalizedValue::Categorical(_) => "categorical",
        }
    }
}

/// A value bound to one parameter
///
/// `Clone` is a deep copy: each clone owns its one-hot buffer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterValue {
    pub parameter_id: ParameterId,
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub value: NormalizedValue,
}

impl ParameterValue {
    pub fn raw(parameter_id: ParameterId, raw: impl Into<String>) -> Self {
        Self {
            parameter_id,
            raw: raw.into(),
            value: NormalizedValue::Raw,
        }
    }

    pub fn numeric(parameter_id: ParameterId, value: f64) -> Self {
        Self {
            parameter_id,
            raw: value.to_string(),
            value: NormalizedValue::Numeric(value),
        }
    }

    pub fn categorical(parameter_id: ParameterId, bits: Vec<u8>) -> Self {
        Self {
            parameter_id,
            raw: String::new(),
            value: NormalizedValue::Categorical(bits),
        }
    }

    /// Copy with the same parameter and raw text but a new normalized value
    pub fn with_value(&self, value: NormalizedValue) -> Self {
        Self {
            parameter_id: self.parameter_id,
            raw: self.raw.clone(),
            value,
        }
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// A single row of a dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataObject {
    pub id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub values: Vec<ParameterValue>,
}

impl DataObject {
    pub fn new(id: ObjectId, name: impl Into<String>, values: Vec<ParameterValue>) -> Self {
        Self {
            id,
            name: name.into(),
            values,
        }
    }

    pub fn value_for(&self, parameter_id: ParameterId) -> Option<&ParameterValue> {
        self.values.iter().find(|v| v.parameter_id == parameter_id)
    }

    /// Values ordered by parameter id, the alignment used by vector math
    pub fn sorted_values(&self) -> Vec<&ParameterValue> {
        let mut values: Vec<_> = self.values.iter().collect();
        values.sort_by_key(|v| v.parameter_id);
        values
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
