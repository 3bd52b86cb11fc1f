//! Parameter definitions
//!
//! A parameter is one named column of a dataset. Its declared type decides
//! which normalizer, distance metric and comparison rule apply to its values.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ParameterId = u64;

/// Declared type of a parameter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    /// Real-valued column, min-max scaled during normalization
    Numeric,
    /// Multi-label column of comma-separated tokens, one-hot encoded
    Categorical,
}

impl FromStr for ParameterType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numeric" => Ok(ParameterType::Numeric),
            "categorical" => Ok(ParameterType::Categorical),
            other => Err(Error::UnknownParameterType(other.to_string())),
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Numeric => write!(f, "numeric"),
            ParameterType::Categorical => write!(f, "categorical"),
        }
    }
}

/// State of a single parameter for one analysis request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterState {
    pub id: ParameterId,
    pub name: String,

    #[serde(rename = "type")]
    pub parameter_type: ParameterType,

    /// Inactive parameters are ignored by similarity scoring
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Relative importance in weighted similarity
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_active() -> bool {
    true
}

fn default_weight() -> f64 {
    1.0
}

impl ParameterState {
    pub fn new(id: ParameterId, name: impl Into<String>, parameter_type: ParameterType) -> Self {
        Self {
            id,
            name: name.into(),
            parameter_type,
            is_active: true,
            weight: 1.0,
        }
    }

    pub fn numeric(id: ParameterId, name: impl Into<String>) -> Self {
        Self::new(id, name, ParameterType::Numeric)
    }

    pub fn categorical(id: ParameterId, name: impl Into<String>) -> Self {
        Self::new(id, name, ParameterType::Categorical)
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.parameter_type == ParameterType::Numeric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_type_from_str() {
        assert_eq!("numeric".parse::<ParameterType>().unwrap(), ParameterType::Numeric);
        assert_eq!(" Categorical ".parse::<ParameterType>().unwrap(), ParameterType::Categorical);
        assert!(matches!(
            "ordinal".parse::<ParameterType>(),
            Err(Error::UnknownParameterType(_))
        ));
    }

    #[test]
    fn test_serde_defaults() {
        let json = r#"{"id": 3, "name": "color", "type": "categorical"}"#;
        let parsed: ParameterState = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.parameter_type, ParameterType::Categorical);
        assert!(parsed.is_active);
        assert_eq!(parsed.weight, 1.0);
    }

    #[test]
    fn test_unknown_type_rejected_by_serde() {
        let json = r#"{"id": 3, "name": "color", "type": "ordinal"}"#;
        assert!(serde_json::from_str::<ParameterState>(json).is_err());
    }
}
