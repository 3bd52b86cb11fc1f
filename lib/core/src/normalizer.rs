//! Per-parameter normalizers
//!
//! A normalizer first observes every raw value of its parameter through
//! [`ParameterNormalizer::add_value`] and then maps raw values to their
//! normalized form. The final output does not depend on the order in which
//! values were observed.

use crate::object::NormalizedValue;
use crate::parameter::{ParameterState, ParameterType};
use crate::{Error, Result};
use ahash::AHashMap;

/// Running statistics for one parameter
pub trait ParameterNormalizer: Send {
    /// Fold one more observation into the statistics
    fn add_value(&mut self, raw: &str) -> Result<()>;

    /// Map a raw value using the statistics gathered so far
    fn normalize(&self, raw: &str) -> Result<NormalizedValue>;
}

/// Create the normalizer matching a parameter's declared type
pub fn normalizer_for(parameter: &ParameterState) -> Box<dyn ParameterNormalizer> {
    match parameter.parameter_type {
        ParameterType::Numeric => Box::new(NumericNormalizer::new(parameter.name.clone())),
        ParameterType::Categorical => Box::new(CategoricalNormalizer::new()),
    }
}

/// Split a multi-label value into trimmed, non-empty tokens
pub fn split_tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

/// Min-max scaler
#[derive(Debug, Clone)]
pub struct NumericNormalizer {
    parameter: String,
    min: f64,
    max: f64,
}

impl NumericNormalizer {
    pub fn new(parameter: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn min(&self) -> Option<f64> {
        self.has_observations().then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        self.has_observations().then_some(self.max)
    }

    fn has_observations(&self) -> bool {
        self.min <= self.max
    }

    fn parse(&self, raw: &str) -> Result<Option<f64>> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(Error::InvalidNumber {
                parameter: self.parameter.clone(),
                value: raw.to_string(),
            }),
        }
    }
}

impl ParameterNormalizer for NumericNormalizer {
    fn add_value(&mut self, raw: &str) -> Result<()> {
        if let Some(v) = self.parse(raw)? {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        }
        Ok(())
    }

    fn normalize(&self, raw: &str) -> Result<NormalizedValue> {
        let parsed = self.parse(raw)?;

        // Constant (or never observed) parameters map to 1.0
        if !self.has_observations() || self.max == self.min {
            return Ok(NormalizedValue::Numeric(1.0));
        }

        let v = parsed.unwrap_or((self.min + self.max) / 2.0);
        let scaled = (v - self.min) / (self.max - self.min);
        Ok(NormalizedValue::Numeric(scaled.clamp(0.0, 1.0)))
    }
}

/// One-hot encoder over a first-seen ordered vocabulary
#[derive(Debug, Clone, Default)]
pub struct CategoricalNormalizer {
    vocabulary: Vec<String>,
    index: AHashMap<String, usize>,
}

impl CategoricalNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }
}

impl ParameterNormalizer for CategoricalNormalizer {
    fn add_value(&mut self, raw: &str) -> Result<()> {
        for token in split_tokens(raw) {
            if !self.index.contains_key(token) {
                self.index.insert(token.to_string(), self.vocabulary.len());
                self.vocabulary.push(token.to_string());
            }
        }
        Ok(())
    }

    fn normalize(&self, raw: &str) -> Result<NormalizedValue> {
        let mut bits = vec![0u8; self.vocabulary.len()];
        for token in split_tokens(raw) {
            if let Some(&pos) = self.index.get(token) {
                bits[pos] = 1;
            }
        }
        Ok(NormalizedValue::Categorical(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(value: NormalizedValue) -> f64 {
        match value {
            NormalizedValue::Numeric(v) => v,
            other => panic!("expected numeric, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_min_max_scaling() {
        let mut normalizer = NumericNormalizer::new("price");
        for raw in ["10", "30", "20"] {
            normalizer.add_value(raw).unwrap();
        }
        assert_eq!(numeric(normalizer.normalize("10").unwrap()), 0.0);
        assert_eq!(numeric(normalizer.normalize("30").unwrap()), 1.0);
        assert!((numeric(normalizer.normalize("15").unwrap()) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_order_independent() {
        let mut a = NumericNormalizer::new("x");
        let mut b = NumericNormalizer::new("x");
        for raw in ["3", "-1", "7"] {
            a.add_value(raw).unwrap();
        }
        for raw in ["7", "3", "-1"] {
            b.add_value(raw).unwrap();
        }
        assert_eq!(a.normalize("3").unwrap(), b.normalize("3").unwrap());
    }

    #[test]
    fn test_numeric_constant_is_one() {
        let mut normalizer = NumericNormalizer::new("x");
        normalizer.add_value("5").unwrap();
        normalizer.add_value("5").unwrap();
        assert_eq!(numeric(normalizer.normalize("5").unwrap()), 1.0);
    }

    #[test]
    fn test_numeric_blank_is_imputed_midpoint() {
        let mut normalizer = NumericNormalizer::new("x");
        normalizer.add_value("0").unwrap();
        normalizer.add_value("").unwrap();
        normalizer.add_value("8").unwrap();
        assert_eq!(normalizer.min(), Some(0.0));
        assert_eq!(normalizer.max(), Some(8.0));
        assert!((numeric(normalizer.normalize("  ").unwrap()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_numeric_clamps_out_of_range() {
        let mut normalizer = NumericNormalizer::new("x");
        normalizer.add_value("0").unwrap();
        normalizer.add_value("10").unwrap();
        assert_eq!(numeric(normalizer.normalize("20").unwrap()), 1.0);
        assert_eq!(numeric(normalizer.normalize("-5").unwrap()), 0.0);
    }

    #[test]
    fn test_numeric_rejects_garbage() {
        let mut normalizer = NumericNormalizer::new("price");
        let err = normalizer.add_value("cheap").unwrap_err();
        assert_eq!(
            err,
            Error::InvalidNumber {
                parameter: "price".to_string(),
                value: "cheap".to_string()
            }
        );
        assert!(normalizer.normalize("NaN").is_err());
    }

    #[test]
    fn test_categorical_vocabulary_first_seen_order() {
        let mut normalizer = CategoricalNormalizer::new();
        normalizer.add_value("red, green").unwrap();
        normalizer.add_value("blue,red").unwrap();
        normalizer.add_value(" , ").unwrap();
        assert_eq!(normalizer.vocabulary(), &["red", "green", "blue"]);

        assert_eq!(
            normalizer.normalize("blue, red").unwrap(),
            NormalizedValue::Categorical(vec![1, 0, 1])
        );
    }

    #[test]
    fn test_categorical_unseen_tokens_ignored() {
        let mut normalizer = CategoricalNormalizer::new();
        normalizer.add_value("a,b").unwrap();
        assert_eq!(
            normalizer.normalize("b,zzz").unwrap(),
            NormalizedValue::Categorical(vec![0, 1])
        );
        assert_eq!(
            normalizer.normalize("").unwrap(),
            NormalizedValue::Categorical(vec![0, 0])
        );
    }

    #[test]
    fn test_normalizer_for_parameter_type() {
        let mut normalizer = normalizer_for(&ParameterState::categorical(1, "tags"));
        normalizer.add_value("x").unwrap();
        assert_eq!(
            normalizer.normalize("x").unwrap(),
            NormalizedValue::Categorical(vec![1])
        );

        let mut normalizer = normalizer_for(&ParameterState::numeric(2, "n"));
        assert!(normalizer.add_value("x").is_err());
    }
}
