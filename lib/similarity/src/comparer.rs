//! Value comparison strategies
//!
//! A [`ValueComparer`] scores how alike two raw values of the same parameter
//! are. All strategies return a similarity in [0.0, 1.0] where 1.0 means
//! identical. Comparison works on the raw text, independent of the one-hot
//! encoding used by clustering.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use tabula_core::{split_tokens, Error, ParameterState, ParameterType, Result};

/// Strategy injected into the similarity comparer
pub trait ValueComparer: Send + Sync {
    /// Compare two raw values of `parameter`
    ///
    /// `max_range` is the value range of a numeric parameter across the
    /// dataset; categorical parameters receive 1.0.
    fn compare(&self, parameter: &ParameterState, a: &str, b: &str, max_range: f64) -> Result<f64>;
}

/// How numeric values are compared
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NumericComparison {
    /// 1 - |a - b| / max_range
    #[default]
    Range,
    /// 1 - |a - b| / max(|a|, |b|)
    Relative,
    /// 1 if equal, 0 otherwise
    Exact,
}

/// How categorical values are compared
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoricalComparison {
    /// Jaccard index over comma-separated tokens
    #[default]
    Overlap,
    /// Case-insensitive equality of the whole value
    Exact,
}

impl FromStr for NumericComparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "range" => Ok(NumericComparison::Range),
            "relative" => Ok(NumericComparison::Relative),
            "exact" => Ok(NumericComparison::Exact),
            other => Err(Error::UnknownMetric(other.to_string())),
        }
    }
}

impl FromStr for CategoricalComparison {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlap" => Ok(CategoricalComparison::Overlap),
            "exact" => Ok(CategoricalComparison::Exact),
            other => Err(Error::UnknownMetric(other.to_string())),
        }
    }
}

/// Comparer with selectable numeric and categorical modes
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StandardComparer {
    #[serde(default)]
    pub numeric: NumericComparison,
    #[serde(default)]
    pub categorical: CategoricalComparison,
}

impl StandardComparer {
    pub fn new(numeric: NumericComparison, categorical: CategoricalComparison) -> Self {
        Self { numeric, categorical }
    }
}

impl ValueComparer for StandardComparer {
    fn compare(&self, parameter: &ParameterState, a: &str, b: &str, max_range: f64) -> Result<f64> {
        match parameter.parameter_type {
            ParameterType::Numeric => {
                let (Some(x), Some(y)) = (parse_number(parameter, a)?, parse_number(parameter, b)?)
                else {
                    return Ok(0.0);
                };
                Ok(number_similarity(x, y, max_range, self.numeric))
            }
            ParameterType::Categorical => Ok(categorical_similarity(a, b, self.categorical)),
        }
    }
}

/// Parse a numeric raw value; blank values yield `None`
pub fn parse_number(parameter: &ParameterState, raw: &str) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(Error::InvalidNumber {
            parameter: parameter.name.clone(),
            value: raw.to_string(),
        }),
    }
}

/// Calculate numeric similarity between two numbers
pub fn number_similarity(a: f64, b: f64, max_range: f64, method: NumericComparison) -> f64 {
    match method {
        NumericComparison::Range => {
            if max_range <= 0.0 {
                return if a == b { 1.0 } else { 0.0 };
            }
            (1.0 - (a - b).abs() / max_range).clamp(0.0, 1.0)
        }
        NumericComparison::Relative => {
            let max = a.abs().max(b.abs());
            if max == 0.0 {
                1.0 // Both are zero
            } else {
                (1.0 - (a - b).abs() / max).max(0.0)
            }
        }
        NumericComparison::Exact => {
            if (a - b).abs() < f64::EPSILON { 1.0 } else { 0.0 }
        }
    }
}

/// Calculate categorical similarity between two multi-label values
pub fn categorical_similarity(a: &str, b: &str, method: CategoricalComparison) -> f64 {
    match method {
        CategoricalComparison::Overlap => jaccard_tokens(a, b),
        CategoricalComparison::Exact => {
            if a.trim().eq_ignore_ascii_case(b.trim()) { 1.0 } else { 0.0 }
        }
    }
}

/// Jaccard similarity between comma-separated token sets
fn jaccard_tokens(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<&str> = split_tokens(a).collect();
    let tokens_b: HashSet<&str> = split_tokens(b).collect();

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 1.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();

    if union == 0 { 0.0 } else { intersection as f64 / union as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_range_similarity() {
        assert_eq!(number_similarity(10.0, 10.0, 20.0, NumericComparison::Range), 1.0);
        let sim = number_similarity(10.0, 15.0, 20.0, NumericComparison::Range);
        assert!((sim - 0.75).abs() < 1e-12);
        assert_eq!(number_similarity(0.0, 50.0, 20.0, NumericComparison::Range), 0.0);
    }

    #[test]
    fn test_number_relative_similarity() {
        assert_eq!(number_similarity(10.0, 10.0, 1.0, NumericComparison::Relative), 1.0);

        let sim = number_similarity(10.0, 11.0, 1.0, NumericComparison::Relative);
        assert!(sim > 0.9);

        let sim2 = number_similarity(10.0, 20.0, 1.0, NumericComparison::Relative);
        assert!((0.5..0.6).contains(&sim2));
    }

    #[test]
    fn test_categorical_overlap_similarity() {
        let sim =
            categorical_similarity("red, green", "green,blue", CategoricalComparison::Overlap);
        assert!((sim - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(categorical_similarity("", " ", CategoricalComparison::Overlap), 1.0);
        assert_eq!(categorical_similarity("a", "", CategoricalComparison::Overlap), 0.0);
    }

    #[test]
    fn test_categorical_exact_similarity() {
        assert_eq!(categorical_similarity("Diesel", "diesel ", CategoricalComparison::Exact), 1.0);
        assert_eq!(categorical_similarity("diesel", "petrol", CategoricalComparison::Exact), 0.0);
    }

    #[test]
    fn test_standard_comparer_numeric() {
        let comparer = StandardComparer::default();
        let price = ParameterState::numeric(1, "price");
        let sim = comparer.compare(&price, "100", "150", 100.0).unwrap();
        assert!((sim - 0.5).abs() < 1e-12);
        assert_eq!(comparer.compare(&price, "", "150", 100.0).unwrap(), 0.0);
        assert!(matches!(
            comparer.compare(&price, "cheap", "150", 100.0),
            Err(Error::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_standard_comparer_categorical() {
        let comparer = StandardComparer::default();
        let tags = ParameterState::categorical(2, "tags");
        assert_eq!(comparer.compare(&tags, "a,b", "b,a", 1.0).unwrap(), 1.0);
    }

    #[test]
    fn test_comparison_modes_from_str() {
        assert_eq!("Relative".parse::<NumericComparison>().unwrap(), NumericComparison::Relative);
        assert_eq!("exact".parse::<CategoricalComparison>().unwrap(), CategoricalComparison::Exact);
        assert!(matches!(
            "fuzzy".parse::<CategoricalComparison>(),
            Err(Error::UnknownMetric(_))
        ));
    }

    #[test]
    fn test_standard_comparer_from_json() {
        let comparer: StandardComparer =
            serde_json::from_str(r#"{"numeric": "relative"}"#).unwrap();
        assert_eq!(comparer.numeric, NumericComparison::Relative);
        assert_eq!(comparer.categorical, CategoricalComparison::Overlap);
    }
}
