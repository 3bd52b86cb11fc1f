use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Vector length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Vectors must not be empty")]
    EmptyVector,

    #[error("Dataset contains no objects")]
    EmptyDataset,

    #[error("Dataset declares no parameters")]
    NoParameters,

    #[error("Parameter alignment differs: expected parameter {expected}, found {actual}")]
    ParameterMismatch { expected: u64, actual: u64 },

    #[error("Value references unknown parameter {0}")]
    UnknownParameter(u64),

    #[error("Unknown distance metric: {0}")]
    UnknownMetric(String),

    #[error("Unknown parameter type: {0}")]
    UnknownParameterType(String),

    #[error("Unknown clustering algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("Parameter {parameter_id} holds an unsupported value variant: {variant}")]
    UnsupportedValue { parameter_id: u64, variant: &'static str },

    #[error("Value '{value}' of parameter '{parameter}' is not a number")]
    InvalidNumber { parameter: String, value: String },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Parameter '{0}' has negative weight")]
    NegativeWeight(String),

    #[error("Total weight cannot be zero")]
    ZeroTotalWeight,
}
