use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the effector classification pipeline.
#[derive(Error, Debug)]
pub enum EffectorError {
    /// Uploaded content could not be parsed into sequence records
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A record has nothing to average over
    #[error("Empty sequence for record '{id}'")]
    EmptySequence { id: String },

    /// The classifier could not be loaded at startup
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Expected {expected} features per row, got {actual}")]
    FeatureWidth { expected: usize, actual: usize },

    #[error("Length mismatch: {ids} identifiers, {labels} labels, {probabilities} probabilities")]
    LengthMismatch {
        ids: usize,
        labels: usize,
        probabilities: usize,
    },

    /// A model returned something that is not a probability
    #[error("Invalid probability {value} for row {row}")]
    InvalidProbability { row: usize, value: f64 },

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Table error: {0}")]
    Table(#[from] PolarsError),
}

impl EffectorError {
    pub fn empty_sequence(id: impl Into<String>) -> Self {
        EffectorError::EmptySequence { id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, EffectorError>;
