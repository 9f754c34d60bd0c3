//! Error types for the textop-ml crate.

use thiserror::Error;

/// Top-level error type for featurization and schema operations.
#[derive(Debug, Error)]
pub enum TextOpError {
    #[error("Invalid hyperparameter: {0}")]
    InvalidHyperparameter(String),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Feature mismatch: expected {expected} columns, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("Transformer is not fitted: {0}")]
    NotFitted(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl TextOpError {
    pub fn invalid_hyperparameter(msg: impl Into<String>) -> Self {
        Self::InvalidHyperparameter(msg.into())
    }

    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    pub fn invalid_shape(msg: impl Into<String>) -> Self {
        Self::InvalidShape(msg.into())
    }

    pub fn empty_data(msg: impl Into<String>) -> Self {
        Self::EmptyData(msg.into())
    }

    pub fn column_not_found(msg: impl Into<String>) -> Self {
        Self::ColumnNotFound(msg.into())
    }

    pub fn not_fitted(msg: impl Into<String>) -> Self {
        Self::NotFitted(msg.into())
    }

    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }
}
