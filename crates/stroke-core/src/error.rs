use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Field '{field}' is not a valid number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Field '{field}' has unknown category {label:?}")]
    UnknownCategory { field: &'static str, label: String },

    #[error("Expected {expected} features, got {actual}")]
    FeatureLength { expected: usize, actual: usize },

    #[error("Model inference failed: {0}")]
    Inference(#[source] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
