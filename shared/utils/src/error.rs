use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure taxonomy for a load run.
///
/// Only `MissingInput` and the bootstrap variants abort a load. Row-level
/// problems are recorded as diagnostics and the load carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadError {
    #[error("Missing input file: {path}")]
    MissingInput { path: String },

    #[error("Malformed field '{field}' in row {row}: {message}")]
    MalformedField {
        row: usize,
        field: String,
        message: String,
    },

    #[error("Storage error: {message}")]
    StorageConstraint { message: String },

    #[error("Product '{product}' could not be resolved")]
    DanglingReference { product: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("CSV error: {message}")]
    Csv { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl LoadError {
    pub fn missing_input(path: impl Into<String>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    pub fn malformed_field(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedField {
            row,
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageConstraint {
            message: message.into(),
        }
    }

    pub fn dangling_reference(product: impl Into<String>) -> Self {
        Self::DanglingReference {
            product: product.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "MISSING_INPUT",
            Self::MalformedField { .. } => "MALFORMED_FIELD",
            Self::StorageConstraint { .. } => "STORAGE_CONSTRAINT",
            Self::DanglingReference { .. } => "DANGLING_REFERENCE",
            Self::Io { .. } => "IO_ERROR",
            Self::Csv { .. } => "CSV_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }

    /// Whether this error stops the whole load
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingInput { .. } | Self::Io { .. } | Self::Configuration { .. }
        )
    }
}

pub type LoadResult<T> = Result<T, LoadError>;

// Conversion from common error types
impl From<csv::Error> for LoadError {
    fn from(error: csv::Error) -> Self {
        Self::Csv {
            message: error.to_string(),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<config::ConfigError> for LoadError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}
