//! Error types for dataset preparation

use thiserror::Error;

/// Result type for dataprep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for dataprep operations
#[derive(Error, Debug)]
pub enum Error {
    /// A descriptor named an operation absent from the registry
    #[error("No operation found for type '{0}'")]
    UnknownOperation(String),

    /// An operation descriptor lacked a non-empty `type` field
    #[error("Each operation must include a 'type'")]
    MissingOperationType,

    /// An operation's own parameter validation failed
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Parameters were well-formed but the data made the computation undefined
    #[error("Computation error: {0}")]
    Computation(String),

    /// The target dataset does not exist in the store
    #[error("Dataset '{0}' not found")]
    DatasetNotFound(String),

    /// Columns of unequal length, duplicate names, or similar shape violations
    #[error("Table shape error: {0}")]
    TableShape(String),

    /// IO error during store operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected internal error; never partially applied
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable kind for failure reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownOperation(_) => "UnknownOperation",
            Self::MissingOperationType => "MissingOperationType",
            Self::InvalidParameter(_) => "InvalidParameter",
            Self::Computation(_) => "ComputationError",
            Self::DatasetNotFound(_) => "DatasetNotFound",
            Self::TableShape(_) => "TableShape",
            Self::Io(_) => "Io",
            Self::Json(_) => "Serialization",
            Self::Internal(_) => "Internal",
        }
    }

    /// Whether this error is the caller's fault (bad request) rather than a
    /// data or system fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownOperation(_) | Self::MissingOperationType | Self::InvalidParameter(_)
        )
    }
}
