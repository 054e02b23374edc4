use std::path::PathBuf;

/// Why a file was rejected as an OBD-II log.
///
/// The messages are shown to the user verbatim, so each variant says what to fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationFailure {
    #[error("File does not exist")]
    Missing,

    #[error("File must be a .csv file. Please upload a valid OBD-II log file.")]
    WrongExtension,

    #[error("File is empty. Please upload a valid OBD-II log file.")]
    Empty,

    #[error("File is not a valid CSV format ({0}).")]
    Malformed(String),

    #[error("Error reading file: {0}")]
    Unreadable(String),

    #[error("No valid OBD-II data found in file. Please ensure your CSV contains OBD-II metrics.")]
    NoRecognizedColumns,
}

#[derive(Debug, thiserror::Error)]
pub enum ObdError {
    #[error("{0}")]
    Validation(ValidationFailure),

    #[error("failed to parse OBD-II log: {0}")]
    Parse(String),

    #[error("failed to load table from {path}: {reason}")]
    TableLoad { path: PathBuf, reason: String },

    #[error("invalid table: {0}")]
    TableInvalid(String),

    #[error("response generator '{backend}' failed: {reason}")]
    Generator { backend: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationFailure> for ObdError {
    fn from(failure: ValidationFailure) -> Self {
        ObdError::Validation(failure)
    }
}
