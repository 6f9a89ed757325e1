use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BioxError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Directory not found: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {}", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("sort_by must be one of: 'name', 'mtime', 'size' (got '{value}')")]
    InvalidSortBy { value: String },

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(#[from] globset::Error),

    #[error("Invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration parse error in '{field}': {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Worker task failed: {message}")]
    TaskFailed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl BioxError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            BioxError::DirectoryNotFound { .. }
            | BioxError::NotADirectory { .. }
            | BioxError::InvalidSortBy { .. }
            | BioxError::InvalidPattern(_)
            | BioxError::InvalidRegex(_)
            | BioxError::ConfigError { .. }
            | BioxError::ConfigParseError { .. }
            | BioxError::InvalidConfigValueError { .. }
            | BioxError::ValidationError { .. } => ErrorSeverity::High,
            BioxError::ZipError(_) | BioxError::CsvError(_) | BioxError::SerializationError(_) => {
                ErrorSeverity::Medium
            }
            BioxError::IoError(_) | BioxError::TaskFailed { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BioxError::DirectoryNotFound { .. } | BioxError::NotADirectory { .. } => {
                "Check that the directory exists and the path is spelled correctly"
            }
            BioxError::InvalidSortBy { .. } => "Use one of: name, mtime, size",
            BioxError::InvalidPattern(_) => "Check the glob syntax (e.g. '*.xml.gz', 'pubmed_*')",
            BioxError::InvalidRegex(_) => "Check the regular expression syntax",
            BioxError::ZipError(_) => "The archive may be corrupt; try downloading it again",
            BioxError::SerializationError(_) | BioxError::CsvError(_) => {
                "Try a different output format"
            }
            BioxError::ConfigError { .. }
            | BioxError::ConfigParseError { .. }
            | BioxError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags"
            }
            BioxError::ValidationError { .. } => "Review the provided arguments",
            BioxError::IoError(_) => "Check file permissions and available disk space",
            BioxError::TaskFailed { .. } => "Re-run with --verbose to see which input failed",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, BioxError>;
