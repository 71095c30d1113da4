use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CombineError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV writing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to list directory {}: {source}", .path.display())]
    ListDirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read source file {file}: {source}")]
    ReadSourceError {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file {}: {source}", .path.display())]
    WriteOutputError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open log file {}: {source}", .path.display())]
    LogFileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration file error ({}): {message}", .path.display())]
    ConfigFileError { path: PathBuf, message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CombineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CombineError::ConfigFileError { .. }
            | CombineError::InvalidConfigValueError { .. }
            | CombineError::LogFileError { .. } => ErrorCategory::Configuration,
            CombineError::ListDirectoryError { .. } | CombineError::ReadSourceError { .. } => {
                ErrorCategory::Input
            }
            CombineError::WriteOutputError { .. } | CombineError::CsvError(_) => {
                ErrorCategory::Output
            }
            CombineError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this error. Every failure is non-zero.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CombineError::ListDirectoryError { path, .. } => format!(
                "Check that {} exists and is readable",
                path.display()
            ),
            CombineError::ReadSourceError { file, .. } => {
                format!("Check the permissions of {} or move it out of the directory", file)
            }
            CombineError::WriteOutputError { path, .. } => format!(
                "Check that the directory of {} is writable",
                path.display()
            ),
            CombineError::LogFileError { path, .. } => format!(
                "Check that {} can be created and appended to",
                path.display()
            ),
            CombineError::ConfigFileError { path, .. } => format!(
                "Make sure {} exists and is valid TOML",
                path.display()
            ),
            CombineError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' and run again", field)
            }
            CombineError::CsvError(_) | CombineError::IoError(_) => {
                "Check disk space and file permissions, then run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CombineError::ListDirectoryError { path, .. } => {
                format!("Cannot list input directory {}", path.display())
            }
            CombineError::ReadSourceError { file, .. } => {
                format!("Cannot read input file {}", file)
            }
            CombineError::WriteOutputError { path, .. } => {
                format!("Cannot write output file {}", path.display())
            }
            CombineError::ConfigFileError { path, message } => {
                format!("Invalid configuration file {}: {}", path.display(), message)
            }
            CombineError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CombineError>;
