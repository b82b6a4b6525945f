use thiserror::Error;

#[derive(Error, Debug)]
pub enum RomError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Unknown test '{name}'")]
    UnknownTest { name: String },

    #[error("Invalid reading '{input}': {reason}")]
    InvalidReading { input: String, reason: String },

    #[error("Entry {id} not found")]
    NotFound { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Format,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RomError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RomError::IoError(_) | RomError::ZipError(_) | RomError::NotFound { .. } => {
                ErrorCategory::Storage
            }
            RomError::CsvError(_) | RomError::SerializationError(_) => ErrorCategory::Format,
            RomError::ConfigError { .. }
            | RomError::ConfigValidationError { .. }
            | RomError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RomError::ValidationError { .. }
            | RomError::UnknownTest { .. }
            | RomError::InvalidReading { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RomError::NotFound { .. } => ErrorSeverity::Medium,
            RomError::ValidationError { .. }
            | RomError::UnknownTest { .. }
            | RomError::InvalidReading { .. } => ErrorSeverity::High,
            RomError::ConfigError { .. }
            | RomError::ConfigValidationError { .. }
            | RomError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            RomError::CsvError(_) | RomError::SerializationError(_) => ErrorSeverity::High,
            RomError::IoError(_) | RomError::ZipError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RomError::IoError(_) => {
                "Check that the data directory exists and is writable".to_string()
            }
            RomError::ZipError(_) => "Check free disk space in the export directory".to_string(),
            RomError::CsvError(_) => {
                "The measurement store looks corrupted; restore it from an export".to_string()
            }
            RomError::SerializationError(_) => "Re-run the export".to_string(),
            RomError::ConfigError { .. }
            | RomError::ConfigValidationError { .. }
            | RomError::InvalidConfigValueError { .. } => {
                "Review the configuration file and command-line flags".to_string()
            }
            RomError::ValidationError { .. } => "Provide both a name and a surname".to_string(),
            RomError::UnknownTest { .. } => {
                "Run `rom-tracker tests` to list the available tests".to_string()
            }
            RomError::InvalidReading { .. } => {
                "Use the form \"<test>=<left>,<right>\", e.g. \"Hip IR=35,40\"".to_string()
            }
            RomError::NotFound { .. } => {
                "Run `rom-tracker search` to look up existing entry IDs".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RomError::NotFound { id } => format!("Entry {} not found", id),
            RomError::UnknownTest { name } => format!("'{}' is not part of the test battery", name),
            RomError::IoError(e) => format!("Could not access the measurement files: {}", e),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_retryable_storage_error() {
        let err = RomError::NotFound { id: 7 };
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert_eq!(err.user_friendly_message(), "Entry 7 not found");
    }

    #[test]
    fn test_input_errors_are_high_severity() {
        let err = RomError::UnknownTest {
            name: "Elbow".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("rom-tracker tests"));
    }

    #[test]
    fn test_config_errors_share_one_category() {
        let err = RomError::InvalidConfigValueError {
            field: "logging.level".to_string(),
            value: "bogus".to_string(),
            reason: "Valid levels: trace, debug, info, warn, error".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("configuration file"));
    }
}
