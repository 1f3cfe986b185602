use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Batch processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::IoError(_) => ErrorCategory::Io,
            CheckError::CsvError(_) | CheckError::SerializationError(_) => ErrorCategory::Data,
            CheckError::ConfigValidationError { .. }
            | CheckError::InvalidConfigValueError { .. }
            | CheckError::MissingConfigError { .. } => ErrorCategory::Configuration,
            CheckError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息 (不含內部細節)
    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckError::IoError(e) => format!("Could not read or write a file: {}", e),
            CheckError::CsvError(_) => "The input file is not valid CSV".to_string(),
            CheckError::SerializationError(_) => "Failed to encode the report".to_string(),
            CheckError::ConfigValidationError { field, .. }
            | CheckError::InvalidConfigValueError { field, .. }
            | CheckError::MissingConfigError { field } => {
                format!("Configuration problem with '{}'", field)
            }
            CheckError::ProcessingError { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the paths exist and are readable/writable",
            ErrorCategory::Data => "Check the CSV header: id,method,vpa,card_number,expiry_month,expiry_year,cvv",
            ErrorCategory::Configuration => "Fix the configuration file and run again",
            ErrorCategory::Processing => "Re-run with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
