use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed amenity record on line {line}: {source}")]
    JsonLineError {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Input file {file} is not present in {directory}")]
    MissingInputError { file: String, directory: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Rendering error: {message}")]
    RenderError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Bad input data or an empty result the user can fix by changing inputs.
    High,
    /// Configuration mistakes caught before any processing started.
    Medium,
    /// The environment failed us: disk, archive or renderer.
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl InsightError {
    pub fn config(message: impl Into<String>) -> Self {
        InsightError::ConfigError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        InsightError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        InsightError::RenderError {
            message: message.into(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            InsightError::ConfigError { .. } | InsightError::InvalidConfigValueError { .. } => {
                ErrorSeverity::Medium
            }
            InsightError::IoError(_) | InsightError::ZipError(_) | InsightError::RenderError { .. } => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            InsightError::MissingInputError { file, directory } => {
                format!("Error: {} is not present in {} directory.", file, directory)
            }
            InsightError::CsvError(_) => "The listings file could not be read as CSV.".to_string(),
            InsightError::JsonLineError { line, .. } => {
                format!("The amenities file has a malformed record on line {}.", line)
            }
            InsightError::InvalidConfigValueError { field, value, .. } => {
                format!("'{}' is not a valid value for {}.", value, field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            InsightError::MissingInputError { .. } => {
                "Download the dataset into the input directory or pass its path explicitly"
            }
            InsightError::CsvError(_) | InsightError::JsonLineError { .. } => {
                "Check that the input file is complete and not truncated"
            }
            InsightError::ConfigError { .. } | InsightError::InvalidConfigValueError { .. } => {
                "Fix the command line flags or the TOML settings file"
            }
            InsightError::IoError(_) | InsightError::ZipError(_) => {
                "Check that the output directory is writable and the disk is not full"
            }
            InsightError::RenderError { .. } => "Re-run with --verbose to see which artifact failed",
            _ => "Re-run with --verbose for more detail",
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightError>;
