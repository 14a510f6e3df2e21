use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Chart rendering error: {message}")]
    ChartError { message: String },

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Record parse error at line {line}: {message}")]
    RecordParseError { line: u64, message: String },

    #[error("Cannot compute {operation} over an empty dataset")]
    EmptyDataset { operation: String },

    #[error("Division by zero while computing {operation}")]
    DivisionByZero { operation: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Rendering,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn empty_dataset(operation: &str) -> Self {
        EtlError::EmptyDataset {
            operation: operation.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::IoError(_) => ErrorCategory::Io,
            EtlError::CsvError(e) if e.is_io_error() => ErrorCategory::Io,
            EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::RecordParseError { .. }
            | EtlError::EmptyDataset { .. }
            | EtlError::DivisionByZero { .. } => ErrorCategory::Data,
            EtlError::ChartError { .. } => ErrorCategory::Rendering,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::ValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 圖表失敗時報表與篩選檔已寫出
            ErrorCategory::Rendering => ErrorSeverity::Low,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::IoError(_) => "Check that the input file exists and the output directory is writable",
            EtlError::CsvError(_) => "Make sure every row has the same number of columns as the header",
            EtlError::RecordParseError { .. } => {
                "Fix the offending row: numeric fields must be numbers, Gender must be Male/Female, Customer type must be Member/Normal, Time must be HH:MM[:SS]"
            }
            EtlError::EmptyDataset { .. } => "Provide an input file with at least one data row",
            EtlError::DivisionByZero { .. } => "Total sales is zero; check the 'Total sale' column",
            EtlError::ChartError { .. } => "Run again with --no-charts to skip chart rendering",
            EtlError::SerializationError(_) => "Disable JSON output or report this as a bug",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. }
            | EtlError::ValidationError { .. } => "Review the command line flags and the TOML configuration file",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("Could not read or write a file: {}", self),
            ErrorCategory::Data => format!("The sales data could not be analysed: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Rendering => format!("Charts could not be rendered: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
