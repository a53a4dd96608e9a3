use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid configuration: bad TOML, bad values, missing output directory
    #[error("Configuration error: {0}")]
    Config(String),
    /// Credentials file missing or malformed
    #[error("Credentials error: {0}")]
    Credentials(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(String),
    /// Transport-level failure talking to the service
    #[error("Network error: {0}")]
    Network(String),
    /// The service answered with an unexpected HTTP status
    #[error("{context} failed with HTTP status {status}")]
    Protocol { context: String, status: String },
    /// A JSON response could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
    /// The document listing contained no account entry
    #[error("The document listing did not contain any account")]
    NoAccounts,
    /// A document carried a month outside 1..=12
    #[error("Invalid document month {0}, expected a value between 1 and 12")]
    InvalidMonth(u32),
    /// Two documents resolved to the same output file
    #[error("Refusing to overwrite {}: another document was already saved there", .0.display())]
    FileCollision(PathBuf),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("Invalid URL: {err}"))
    }
}

impl AppError {
    /// Builds a protocol error from a request description and the received status.
    pub fn protocol(context: impl Into<String>, status: reqwest::StatusCode) -> Self {
        AppError::Protocol {
            context: context.into(),
            status: status.to_string(),
        }
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
