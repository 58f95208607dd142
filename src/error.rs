// src/error.rs
//! Error types for the waypoint converter

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, ConverterError>;

#[derive(Debug)]
pub enum ConverterError {
    /// A caller-supplied argument or an in-memory value violates a precondition.
    InvalidState(String),
    /// Input content matches no known dialect or a field failed to parse.
    Parse(String),
    /// Reading or writing a file failed.
    File(String),
    /// A held resource could not be released; the process should stop.
    Fatal(String),
    /// Name collision in the repository, or export target already on disk.
    AlreadyExists(String),
    /// No waypoint with the requested name.
    NotFound(String),
    /// Recognized input that this build cannot read yet.
    Unsupported(String),
    Config(String),
}

impl ConverterError {
    /// Whether the error leaves the process in a state that cannot be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConverterError::Fatal(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ConverterError::InvalidState(msg)
            | ConverterError::Parse(msg)
            | ConverterError::File(msg)
            | ConverterError::Fatal(msg)
            | ConverterError::AlreadyExists(msg)
            | ConverterError::NotFound(msg)
            | ConverterError::Unsupported(msg)
            | ConverterError::Config(msg) => msg,
        }
    }
}

impl fmt::Display for ConverterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConverterError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ConverterError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConverterError::File(msg) => write!(f, "File error: {}", msg),
            ConverterError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
            ConverterError::AlreadyExists(msg) => write!(f, "Already exists: {}", msg),
            ConverterError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ConverterError::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
            ConverterError::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for ConverterError {}

impl From<io::Error> for ConverterError {
    fn from(error: io::Error) -> Self {
        let msg = match error.kind() {
            io::ErrorKind::NotFound => "The requested file was not found".to_string(),
            io::ErrorKind::PermissionDenied => "Permission denied while accessing the file".to_string(),
            io::ErrorKind::AlreadyExists => {
                return ConverterError::AlreadyExists("The target file already exists".to_string())
            }
            _ => format!("There was a problem accessing the file: {}", error),
        };
        ConverterError::File(msg)
    }
}

impl From<serde_json::Error> for ConverterError {
    fn from(error: serde_json::Error) -> Self {
        ConverterError::Config(error.to_string())
    }
}
