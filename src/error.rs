use std::fmt;

#[derive(Debug)]
pub enum GarudaError {
    ConfigError(String),
    IoError(std::io::Error),
    SerializationError(serde_json::Error),
    SignalError(String),
}

impl fmt::Display for GarudaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GarudaError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            GarudaError::IoError(e) => write!(f, "IO error: {}", e),
            GarudaError::SerializationError(e) => write!(f, "Serialization error: {}", e),
            GarudaError::SignalError(msg) => write!(f, "Signal handler error: {}", msg),
        }
    }
}

impl std::error::Error for GarudaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GarudaError::IoError(e) => Some(e),
            GarudaError::SerializationError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GarudaError {
    fn from(err: std::io::Error) -> Self {
        GarudaError::IoError(err)
    }
}

impl From<serde_json::Error> for GarudaError {
    fn from(err: serde_json::Error) -> Self {
        GarudaError::SerializationError(err)
    }
}

impl From<ctrlc::Error> for GarudaError {
    fn from(err: ctrlc::Error) -> Self {
        GarudaError::SignalError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GarudaError>;
