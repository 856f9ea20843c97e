//! Error types for Bucketwatch

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Decoding Errors
    #[error("Malformed notification payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    FieldMissing(&'static str),

    // Probe Errors
    #[error("Package probe failed: {0}")]
    Probe(String),

    // Configuration Errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::Parse(_) => "ParseError",
            Error::FieldMissing(_) => "FieldMissingError",
            Error::Probe(_) => "ProbeError",
            Error::InvalidConfig(_) => "InvalidConfig",
        }
    }

    /// Whether the error came from the shape of the incoming batch
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::FieldMissing(_))
    }
}
