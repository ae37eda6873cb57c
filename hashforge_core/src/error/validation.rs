//! Validation related error types

use thiserror::Error;

/// Validation and configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Invalid input parameter
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    /// Encoded digest text that could not be decoded
    #[error("Malformed digest '{input}': {reason}")]
    MalformedDigest { input: String, reason: String },
}

impl ValidationError {
    /// Create an invalid configuration error
    pub fn invalid_configuration(message: &str) -> Self {
        Self::InvalidConfiguration {
            message: message.to_string(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, reason: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a malformed digest error
    pub fn malformed_digest(input: &str, reason: impl ToString) -> Self {
        Self::MalformedDigest {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}
