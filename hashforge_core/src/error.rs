//! Error types for the hashforge core library
//!
//! Errors are grouped by the layer that raises them so callers can match on a
//! category without caring about every individual failure.

use thiserror::Error;

pub mod engine;
pub mod io;
pub mod registry;
pub mod validation;

pub use self::engine::EngineError;
pub use self::io::{IoError, IoErrorKind};
pub use self::registry::{RegistryError, RegistryKind};
pub use self::validation::ValidationError;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the hashforge core library
///
/// Errors are categorized into four main types:
/// - Engine errors: lifecycle misuse, counter overflow, abstract algorithms
/// - Registry errors: algorithm/formatter lookup and registration failures
/// - I/O errors: failures while a driver reads a stream or file
/// - Validation errors: bad configuration or malformed input values
#[derive(Error, Debug)]
pub enum Error {
    /// Hash engine errors
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Registry errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// I/O related errors
    #[error(transparent)]
    Io(#[from] IoError),

    /// Validation related errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Whether this error came from calling the engine out of order
    pub fn is_not_initialized(&self) -> bool {
        matches!(self, Self::Engine(EngineError::NotInitialized { .. }))
    }

    /// Whether this error is a registry miss
    pub fn is_not_registered(&self) -> bool {
        matches!(self, Self::Registry(RegistryError::NotRegistered { .. }))
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io(IoError::from_std(source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;
    use std::path::Path;

    #[test]
    fn test_not_initialized_error_creation() {
        let error = Error::Engine(EngineError::not_initialized("update"));

        assert!(error.is_not_initialized());
        assert!(error.to_string().contains("update"));
        assert!(error.to_string().contains("init"));
    }

    #[test]
    fn test_counter_overflow_error() {
        let error = Error::Engine(EngineError::CounterOverflow);

        assert!(matches!(
            error,
            Error::Engine(EngineError::CounterOverflow)
        ));
        assert!(error.to_string().contains("2^256"));
    }

    #[test]
    fn test_not_registered_error() {
        let error = Error::Registry(RegistryError::not_registered(
            RegistryKind::Algorithm,
            "whirlpool",
        ));

        assert!(error.is_not_registered());
        assert!(error.to_string().contains("whirlpool"));
        assert!(error.to_string().contains("algorithm"));
    }

    #[test]
    fn test_duplicate_registration_error() {
        let error = Error::Registry(RegistryError::duplicate(RegistryKind::Algorithm, "0x12"));

        assert!(matches!(
            error,
            Error::Registry(RegistryError::DuplicateRegistration { .. })
        ));
        assert!(error.to_string().contains("0x12"));
    }

    #[test]
    fn test_no_default_configured_error() {
        let error = Error::Registry(RegistryError::no_default(RegistryKind::Formatter));

        assert!(error.to_string().contains("No default formatter"));
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: Error = io_error.into();

        match error {
            Error::Io(io_err) => {
                assert_eq!(io_err.kind, IoErrorKind::FileNotFound);
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "Access denied");
        let path = Path::new("/test/secret.bin");
        let error = Error::Io(IoError::permission_denied(path, io_error));

        assert!(error.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }

    #[test]
    fn test_error_display_formatting() {
        let errors = vec![
            Error::Engine(EngineError::not_initialized("finalize")),
            Error::Engine(EngineError::CounterOverflow),
            Error::Engine(EngineError::abstract_invocation("sha512/t", "block_size")),
            Error::Registry(RegistryError::not_registered(RegistryKind::Algorithm, "x")),
            Error::Registry(RegistryError::no_default(RegistryKind::Algorithm)),
            Error::Io(IoError::file_not_found(Path::new("missing.bin"))),
            Error::Validation(ValidationError::invalid_parameter("chunk_target", "zero")),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }
}
