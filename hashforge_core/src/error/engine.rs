//! Hash engine error types

use thiserror::Error;

/// Errors raised by the hash engine and its bit counter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Update or finalize called outside the Ready state
    #[error("Hash engine not initialized: '{operation}' requires a prior call to init")]
    NotInitialized { operation: String },

    /// The bit counter carried past its most significant word
    #[error("Bit counter overflow: more than 2^256 bits hashed")]
    CounterOverflow,

    /// Geometry queried on an algorithm without concrete parameters
    #[error("Abstract invocation: algorithm '{algorithm}' has no concrete {query}")]
    AbstractInvocation { algorithm: String, query: String },
}

impl EngineError {
    /// Create a not-initialized error for the given operation
    pub fn not_initialized(operation: &str) -> Self {
        Self::NotInitialized {
            operation: operation.to_string(),
        }
    }

    /// Create an abstract invocation error
    pub fn abstract_invocation(algorithm: &str, query: &str) -> Self {
        Self::AbstractInvocation {
            algorithm: algorithm.to_string(),
            query: query.to_string(),
        }
    }
}
