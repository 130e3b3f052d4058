//! Error handling for the apportionment engine
//!
//! Every precondition is checked before any unit is handed out, so a failed
//! call never leaves a partial allocation behind. Callers can match on the
//! variant or use [`ApportionError::category`] for logging.

use std::fmt::Debug;
use thiserror::Error;

/// Error type for apportionment operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApportionError {
    /// A caller-supplied value violates a precondition
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the value
        message: String,
        /// Parameter the value came from (`total`, `initial`, `size`, `units`, ...)
        argument: Option<String>,
        /// Debug rendering of the offending entity key, when there is one
        entity: Option<String>,
    },

    /// The engine failed one of its own invariants
    #[error("Internal error: {message}")]
    Internal {
        /// What went wrong
        message: String,
        /// Engine part that gave up (`driver`, `bounded`, ...)
        component: Option<String>,
    },
}

/// Result type alias for engine operations
pub type ApportionResult<T> = Result<T, ApportionError>;

impl ApportionError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ApportionError::InvalidArgument { .. } => "invalid_argument",
            ApportionError::Internal { .. } => "internal",
        }
    }

    /// True for caller mistakes, false for engine failures
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ApportionError::InvalidArgument { .. })
    }

    /// Name of the parameter that was rejected
    pub fn argument(&self) -> Option<&str> {
        match self {
            ApportionError::InvalidArgument { argument, .. } => argument.as_deref(),
            ApportionError::Internal { .. } => None,
        }
    }

    /// Entity the rejected value belongs to
    pub fn entity(&self) -> Option<&str> {
        match self {
            ApportionError::InvalidArgument { entity, .. } => entity.as_deref(),
            ApportionError::Internal { .. } => None,
        }
    }
}

/// Convenience constructors for common error scenarios
impl ApportionError {
    /// Create an error for a rejected parameter
    pub fn invalid_argument(argument: &str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            argument: Some(argument.to_string()),
            entity: None,
        }
    }

    /// Create an error for a rejected per-entity value
    pub fn invalid_entity<K: Debug + ?Sized>(
        argument: &str,
        entity: &K,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            argument: Some(argument.to_string()),
            entity: Some(format!("{entity:?}")),
        }
    }

    /// Create an internal error with component context
    pub fn internal_component(component: &str, message: impl Into<String>) -> Self {
        Self::Internal { message: message.into(), component: Some(component.to_string()) }
    }
}
