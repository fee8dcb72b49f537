//! Error types for the chatpane core library.
//!
//! Provider-side failures never surface here: transport, retry and delivery
//! belong to the provider. What remains are misuses of the binding itself and
//! configuration problems.
//!
//! # Error Codes Reference
//!
//! | Code Range | Category | Description |
//! |------------|----------|-------------|
//! | E1001-E1099 | Binding | Lifecycle and row lookup errors |
//! | E2001-E2099 | Config | Config file, environment and validation errors |

use thiserror::Error;

use crate::config::ConfigLoadError;

#[derive(Debug, Error)]
pub enum ChatError {
    // ========================================================================
    // Binding Errors (E1001-E1099)
    // ========================================================================
    /// An operation was invoked before `initialize`
    #[error("[E1001] Binding is not initialized: cannot {0}")]
    NotBound(&'static str),

    /// `initialize` was called on an already bound binding
    #[error("[E1002] Binding is already bound to a conversation")]
    AlreadyBound,

    /// The list control asked for a row the binding does not have
    #[error("[E1003] Row {index} out of bounds for {len} rows")]
    RowOutOfBounds { index: usize, len: usize },

    // ========================================================================
    // Configuration Errors (E2001-E2099)
    // ========================================================================
    #[error("[E2001] {0}")]
    Config(#[from] ConfigLoadError),
}

impl ChatError {
    pub fn code(&self) -> &'static str {
        match self {
            ChatError::NotBound(_) => "E1001",
            ChatError::AlreadyBound => "E1002",
            ChatError::RowOutOfBounds { .. } => "E1003",
            ChatError::Config(_) => "E2001",
        }
    }

    /// Binding errors are programming errors in the caller, not runtime faults.
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            ChatError::NotBound(_) | ChatError::AlreadyBound | ChatError::RowOutOfBounds { .. }
        )
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
