//! Error types for command definition, option parsing and callbacks.

use std::sync::Arc;
use thiserror::Error;

/// Errors raised while assembling a command definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandDefinitionError {
    /// The command name is empty after trimming.
    #[error("command name must not be blank")]
    BlankName,
}

/// Errors raised while parsing command arguments.
///
/// These are recoverable: the dispatcher answers with usage help.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsageError {
    /// An option was not recognized and unknown options are rejected.
    #[error("'{0}' is not a recognized option")]
    Unrecognized(String),

    /// An option that takes an argument was given none.
    #[error("option '{option}' requires an argument")]
    MissingArgument {
        /// Option spellings joined by `/`.
        option: String,
    },

    /// A flag that takes no argument was given one.
    #[error("option '{option}' does not accept an argument")]
    UnexpectedArgument {
        /// Option spellings joined by `/`.
        option: String,
    },

    /// An option argument failed validation.
    #[error("invalid value '{value}' for option '{option}': {reason}")]
    InvalidArgument {
        /// Option spellings joined by `/`.
        option: String,
        /// Rejected value.
        value: String,
        /// Validation failure reason.
        reason: String,
    },

    /// Required options were absent.
    #[error("missing required option(s): {}", .0.join(", "))]
    MissingRequired(Vec<String>),
}

/// Failure reported by a command callback.
///
/// Callback failures are logged by the dispatcher and never affect other
/// dispatches.
#[derive(Debug, Clone, Error)]
pub enum CallbackError {
    /// A messaging call made by the callback failed.
    #[error("messaging failed: {0}")]
    Messaging(Arc<dyn std::error::Error + Send + Sync>),

    /// The callback gave up with a description.
    #[error("{0}")]
    Message(String),

    /// The callback failed with an underlying error.
    #[error("callback failed: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl CallbackError {
    /// Wraps an arbitrary error raised inside a callback.
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }

    /// Creates a failure from a plain description.
    pub fn message(description: impl Into<String>) -> Self {
        Self::Message(description.into())
    }
}

/// Result returned by command callbacks.
pub type CallbackResult = Result<(), CallbackError>;
