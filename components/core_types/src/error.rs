//! Rejection reasons and configuration errors.
//!
//! A promise rejects with a single structured error rather than a loose list
//! of arguments. [`ErrorKind`] records where the failure came from.

use thiserror::Error;

/// The origin of a promise rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A producer explicitly rejected the promise
    Rejected,
    /// A resolve or reject handler returned an error while running
    Thrown,
}

impl ErrorKind {
    /// Short lowercase label used in `Display` output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Rejected => "rejected",
            ErrorKind::Thrown => "thrown",
        }
    }
}

/// A promise rejection reason.
///
/// This is the default error type of `Promise<T>`. It is cheap to clone so
/// that a rejection can be delivered to every listener of a promise.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, PromiseError};
///
/// let error = PromiseError::thrown("boom");
/// assert_eq!(error.kind, ErrorKind::Thrown);
/// assert_eq!(error.message, "boom");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", .kind.as_str())]
pub struct PromiseError {
    /// Where the failure came from
    pub kind: ErrorKind,
    /// Human-readable failure message
    pub message: String,
}

impl PromiseError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A producer-reported failure.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Rejected, message)
    }

    /// A failure raised by a handler in a `then` chain.
    pub fn thrown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Thrown, message)
    }
}

/// Errors produced while loading a scheduler configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration text could not be parsed
    #[error("invalid scheduler config: {0}")]
    Parse(String),
    /// A field held a value outside its allowed range
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was refused
        reason: String,
    },
}
