//! Core payload types shared by the promise runtime.
//!
//! This crate provides the typed payloads carried by promise events and the
//! error types used across the workspace.
//!
//! # Overview
//!
//! - [`PromiseError`] - Structured rejection reason
//! - [`ErrorKind`] - How a rejection came about
//! - [`Progress`] - Non-terminal progress payload (a fraction in `[0, 1]`)
//! - [`ConfigError`] - Failure to load scheduler configuration
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, Progress, PromiseError};
//!
//! let error = PromiseError::rejected("file not found");
//! assert_eq!(error.kind, ErrorKind::Rejected);
//! assert_eq!(error.to_string(), "rejected: file not found");
//!
//! let progress = Progress::ratio(1, 4);
//! assert_eq!(progress.fraction(), 0.25);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod progress;

pub use error::{ConfigError, ErrorKind, PromiseError};
pub use progress::Progress;
