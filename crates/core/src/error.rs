//! Error types for aaview operations.
//!
//! This module defines the main error type [`AaviewError`] along with the
//! coarse [`ErrorCategory`] used at the pipeline boundary to turn any failure
//! into exactly one user-facing message.
//!
//! # Example
//!
//! ```rust
//! use aaview_core::{AaviewError, ErrorCategory};
//!
//! let err = AaviewError::NoPosts;
//! assert_eq!(err.category(), ErrorCategory::EmptyResult);
//! assert!(!err.category().is_fatal());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetching, decoding and extracting thread pages.
#[derive(Error, Debug)]
pub enum AaviewError {
    /// HTTP transport errors from reqwest.
    ///
    /// Covers DNS failures, refused connections, TLS problems and
    /// truncated bodies.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} returned for {url}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Input could not be turned into a fetchable URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid CSS selector for header or body elements.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// The document parsed, but no header/body pair was found.
    #[error("No posts could be extracted from the document")]
    NoPosts,

    /// Posts were extracted, but filtering and range selection left none.
    #[error("No posts left in range {label}")]
    EmptySelection { label: String },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read and write errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("Failed to serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// User-visible failure classes.
///
/// Every [`AaviewError`] maps onto exactly one category so callers can print
/// a single message per failure without inspecting individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input could not be coerced into a URL.
    InvalidUrl,
    /// Network error, non-success status, or timeout.
    FetchFailure,
    /// Nothing to show. Informational, not a failure of the tool.
    EmptyResult,
    /// Local I/O and selector problems.
    Other,
}

impl ErrorCategory {
    /// Whether the category should be reported as an error rather than a notice.
    pub fn is_fatal(self) -> bool {
        !matches!(self, ErrorCategory::EmptyResult)
    }
}

impl AaviewError {
    /// Returns the user-visible category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            AaviewError::InvalidUrl(_) => ErrorCategory::InvalidUrl,
            #[cfg(feature = "fetch")]
            AaviewError::HttpError(_) => ErrorCategory::FetchFailure,
            AaviewError::HttpStatus { .. } | AaviewError::Timeout { .. } => ErrorCategory::FetchFailure,
            AaviewError::NoPosts | AaviewError::EmptySelection { .. } => ErrorCategory::EmptyResult,
            AaviewError::HtmlParseError(_)
            | AaviewError::FileNotFound(_)
            | AaviewError::Io(_)
            | AaviewError::Serialization(_) => ErrorCategory::Other,
        }
    }

    /// One-line message suitable for showing to the person who triggered the request.
    pub fn user_message(&self) -> String {
        match self.category() {
            ErrorCategory::InvalidUrl => format!("Could not use that input as a URL ({})", self),
            ErrorCategory::FetchFailure => format!("Failed to fetch the page: {}", self),
            ErrorCategory::EmptyResult => self.to_string(),
            ErrorCategory::Other => self.to_string(),
        }
    }
}

/// Result type alias for AaviewError.
pub type Result<T> = std::result::Result<T, AaviewError>;
