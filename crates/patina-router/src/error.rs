//! Error types for routing.

use thiserror::Error;

use crate::method::Method;

/// Router-specific errors.
///
/// Every variant is a registration-time failure; a lookup that finds nothing
/// is not an error and is reported as `None` by [`crate::Router::find`].
#[derive(Debug, Error)]
pub enum RouterError {
    /// The pattern as a whole is malformed.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern string.
        pattern: String,
        /// What was wrong with it.
        reason: String,
    },

    /// One segment of the pattern is malformed.
    #[error("invalid segment `{segment}` in pattern `{pattern}`: {reason}")]
    InvalidSegment {
        /// The pattern the segment came from.
        pattern: String,
        /// The offending segment text.
        segment: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A `{name:regex}` constraint failed to compile.
    #[error("invalid constraint `{constraint}` in pattern `{pattern}`: {source}")]
    InvalidConstraint {
        /// The pattern the constraint came from.
        pattern: String,
        /// The constraint text between `:` and `}`.
        constraint: String,
        /// The underlying regex compilation error.
        source: regex::Error,
    },

    /// An equivalent method/pattern pair is already registered.
    #[error("duplicate pattern: {method} {pattern}")]
    DuplicatePattern {
        /// The HTTP method the pattern was registered under.
        method: Method,
        /// The pattern string of the rejected registration.
        pattern: String,
    },
}

impl RouterError {
    pub(crate) fn invalid_pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_segment(pattern: &str, segment: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSegment {
            pattern: pattern.to_string(),
            segment: segment.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
