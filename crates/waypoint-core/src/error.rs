//! Error types for the waypoint router.
//!
//! [`RouterError`] covers every failure the router can surface: malformed
//! locators, unresolvable controllers, action and parameter mismatches, and
//! the configuration faults behind them. Parse-time failures are recoverable
//! and most of them map to a "not found" response via [`RouterError::status_code`].

use thiserror::Error;

/// A field-less discriminant for [`RouterError`].
///
/// Useful when a caller needs to branch on the kind of failure without
/// destructuring the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A malformed locator string.
    InvalidLocator,
    /// No controller matched the leading path segments.
    ControllerNotFound,
    /// A middle path segment names neither a controller nor a directory.
    ControllerPathInvalid,
    /// The action segment is not `name` or `name.ext`.
    InvalidActionFormat,
    /// A path parameter failed its grammar pattern.
    ParamPatternMismatch,
    /// More path segments than grammar positions.
    PathTooDeep,
    /// A route rule string that does not parse or compile.
    InvalidGrammar,
    /// Missing or invalid settings.
    Configuration,
    /// An I/O failure.
    Io,
}

/// The error type returned by parsing and generation.
///
/// Each variant maps to an HTTP status code via [`RouterError::status_code`].
#[derive(Error, Debug)]
pub enum RouterError {
    // ── Locators ─────────────────────────────────────────────────────

    /// A locator string is missing the `:` separator, or one of its sides is empty.
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    // ── Rewrite-mode resolution ──────────────────────────────────────

    /// No controller file matched the leading path segments.
    #[error("Controller not found: {0}")]
    ControllerNotFound(String),

    /// A middle path segment is neither a controller file nor a directory.
    #[error("Invalid controller path: {0}")]
    ControllerPathInvalid(String),

    /// The action segment does not look like `name` or `name.ext`.
    #[error("Invalid action format: {0}")]
    InvalidActionFormat(String),

    /// A path parameter failed its grammar pattern.
    #[error("Parameter '{param}' value '{value}' does not match pattern '{pattern}'")]
    ParamPatternMismatch {
        param: String,
        value: String,
        pattern: String,
    },

    /// The URL carries more path segments than the route grammar accepts.
    #[error("Path too deep: '{path}' accepts at most {max} parameter(s)")]
    PathTooDeep { path: String, max: usize },

    // ── Configuration ────────────────────────────────────────────────

    /// A route rule string cannot be parsed or its pattern does not compile.
    #[error("Invalid route grammar: {0}")]
    InvalidGrammar(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl RouterError {
    /// Returns the discriminant of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLocator(_) => ErrorKind::InvalidLocator,
            Self::ControllerNotFound(_) => ErrorKind::ControllerNotFound,
            Self::ControllerPathInvalid(_) => ErrorKind::ControllerPathInvalid,
            Self::InvalidActionFormat(_) => ErrorKind::InvalidActionFormat,
            Self::ParamPatternMismatch { .. } => ErrorKind::ParamPatternMismatch,
            Self::PathTooDeep { .. } => ErrorKind::PathTooDeep,
            Self::InvalidGrammar(_) => ErrorKind::InvalidGrammar,
            Self::ConfigurationError(_) => ErrorKind::Configuration,
            Self::IoError(_) => ErrorKind::Io,
        }
    }

    /// Returns the HTTP status code associated with this error.
    ///
    /// - `ControllerNotFound`, `ControllerPathInvalid`, `InvalidActionFormat`,
    ///   `ParamPatternMismatch`, `PathTooDeep` -> 404
    /// - Everything else -> 500 (locators are framework-internal, so a bad one
    ///   is a programming error rather than bad user input)
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::ControllerNotFound(_)
            | Self::ControllerPathInvalid(_)
            | Self::InvalidActionFormat(_)
            | Self::ParamPatternMismatch { .. }
            | Self::PathTooDeep { .. } => 404,
            Self::InvalidLocator(_)
            | Self::InvalidGrammar(_)
            | Self::ConfigurationError(_)
            | Self::IoError(_) => 500,
        }
    }

    /// Returns `true` if this error should be answered with a 404.
    pub const fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }
}

/// A convenience type alias for `Result<T, RouterError>`.
pub type RouterResult<T> = Result<T, RouterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_error_status_codes() {
        assert_eq!(RouterError::InvalidLocator("x".into()).status_code(), 500);
        assert_eq!(RouterError::ControllerNotFound("x".into()).status_code(), 404);
        assert_eq!(RouterError::ControllerPathInvalid("x".into()).status_code(), 404);
        assert_eq!(RouterError::InvalidActionFormat("x".into()).status_code(), 404);
        assert_eq!(
            RouterError::ParamPatternMismatch {
                param: "year".into(),
                value: "abcd".into(),
                pattern: r"\d+".into(),
            }
            .status_code(),
            404
        );
        assert_eq!(
            RouterError::PathTooDeep {
                path: "a/b".into(),
                max: 1
            }
            .status_code(),
            404
        );
        assert_eq!(RouterError::InvalidGrammar("x".into()).status_code(), 500);
        assert_eq!(RouterError::ConfigurationError("x".into()).status_code(), 500);
    }

    #[test]
    fn test_router_error_kind() {
        assert_eq!(
            RouterError::InvalidLocator("blog".into()).kind(),
            ErrorKind::InvalidLocator
        );
        assert_eq!(
            RouterError::PathTooDeep {
                path: "x".into(),
                max: 0
            }
            .kind(),
            ErrorKind::PathTooDeep
        );
    }

    #[test]
    fn test_every_variant_has_its_own_kind() {
        let kinds = [
            RouterError::InvalidLocator(String::new()).kind(),
            RouterError::ControllerNotFound(String::new()).kind(),
            RouterError::ControllerPathInvalid(String::new()).kind(),
            RouterError::InvalidActionFormat(String::new()).kind(),
            RouterError::InvalidGrammar(String::new()).kind(),
            RouterError::ConfigurationError(String::new()).kind(),
        ];
        let unique: std::collections::HashSet<_> = kinds.iter().collect();
        assert_eq!(unique.len(), kinds.len());
    }

    #[test]
    fn test_is_not_found() {
        assert!(RouterError::ControllerNotFound("blog".into()).is_not_found());
        assert!(!RouterError::InvalidLocator("blog".into()).is_not_found());
    }

    #[test]
    fn test_router_error_display() {
        let err = RouterError::ParamPatternMismatch {
            param: "year".into(),
            value: "abcd".into(),
            pattern: r"\d+".into(),
        };
        assert_eq!(
            err.to_string(),
            r"Parameter 'year' value 'abcd' does not match pattern '\d+'"
        );
        let err = RouterError::ControllerNotFound("blog".into());
        assert_eq!(err.to_string(), "Controller not found: blog");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RouterError = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("file missing"));
    }
}
