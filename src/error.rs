//! Error types for configuration operations.
//!
//! Failures are split by kind so callers can match on what went wrong:
//! path preconditions, checked type casts, document parsing, and file I/O
//! each get their own variant.

/// Errors raised by configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Empty or malformed dotted path, or an attempt to address through a
    /// non-section node where a section was required.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A checked generic get found a value whose runtime type does not match
    /// the requested one. Permissive accessors fall back to defaults instead
    /// of raising this.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        /// The dotted path that was queried.
        path: String,
        /// The type the caller asked for.
        expected: &'static str,
        /// The runtime tag of the stored value.
        found: &'static str,
    },

    /// The backing document could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the source text.
        line: usize,
        /// What the parser expected or rejected.
        message: String,
    },

    /// File read/write/create failure. Surfaced once, never retried
    /// internally.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Create an invalid-path error with context.
    pub fn invalid_path<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a type-mismatch error for a checked get.
    pub fn type_mismatch<S: Into<String>>(
        path: S,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected,
            found,
        }
    }

    /// Create a parse error at a source line.
    pub fn parse<S: Into<String>>(line: usize, message: S) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Whether the failure is a caller precondition violation rather than an
    /// environment failure. Precondition violations are fixable by the
    /// caller; environment failures are not.
    pub fn is_precondition(&self) -> bool {
        match self {
            ConfigError::InvalidPath(_) => true,
            ConfigError::TypeMismatch { .. } => true,
            ConfigError::Parse { .. } => false,
            ConfigError::Io(_) => false,
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = ConfigError::invalid_path("path is empty");
        assert!(matches!(err, ConfigError::InvalidPath(_)));
        assert!(err.is_precondition());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = ConfigError::type_mismatch("server.port", "integer", "string");
        let msg = format!("{}", err);
        assert!(msg.contains("server.port"));
        assert!(msg.contains("expected integer"));
        assert!(msg.contains("found string"));
    }

    #[test]
    fn test_parse_error_line() {
        let err = ConfigError::parse(7, "expected 'key: value'");
        let msg = format!("{}", err);
        assert!(msg.contains("line 7"));
        assert!(!err.is_precondition());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ConfigError = io.into();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
