//! Dotted path parsing and validation.
//!
//! A path addresses a node in the configuration tree by walking section keys
//! from the root: `"server.network.port"` walks `server`, then `network`,
//! then addresses `port`. Paths are validated before any tree access; a
//! malformed path is a caller precondition failure, not a lookup miss.

use crate::error::{ConfigError, ConfigResult};
use std::fmt;

/// A validated dotted path: one or more non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPath {
    segments: Vec<String>,
}

impl ConfigPath {
    /// Parse a dotted path string.
    ///
    /// Rejects the empty string and any empty segment (`".a"`, `"a."`,
    /// `"a..b"`) with [`ConfigError::InvalidPath`].
    pub fn parse(raw: &str) -> ConfigResult<Self> {
        if raw.is_empty() {
            return Err(ConfigError::invalid_path("path is empty"));
        }
        let mut segments = Vec::new();
        for segment in raw.split('.') {
            if segment.is_empty() {
                return Err(ConfigError::invalid_path(format!(
                    "empty segment in '{}'",
                    raw
                )));
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Every segment except the final one. These address the parent chain of
    /// sections; the final segment addresses the target itself.
    pub fn parent(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The final segment, which addresses the target value or sub-section.
    pub fn last(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Number of segments. Always at least one.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a parsed path; present for completeness.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Join a base path and a relative path into a dotted string. An empty base
/// yields the relative path unchanged. Used by section handles and deep key
/// enumeration.
pub fn join_dotted(base: &str, rel: &str) -> String {
    if base.is_empty() {
        rel.to_string()
    } else {
        format!("{}.{}", base, rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let path = ConfigPath::parse("server.port").unwrap();
        assert_eq!(path.segments(), &["server", "port"]);
        assert_eq!(path.parent(), &["server"]);
        assert_eq!(path.last(), "port");
        assert_eq!(path.to_string(), "server.port");
    }

    #[test]
    fn test_parse_single_segment() {
        let path = ConfigPath::parse("debug").unwrap();
        assert!(path.parent().is_empty());
        assert_eq!(path.last(), "debug");
        assert_eq!(path.len(), 1);
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            ConfigPath::parse(""),
            Err(ConfigError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_rejects_empty_segments() {
        for bad in [".a", "a.", "a..b", "."] {
            assert!(
                matches!(ConfigPath::parse(bad), Err(ConfigError::InvalidPath(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_join_dotted() {
        assert_eq!(join_dotted("", "a"), "a");
        assert_eq!(join_dotted("a.b", "c"), "a.b.c");
    }
}
