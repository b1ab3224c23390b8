//! Error types shared by the scanner, the token tree, and the walker.
//!
//! Two error families exist (scanning errors are byte-level, parsing
//! errors are token-level); both carry a [`Diagnostic`] with the
//! location, the quoted offending snippet, and a reason. Neither is
//! recoverable: construction of a token tree or a walk over it stops at
//! the first error.

use std::fmt;

use thiserror::Error;

use crate::location::Location;

/// A formatted error site: where, what the source looked like, and why
/// it was rejected. Some errors cite a second, related site (e.g. both
/// ends of an unmatching bracket pair).
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Primary location.
    pub location: Location,
    /// Quoted, one-line snippet of the offending bytes (see
    /// [`crate::quote`]).
    pub snippet: String,
    /// Optional related site cited alongside the primary one.
    pub related: Option<(Location, String)>,
    /// Human-readable reason.
    pub reason: String,
}

impl Diagnostic {
    /// Create a diagnostic for a single site.
    pub fn new(location: Location, snippet: String, reason: impl Into<String>) -> Self {
        Self {
            location,
            snippet,
            related: None,
            reason: reason.into(),
        }
    }

    /// Attach a second site to cite alongside the primary one.
    pub fn with_related(mut self, location: Location, snippet: String) -> Self {
        self.related = Some((location, snippet));
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.location, self.snippet)?;
        if let Some((location, snippet)) = &self.related {
            write!(f, " and {location} {snippet}")?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Errors produced by the cctt pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Byte-level scanning error: unknown character, unterminated
    /// literal or comment, bad raw-string delimiter.
    #[error("{0}")]
    Scanning(Diagnostic),

    /// Token-level parsing error: bracket mismatches and every shape
    /// the introspection walker rejects.
    #[error("{0}")]
    Parsing(Diagnostic),

    /// An I/O failure, surfaced by handlers that write their output.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a single-site scanning error.
    pub fn scanning(location: Location, snippet: String, reason: impl Into<String>) -> Self {
        Self::Scanning(Diagnostic::new(location, snippet, reason))
    }

    /// Shorthand for a single-site parsing error.
    pub fn parsing(location: Location, snippet: String, reason: impl Into<String>) -> Self {
        Self::Parsing(Diagnostic::new(location, snippet, reason))
    }

    /// The diagnostic carried by this error, if any.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Scanning(d) | Self::Parsing(d) => Some(d),
            Self::Io(_) => None,
        }
    }
}

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote;

    fn at(line: usize, column: usize) -> Location {
        Location { line, column }
    }

    #[test]
    fn test_single_site_display() {
        let err = Error::scanning(at(3, 7), quote("@"), "unknown character.");
        assert_eq!(err.to_string(), "3:7 \"@\": unknown character.");
    }

    #[test]
    fn test_related_site_display() {
        let diag = Diagnostic::new(at(1, 2), quote("("), "unmatching pair.")
            .with_related(at(4, 5), quote("}"));
        assert_eq!(
            Error::Parsing(diag).to_string(),
            "1:2 \"(\" and 4:5 \"}\": unmatching pair."
        );
    }

    #[test]
    fn test_diagnostic_accessor() {
        let err = Error::parsing(at(1, 1), quote(";"), "not introspectable.");
        assert_eq!(err.diagnostic().map(|d| d.location.line), Some(1));

        let io = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "x"));
        assert!(io.diagnostic().is_none());
    }

    #[test]
    fn test_snippet_is_escaped() {
        let err = Error::scanning(at(1, 1), quote("a b"), "r");
        assert_eq!(err.to_string(), "1:1 \"a\u{2423}b\": r");
    }
}
