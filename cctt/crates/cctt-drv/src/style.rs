//! Terminal output styling.

use cctt_util::Error;

/// ANSI escape set used for diagnostic output. The `PLAIN` instance
/// renders nothing, for non-terminals and `--no-color`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Styles {
    pub normal: &'static str,
    pub location: &'static str,
    pub source: &'static str,
    pub path: &'static str,
    pub error: &'static str,
}

impl Styles {
    pub const COLORED: Styles = Styles {
        normal: "\x1b[0m",
        location: "\x1b[1;36m",
        source: "\x1b[1;35m",
        path: "\x1b[0;33m",
        error: "\x1b[1;31m",
    };

    pub const PLAIN: Styles = Styles {
        normal: "",
        location: "",
        source: "",
        path: "",
        error: "",
    };

    /// Render one diagnostic line for a failed file.
    pub fn render_failure(&self, path: &std::path::Path, error: &Error) -> String {
        match error.diagnostic() {
            Some(diagnostic) => {
                let mut line = format!(
                    "{}Error{} processing {}{}{} at {}{}{} {}{}{}",
                    self.error,
                    self.normal,
                    self.path,
                    path.display(),
                    self.normal,
                    self.location,
                    diagnostic.location,
                    self.normal,
                    self.source,
                    diagnostic.snippet,
                    self.normal,
                );
                if let Some((location, snippet)) = &diagnostic.related {
                    line.push_str(&format!(
                        " and {}{}{} {}{}{}",
                        self.location, location, self.normal, self.source, snippet, self.normal,
                    ));
                }
                line.push_str(&format!(": {}", diagnostic.reason));
                line
            }
            None => format!(
                "{}Error{} processing {}{}{}: {error}",
                self.error,
                self.normal,
                self.path,
                path.display(),
                self.normal,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cctt_util::{quote, Location};
    use std::path::Path;

    fn sample_error() -> Error {
        Error::scanning(Location { line: 2, column: 5 }, quote("@"), "unknown character.")
    }

    #[test]
    fn test_plain_render_has_no_escapes() {
        let line = Styles::PLAIN.render_failure(Path::new("a.cpp"), &sample_error());
        assert_eq!(line, "Error processing a.cpp at 2:5 \"@\": unknown character.");
    }

    #[test]
    fn test_colored_render_wraps_pieces() {
        let line = Styles::COLORED.render_failure(Path::new("a.cpp"), &sample_error());
        assert!(line.contains("\x1b[1;31mError\x1b[0m"));
        assert!(line.contains("\x1b[1;36m2:5\x1b[0m"));
        assert!(line.contains("unknown character."));
    }

    #[test]
    fn test_io_error_renders_without_location() {
        let error = Error::from(std::io::Error::new(std::io::ErrorKind::Other, "sink"));
        let line = Styles::PLAIN.render_failure(Path::new("a.cpp"), &error);
        assert!(line.starts_with("Error processing a.cpp: "));
    }
}
