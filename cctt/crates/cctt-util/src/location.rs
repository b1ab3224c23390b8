//! Line/column service.
//!
//! A [`LineIndex`] is built once per source buffer in a single pass and
//! answers "which line/column is this byte offset on" via binary search
//! over start-of-line offsets.

use std::fmt;

/// A human-readable source position. Lines and columns are 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// Line number (1-based).
    pub line: usize,
    /// Column number (1-based, in bytes).
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Sorted start-of-line offsets for one source buffer.
///
/// Entry 0 is the source start; entry `i` (for `i > 0`) is the byte
/// immediately after the `i`-th newline; the last entry is the source
/// end, acting as a sentinel. `\r\n` counts as a single newline, and so
/// does a lone `\r`.
///
/// # Examples
///
/// ```
/// use cctt_util::LineIndex;
///
/// let index = LineIndex::new("ab\ncd");
/// let loc = index.location_of(3);
/// assert_eq!((loc.line, loc.column), (2, 1));
/// ```
#[derive(Clone, Debug)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    /// Build the index in a single pass over `source`.
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut starts = vec![0];

        for (i, &b) in bytes.iter().enumerate() {
            match b {
                b'\n' => starts.push(i + 1),
                // A lone `\r` is a newline; `\r\n` is handled at the `\n`.
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => starts.push(i + 1),
                _ => {}
            }
        }

        if *starts.last().unwrap_or(&0) != bytes.len() {
            starts.push(bytes.len());
        }

        Self { starts }
    }

    /// Resolve a byte offset to a 1-based line/column pair.
    ///
    /// Offsets at or past the source end are clamped onto the last line,
    /// so the lookup is total and the column is always at least 1.
    pub fn location_of(&self, offset: usize) -> Location {
        let line = self
            .starts
            .partition_point(|&start| start <= offset)
            .clamp(1, self.starts.len().max(2) - 1);
        Location {
            line,
            column: offset - self.starts[line - 1] + 1,
        }
    }

    /// The offset of the first line start strictly after `offset`, or the
    /// source end when `offset` is on the last line.
    pub fn start_of_next_line(&self, offset: usize) -> usize {
        let idx = self.starts.partition_point(|&start| start <= offset);
        match self.starts.get(idx) {
            Some(&start) => start,
            None => *self.starts.last().unwrap_or(&0),
        }
    }

    /// Start-of-line offsets, including the source-end sentinel.
    pub fn starts(&self) -> &[usize] {
        &self.starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source() {
        let index = LineIndex::new("");
        assert_eq!(index.starts(), &[0]);
        let loc = index.location_of(0);
        assert_eq!((loc.line, loc.column), (1, 1));
    }

    #[test]
    fn test_single_line() {
        let index = LineIndex::new("abc");
        assert_eq!(index.starts(), &[0, 3]);
        assert_eq!(index.location_of(0), Location { line: 1, column: 1 });
        assert_eq!(index.location_of(2), Location { line: 1, column: 3 });
    }

    #[test]
    fn test_lines_start_after_newlines() {
        let index = LineIndex::new("ab\ncd\ne");
        assert_eq!(index.starts(), &[0, 3, 6, 7]);
        assert_eq!(index.location_of(3), Location { line: 2, column: 1 });
        assert_eq!(index.location_of(4), Location { line: 2, column: 2 });
        assert_eq!(index.location_of(6), Location { line: 3, column: 1 });
    }

    #[test]
    fn test_crlf_counts_as_one_newline() {
        let index = LineIndex::new("ab\r\ncd");
        assert_eq!(index.starts(), &[0, 4, 6]);
        assert_eq!(index.location_of(4), Location { line: 2, column: 1 });
    }

    #[test]
    fn test_lone_cr_counts_as_newline() {
        let index = LineIndex::new("ab\rcd");
        assert_eq!(index.starts(), &[0, 3, 5]);
        assert_eq!(index.location_of(3), Location { line: 2, column: 1 });
    }

    #[test]
    fn test_mixed_line_endings() {
        let index = LineIndex::new("a\nb\rc\r\nd");
        assert_eq!(index.starts(), &[0, 2, 4, 7, 8]);
        assert_eq!(index.location_of(7), Location { line: 4, column: 1 });
    }

    #[test]
    fn test_trailing_newline_doubles_as_sentinel() {
        let index = LineIndex::new("ab\n");
        assert_eq!(index.starts(), &[0, 3]);
    }

    #[test]
    fn test_sorted_strictly_increasing() {
        let index = LineIndex::new("one\ntwo\r\nthree\rfour\n");
        let starts = index.starts();
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let index = LineIndex::new("ab");
        let loc = index.location_of(2);
        assert_eq!((loc.line, loc.column), (1, 3));
    }

    #[test]
    fn test_start_of_next_line() {
        let index = LineIndex::new("ab\ncd\ne");
        assert_eq!(index.start_of_next_line(0), 3);
        assert_eq!(index.start_of_next_line(2), 3);
        assert_eq!(index.start_of_next_line(3), 6);
        assert_eq!(index.start_of_next_line(6), 7);
    }

    #[test]
    fn test_location_display() {
        let loc = Location { line: 3, column: 14 };
        assert_eq!(loc.to_string(), "3:14");
    }
}
