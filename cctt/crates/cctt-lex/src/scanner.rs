//! The lexical scanner: bytes in, tokens out.
//!
//! A forward byte-at-a-time recognizer for sloppy C++. Whitespace,
//! `//` and `/* */` comments, and `#` directives produce no tokens;
//! directives and line comments honor backslash line continuations.
//! Symbol combining is deliberately asymmetric: `<` combines into `<<`
//! and `<=`, but `>` stays single so that `T<U<V>>` scans as two `>`
//! tokens, and `[`/`]` never combine so that `x[y[i]]` works. The pair
//! builder sorts out the resulting ambiguity later.
//!
//! Since we are being sloppy, `$` is accepted in identifiers, and
//! `` ` `` and `@` are accepted as symbols.

use cctt_util::{quote, Error, LineIndex, Result};

use crate::cursor::Cursor;
use crate::token::{Tag, TagSet, Token};

/// Delimiter length limit for raw strings, defined by the C++ Standard.
const RAW_DELIMITER_MAX: usize = 16;

const IDENTIFIER: TagSet = TagSet::of(Tag::Identifier);
const SYMBOL: TagSet = TagSet::of(Tag::Symbol);
const NUMBER: TagSet = TagSet::of(Tag::Literal).with(Tag::Number);
const STRING: TagSet = TagSet::of(Tag::Literal).with(Tag::String).with(Tag::Line);
const RAW_STRING: TagSet = TagSet::of(Tag::Literal).with(Tag::String).with(Tag::Block);
const CHARACTER: TagSet = TagSet::of(Tag::Literal).with(Tag::Character);
const END: TagSet = TagSet::of(Tag::End);

/// Scan `source` into a token vector, terminated by the zero-width
/// sentinel token at source end.
///
/// `lines` must be the line index of the same `source`; the scanner
/// uses it both to skip whole (possibly continued) lines and to locate
/// errors.
pub fn scan(source: &str, lines: &LineIndex) -> Result<Vec<Token>> {
    Scanner::new(source, lines).scan()
}

struct Scanner<'src, 'idx> {
    source: &'src str,
    cursor: Cursor<'src>,
    lines: &'idx LineIndex,
    tokens: Vec<Token>,
    token_start: usize,
}

impl<'src, 'idx> Scanner<'src, 'idx> {
    fn new(source: &'src str, lines: &'idx LineIndex) -> Self {
        Self {
            source,
            cursor: Cursor::new(source),
            lines,
            tokens: Vec::with_capacity(estimate_token_count(source.len())),
            token_start: 0,
        }
    }

    fn scan(mut self) -> Result<Vec<Token>> {
        self.skip_bom();

        while !self.cursor.at_end() {
            self.token_start = self.cursor.pos();
            let byte = self.cursor.peek();
            self.cursor.bump();

            match byte {
                b'\x20' | b'\r' | b'\n' | b'\t' | b'\x0c' | b'\x0b' => {}

                b'>' | b'(' | b')' | b'[' | b']' | b'{' | b'}' | b',' | b'?' | b';'
                | b'~' | b'%' | b'\\' | b'`' | b'@' => self.commit(SYMBOL),

                // pair-or-assign: ++ += && &= || |= << <=
                b'+' | b'&' | b'|' | b'<' => {
                    let next = self.cursor.peek();
                    if next == b'=' || next == byte {
                        self.cursor.bump();
                    }
                    self.commit(SYMBOL);
                }

                b'=' | b'!' | b'*' | b'^' => {
                    self.cursor.bump_if(b'=');
                    self.commit(SYMBOL);
                }

                b':' => {
                    self.cursor.bump_if(b':');
                    self.commit(SYMBOL);
                }

                b'-' => {
                    if matches!(self.cursor.peek(), b'-' | b'=' | b'>') {
                        self.cursor.bump();
                    }
                    self.commit(SYMBOL);
                }

                b'.' => {
                    if self.skip_digits() {
                        self.commit(NUMBER);
                    } else {
                        if self.cursor.peek() == b'.' && self.cursor.peek_at(1) == b'.' {
                            self.cursor.bump_n(2);
                        }
                        self.commit(SYMBOL);
                    }
                }

                b'#' => self.skip_until_next_line(),

                b'/' => match self.cursor.peek() {
                    b'/' => self.skip_until_next_line(),
                    b'*' => {
                        self.cursor.bump();
                        self.skip_past("*/")?;
                    }
                    b'=' => {
                        self.cursor.bump();
                        self.commit(SYMBOL);
                    }
                    _ => self.commit(SYMBOL),
                },

                b'"' => {
                    self.skip_after_unescaped(b'"')?;
                    self.commit(STRING);
                }

                b'\'' => {
                    self.skip_after_unescaped(b'\'')?;
                    self.commit(CHARACTER);
                }

                // Sloppy numbers: digits with `'` separators, at most
                // one interior dot.
                b'0'..=b'9' => {
                    self.skip_digit_run();
                    if self.cursor.peek() == b'.' {
                        self.cursor.bump();
                        self.skip_digits();
                    }
                    self.commit(NUMBER);
                }

                b'_' | b'$' | b'a'..=b'z' | b'A'..=b'Z' => {
                    while is_identifier_rest(self.cursor.peek()) {
                        self.cursor.bump();
                    }

                    // Raw strings start with one of:
                    //     R"  u8R"  uR"  UR"  LR"
                    if self.cursor.peek() == b'"' && self.cursor.prev() == b'R' {
                        self.scan_raw_string()?;
                        self.commit(RAW_STRING);
                    } else {
                        self.commit(IDENTIFIER);
                    }
                }

                _ => return Err(self.error("unknown character.")),
            }
        }

        // sentinel
        self.token_start = self.cursor.pos();
        self.commit(END);

        Ok(self.tokens)
    }

    /// Skip the so-called UTF-8 BOM at the beginning of the file.
    fn skip_bom(&mut self) {
        if self.source.as_bytes().starts_with(&[0xef, 0xbb, 0xbf]) {
            self.cursor.bump_n(3);
        }
    }

    fn commit(&mut self, tags: TagSet) {
        self.tokens.push(Token {
            first: self.token_start as u32,
            last: self.cursor.pos() as u32,
            tags,
            pair: None,
            parent: None,
        });
    }

    /// Advance past the end of the current logical line. A backslash
    /// immediately before the line break continues the logical line;
    /// `\r`, `\n`, and `\r\n` breaks are handled identically.
    fn skip_until_next_line(&mut self) {
        let bytes = self.source.as_bytes();
        loop {
            let next = self.lines.start_of_next_line(self.cursor.pos());
            self.cursor.set_pos(next);
            if self.cursor.at_end() {
                break;
            }

            let mut p = next;
            if p > self.token_start && bytes[p - 1] == b'\n' {
                p -= 1;
            }
            if p > self.token_start && bytes[p - 1] == b'\r' {
                p -= 1;
            }
            if p > self.token_start && bytes[p - 1] == b'\\' {
                continue;
            }
            break;
        }
    }

    /// Advance to just past the next `target` byte that is not preceded
    /// by a backslash escape.
    fn skip_after_unescaped(&mut self, target: u8) -> Result<()> {
        let bytes = self.source.as_bytes();
        let mut p = self.cursor.pos();
        while p < bytes.len() {
            if bytes[p] == b'\\' {
                p += 2;
                continue;
            }
            if bytes[p] == target {
                self.cursor.set_pos(p + 1);
                return Ok(());
            }
            p += 1;
        }
        Err(self.missing_pair(&(target as char).to_string()))
    }

    /// Advance to just past the next occurrence of `needle`.
    fn skip_past(&mut self, needle: &str) -> Result<()> {
        match self.source[self.cursor.pos()..].find(needle) {
            Some(n) => {
                self.cursor.bump_n(n + needle.len());
                Ok(())
            }
            None => Err(self.missing_pair(needle)),
        }
    }

    /// Consume a digit run starting with a real digit, then digits and
    /// `'` separators. Returns false (consuming nothing) otherwise.
    fn skip_digits(&mut self) -> bool {
        if !self.cursor.peek().is_ascii_digit() {
            return false;
        }
        self.cursor.bump();
        self.skip_digit_run();
        true
    }

    /// Consume digits and `'` separators.
    fn skip_digit_run(&mut self) {
        while matches!(self.cursor.peek(), b'0'..=b'9' | b'\'') {
            self.cursor.bump();
        }
    }

    /// Scan the remainder of a raw string literal; the cursor is on the
    /// `"` following the `R` of the prefix.
    fn scan_raw_string(&mut self) -> Result<()> {
        self.cursor.bump(); // the opening quote
        let delimiter_start = self.cursor.pos();

        loop {
            if self.cursor.at_end() {
                return Err(self.error("raw string requires R\"DELIMITER( )DELIMITER\"."));
            }
            if self.cursor.pos() - delimiter_start > RAW_DELIMITER_MAX {
                return Err(self.error("raw string delimiter is longer than 16 characters."));
            }
            match self.cursor.peek() {
                b'\x20' | b'\r' | b'\n' | b'\t' | b'\x0c' | b'\x0b' | b')' | b'\\' => {
                    self.cursor.bump();
                    return Err(self.error("invalid raw string delimiter."));
                }
                b'(' => break,
                _ => self.cursor.bump(),
            }
        }

        let delimiter = &self.source[delimiter_start..self.cursor.pos()];
        let closing = format!("){delimiter}\"");
        self.cursor.bump(); // the '('
        self.skip_past(&closing)
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        let snippet = &self.source[self.token_start..self.cursor.pos()];
        Error::scanning(
            self.lines.location_of(self.token_start),
            quote(snippet),
            reason,
        )
    }

    fn missing_pair(&self, pair: &str) -> Error {
        self.error(format!("missing paired {}.", quote(pair)))
    }
}

fn is_identifier_rest(byte: u8) -> bool {
    matches!(byte, b'_' | b'$' | b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9')
}

fn estimate_token_count(source_len: usize) -> usize {
    const LEAST_TOKEN_COUNT: usize = 1024;
    const BYTES_PER_TOKEN: usize = 4;
    (source_len / BYTES_PER_TOKEN).max(LEAST_TOKEN_COUNT)
}
