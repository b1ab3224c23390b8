//! The token tree: a flat token array with pair and parent links.
//!
//! The pair builder resolves the scanner's deliberate `<`/`>`
//! ambiguity with a stack protocol: `<` and `>` may be template
//! brackets or comparison operators, and a `;`, `)`, `]`, or `}` proves
//! that any pending `<` above the nearest real bracket was a
//! comparison. This accepts sloppy constructs like `x<int>=10`.

use cctt_util::{quote, Error, Idx, LineIndex, Location, Result};

use crate::scanner;
use crate::token::{Tag, Token, TokenId};

/// An immutable token tree over a borrowed source buffer.
///
/// The token vector always ends with the zero-width sentinel token
/// (tag [`Tag::End`]) at source end, so `tokens()[end_index()]` is
/// always valid.
///
/// # Examples
///
/// ```
/// use cctt_lex::TokenTree;
///
/// let tree = TokenTree::new("f(a, b);").unwrap();
/// let open = &tree.tokens()[1];
/// let close = &tree.tokens()[5];
/// assert_eq!(open.pair, Some(cctt_lex::TokenId(5)));
/// assert_eq!(close.pair, Some(cctt_lex::TokenId(1)));
/// ```
#[derive(Debug)]
pub struct TokenTree<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    lines: LineIndex,
}

impl<'src> TokenTree<'src> {
    /// Scan `source` and attach pair and parent links.
    ///
    /// # Errors
    ///
    /// Returns a scanning error for byte-level problems (unknown
    /// characters, unterminated literals or comments, bad raw-string
    /// delimiters) and a parsing error for bracket mismatches.
    pub fn new(source: &'src str) -> Result<Self> {
        let lines = LineIndex::new(source);
        let tokens = scanner::scan(source, &lines)?;
        let mut tree = Self {
            source,
            tokens,
            lines,
        };
        tree.build_pairs()?;
        tree.build_parents();
        Ok(tree)
    }

    /// The source buffer the tree was built from.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// All tokens, including the trailing sentinel.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Index of the sentinel token.
    pub fn end_index(&self) -> usize {
        self.tokens.len() - 1
    }

    /// The token at `id`.
    pub fn get(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    /// Source text of the token at `id`.
    pub fn text(&self, id: TokenId) -> &'src str {
        self.text_at(id.index())
    }

    /// Source text of the token at a raw index.
    pub fn text_at(&self, index: usize) -> &'src str {
        &self.source[self.tokens[index].range()]
    }

    /// Source text spanning from the start of the token at `first` to
    /// the end of the token at `last`, inclusive of both.
    pub fn span_text(&self, first: TokenId, last: TokenId) -> &'src str {
        &self.source[self.get(first).first as usize..self.get(last).last as usize]
    }

    /// Resolve a byte offset to a line/column pair.
    pub fn location_of(&self, offset: usize) -> Location {
        self.lines.location_of(offset)
    }

    /// Location of the token at a raw index.
    pub fn token_location(&self, index: usize) -> Location {
        self.location_of(self.tokens[index].first as usize)
    }

    /// The index after the token at `index`, skipping a whole paired
    /// group when `index` is an open bracket. Clamped to the sentinel.
    pub fn next_of(&self, index: usize) -> usize {
        let next = match self.tokens[index].pair {
            Some(pair) if pair.index() > index => pair.index() + 1,
            _ => index + 1,
        };
        next.min(self.end_index())
    }

    /// The single-character symbol byte of the token at `index`, or 0
    /// if the token is anything else.
    fn symbol_at(&self, index: usize) -> u8 {
        let token = &self.tokens[index];
        if token.tags.contains(Tag::Symbol) && token.len() == 1 {
            self.source.as_bytes()[token.first as usize]
        } else {
            0
        }
    }

    fn build_pairs(&mut self) -> Result<()> {
        let mut pending: Vec<usize> = Vec::new();

        for index in 0..self.tokens.len() {
            let symbol = self.symbol_at(index);
            if symbol == 0 {
                continue;
            }

            if matches!(symbol, b'<' | b'(' | b'[' | b'{') {
                pending.push(index);
            }

            // `;` or a real closing bracket proves pending `<` above the
            // nearest real bracket were comparisons, not template openers.
            if matches!(symbol, b';' | b')' | b']' | b'}') {
                while pending.last().is_some_and(|&top| self.symbol_at(top) == b'<') {
                    pending.pop();
                }
            }

            if matches!(symbol, b'>' | b')' | b']' | b'}') {
                match pending.last().copied() {
                    None => {
                        if symbol != b'>' {
                            return Err(self.excessive_close(index));
                        }
                        // A lone `>` was a comparison.
                    }
                    Some(open) => {
                        if self.symbol_at(open) == open_symbol_of(symbol) {
                            pending.pop();
                            self.tokens[open].pair = Some(TokenId::from_usize(index));
                            self.tokens[index].pair = Some(TokenId::from_usize(open));
                        } else if symbol != b'>' {
                            return Err(self.unmatching_pair(open, index));
                        }
                    }
                }
            }
        }

        while pending.last().is_some_and(|&top| self.symbol_at(top) == b'<') {
            pending.pop();
        }

        match pending.last().copied() {
            Some(open) => Err(self.missing_close(open)),
            None => Ok(()),
        }
    }

    fn build_parents(&mut self) {
        let mut parents: Vec<Option<TokenId>> = vec![None];

        for index in 0..self.tokens.len() {
            match self.tokens[index].pair {
                None => {
                    self.tokens[index].parent = parents.last().copied().flatten();
                }
                Some(pair) if pair.index() > index => {
                    self.tokens[index].parent = parents.last().copied().flatten();
                    parents.push(Some(TokenId::from_usize(index)));
                }
                Some(_) => {
                    parents.pop();
                    self.tokens[index].parent = parents.last().copied().flatten();
                }
            }
        }
    }

    fn excessive_close(&self, close: usize) -> Error {
        Error::parsing(
            self.token_location(close),
            quote(self.text_at(close)),
            "excessive closing bracket.",
        )
    }

    fn unmatching_pair(&self, open: usize, close: usize) -> Error {
        let diagnostic = cctt_util::Diagnostic::new(
            self.token_location(open),
            quote(self.text_at(open)),
            "unmatching pair.",
        )
        .with_related(self.token_location(close), quote(self.text_at(close)));
        Error::Parsing(diagnostic)
    }

    fn missing_close(&self, open: usize) -> Error {
        let close = close_symbol_of(self.source.as_bytes()[self.tokens[open].first as usize]);
        Error::parsing(
            self.token_location(open),
            quote(self.text_at(open)),
            format!("missing paired {}.", quote(&(close as char).to_string())),
        )
    }
}

fn open_symbol_of(close: u8) -> u8 {
    match close {
        b'>' => b'<',
        b')' => b'(',
        b']' => b'[',
        b'}' => b'{',
        _ => 0,
    }
}

fn close_symbol_of(open: u8) -> u8 {
    match open {
        b'<' => b'>',
        b'(' => b')',
        b'[' => b']',
        b'{' => b'}',
        _ => 0,
    }
}
