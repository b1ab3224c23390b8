//! Tokens, token tags, and token identifiers.

use std::fmt;
use std::ops::Range;

use cctt_util::define_idx;
use static_assertions::const_assert;

define_idx!(
    /// Index of a token inside a [`crate::TokenTree`].
    ///
    /// Pair and parent links are stored as `TokenId`s: the token vector
    /// owns, the links borrow.
    TokenId
);

/// Lexical category of a token.
///
/// A token carries a *set* of tags, not a single one: a raw string
/// literal is `{Literal, String, Block}`, an ordinary one is
/// `{Literal, String, Line}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum Tag {
    /// The zero-width sentinel at source end.
    End,
    Identifier,
    Symbol,
    Literal,
    Number,
    String,
    Character,
    /// A literal spanning a self-delimited block (raw string).
    Block,
    /// A literal confined to one logical line (ordinary string).
    Line,
}

const TAG_COUNT: u32 = 9;
const_assert!(TAG_COUNT <= u32::BITS);

/// A fixed-size set of [`Tag`]s, packed into one `u32`.
///
/// # Examples
///
/// ```
/// use cctt_lex::{Tag, TagSet};
///
/// let raw_string = TagSet::of(Tag::Literal)
///     .with(Tag::String)
///     .with(Tag::Block);
/// assert!(raw_string.has_all_of(TagSet::of(Tag::String).with(Tag::Literal)));
/// assert!(raw_string.has_none_of(TagSet::of(Tag::Identifier)));
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct TagSet(u32);

impl TagSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// The set containing exactly `tag`.
    pub const fn of(tag: Tag) -> Self {
        Self(1 << tag as u32)
    }

    /// This set plus `tag`.
    pub const fn with(self, tag: Tag) -> Self {
        Self(self.0 | 1 << tag as u32)
    }

    /// True if every tag in `other` is present in `self`.
    pub const fn has_all_of(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if no tag of `other` is present in `self`.
    pub const fn has_none_of(self, other: Self) -> bool {
        self.0 & other.0 == 0
    }

    /// True if at least one tag of `other` is present in `self`.
    pub const fn has_some_of(self, other: Self) -> bool {
        !self.has_none_of(other)
    }

    /// True if `tag` is present.
    pub const fn contains(self, tag: Tag) -> bool {
        self.has_all_of(Self::of(tag))
    }

    /// The raw bit representation.
    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl From<Tag> for TagSet {
    fn from(tag: Tag) -> Self {
        Self::of(tag)
    }
}

impl fmt::Debug for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Tag, &str); TAG_COUNT as usize] = [
            (Tag::End, "End"),
            (Tag::Identifier, "Identifier"),
            (Tag::Symbol, "Symbol"),
            (Tag::Literal, "Literal"),
            (Tag::Number, "Number"),
            (Tag::String, "String"),
            (Tag::Character, "Character"),
            (Tag::Block, "Block"),
            (Tag::Line, "Line"),
        ];
        let mut set = f.debug_set();
        for (tag, name) in NAMES {
            if self.contains(tag) {
                set.entry(&name);
            }
        }
        set.finish()
    }
}

/// One lexical unit.
///
/// The byte range `[first, last)` points into the source buffer the
/// owning [`crate::TokenTree`] borrows; the buffer must outlive the
/// tree. `pair` links matching brackets both ways, `parent` links every
/// token to its nearest enclosing open bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    /// Start of the token in the source buffer (byte offset).
    pub first: u32,
    /// One past the end of the token (byte offset).
    pub last: u32,
    /// Tag set.
    pub tags: TagSet,
    /// The matching bracket, if this token is half of a paired bracket.
    /// For an open bracket `pair > self`, for a close bracket
    /// `pair < self`.
    pub pair: Option<TokenId>,
    /// The nearest enclosing open bracket, or `None` at top level.
    pub parent: Option<TokenId>,
}

// A token must stay within a typical cache line.
const_assert!(std::mem::size_of::<Token>() <= 64);

impl Token {
    /// Byte length of the token.
    pub fn len(&self) -> usize {
        (self.last - self.first) as usize
    }

    /// True for zero-width tokens (only the sentinel).
    pub fn is_empty(&self) -> bool {
        self.first == self.last
    }

    /// Byte range of the token in the source buffer.
    pub fn range(&self) -> Range<usize> {
        self.first as usize..self.last as usize
    }

    /// True for the sentinel token at source end.
    pub fn is_end(&self) -> bool {
        self.tags.contains(Tag::End)
    }

    /// True if the token is not half of a bracket pair.
    pub fn is_leaf(&self) -> bool {
        self.pair.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_set_of_and_contains() {
        let set = TagSet::of(Tag::Literal).with(Tag::Number);
        assert!(set.contains(Tag::Literal));
        assert!(set.contains(Tag::Number));
        assert!(!set.contains(Tag::Symbol));
    }

    #[test]
    fn test_tag_set_algebra() {
        let raw = TagSet::of(Tag::Literal).with(Tag::String).with(Tag::Block);
        assert!(raw.has_all_of(TagSet::of(Tag::String)));
        assert!(raw.has_all_of(TagSet::of(Tag::String).with(Tag::Block)));
        assert!(!raw.has_all_of(TagSet::of(Tag::String).with(Tag::Line)));
        assert!(raw.has_none_of(TagSet::of(Tag::Identifier).with(Tag::Symbol)));
        assert!(raw.has_some_of(TagSet::of(Tag::Line).with(Tag::Block)));
    }

    #[test]
    fn test_tag_set_empty() {
        assert!(TagSet::EMPTY.has_none_of(TagSet::of(Tag::End)));
        assert!(TagSet::EMPTY.has_all_of(TagSet::EMPTY));
        assert_eq!(TagSet::default(), TagSet::EMPTY);
    }

    #[test]
    fn test_tag_set_debug_lists_tags() {
        let set = TagSet::of(Tag::Literal).with(Tag::Number);
        let rendered = format!("{set:?}");
        assert!(rendered.contains("Literal"));
        assert!(rendered.contains("Number"));
        assert!(!rendered.contains("Symbol"));
    }

    #[test]
    fn test_token_fits_in_a_cache_line() {
        assert!(std::mem::size_of::<Token>() <= 64);
    }

    #[test]
    fn test_token_len_and_range() {
        let token = Token {
            first: 3,
            last: 7,
            tags: TagSet::of(Tag::Identifier),
            pair: None,
            parent: None,
        };
        assert_eq!(token.len(), 4);
        assert_eq!(token.range(), 3..7);
        assert!(!token.is_empty());
        assert!(token.is_leaf());
        assert!(!token.is_end());
    }
}
