//! cctt-lex - Lexical scanner and token tree for sloppy C++.
//!
//! This crate turns a C++ translation-unit-like source text into a
//! [`TokenTree`]: a flat token array augmented with bracket-pair links
//! and a parent tree. It deliberately does not implement the full C++
//! grammar; it recognizes the lexical shape of C++ (including the full
//! zoo of corner cases: raw strings with user-chosen delimiters,
//! line-escaped directives and comments, ambiguous `<`/`>`, `>>` in
//! nested template argument lists, `$` in identifiers, digit
//! separators) and tolerates syntactically-wrong code as long as
//! brackets balance.
//!
//! Construction runs three single passes:
//!
//! 1. the scanner produces the token vector and the line index,
//! 2. the pair builder attaches matching-bracket links,
//! 3. the parent builder attaches nearest-enclosing-bracket links.
//!
//! After construction the tree is immutable.

pub mod cursor;
pub mod pretty;
pub mod scanner;
pub mod token;
pub mod tree;

pub use pretty::pretty_print;
pub use token::{Tag, TagSet, Token, TokenId};
pub use tree::TokenTree;
