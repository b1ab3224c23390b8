//! cctt-util - Foundation types shared across the cctt pipeline.
//!
//! This crate provides the building blocks the scanner, the token tree,
//! and the introspection walker are made of:
//!
//! - typed indices ([`Idx`], [`define_idx!`]) for links into contiguous
//!   buffers,
//! - the line/column service ([`LineIndex`], [`Location`]),
//! - one-line snippet escaping for diagnostics ([`quote`],
//!   [`format_to_oneline`]),
//! - the shared error type ([`Error`], [`Diagnostic`], [`Result`]).

pub mod error;
pub mod index;
pub mod location;
pub mod strings;

pub use error::{Diagnostic, Error, Result};
pub use index::Idx;
pub use location::{LineIndex, Location};
pub use strings::{format_to_oneline, quote};
