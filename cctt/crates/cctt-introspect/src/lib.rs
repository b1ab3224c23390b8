//! cctt-introspect - Pattern-based introspection over a token tree.
//!
//! The walker looks for declarations marked with the
//! `CCTT_INTROSPECT(...)` attribute and reports the namespaces,
//! enumerations, enumerators, integral constants, structures, base
//! classes, and variable/function declarations under those marks
//! through the [`Handler`] interface. Recognition is by local pattern
//! matching on the token tree, not by parsing C++.

pub mod dump;
pub mod handler;
pub mod walker;

pub use dump::Dumper;
pub use handler::Handler;
pub use walker::{introspect, INTROSPECT_MARKER};
