//! Subcommand implementations.

pub mod introspect;
pub mod tokens;

use std::path::Path;

use crate::error::{CcttError, Result};

/// Read a whole source file.
pub fn slurp(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CcttError::Load {
        path: path.to_path_buf(),
        source,
    })
}
