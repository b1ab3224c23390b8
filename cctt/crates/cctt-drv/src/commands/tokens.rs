//! The `tokens` command: scan files and pretty-print their token trees.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use cctt_lex::{pretty_print, TokenTree};

use crate::commands::slurp;
use crate::error::{CcttError, Result};
use crate::style::Styles;

/// Arguments for the tokens command.
#[derive(Debug, Clone)]
pub struct TokensArgs {
    /// Input files to scan.
    pub files: Vec<PathBuf>,
}

/// Scan and dump every file; failures are reported and counted.
pub fn run_tokens(args: TokensArgs, styles: Styles) -> Result<()> {
    let mut failures = 0;

    for path in &args.files {
        if let Err(error) = tokens_file(path, styles) {
            failures += 1;
            if !matches!(error, CcttError::Failures(_)) {
                eprintln!("{}{error}{}", styles.error, styles.normal);
            }
        }
    }

    if failures == 0 {
        Ok(())
    } else {
        Err(CcttError::Failures(failures))
    }
}

fn tokens_file(path: &Path, styles: Styles) -> Result<()> {
    let source = slurp(path)?;

    let tree = match TokenTree::new(&source) {
        Ok(tree) => tree,
        Err(error) => {
            eprintln!("{}", styles.render_failure(path, &error));
            return Err(CcttError::Failures(1));
        }
    };
    debug!(path = %path.display(), tokens = tree.tokens().len(), "token tree built");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}: token count = {}", path.display(), tree.tokens().len())?;
    pretty_print(&tree, &mut out).map_err(|error| match error {
        cctt_util::Error::Io(io) => CcttError::Io(io),
        other => {
            eprintln!("{}", styles.render_failure(path, &other));
            CcttError::Failures(1)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_tokens_file_success() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "int x = 10;").expect("write");
        assert!(tokens_file(file.path(), Styles::PLAIN).is_ok());
    }

    #[test]
    fn test_tokens_file_with_unbalanced_brackets() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "int x = f(;").expect("write");
        assert!(tokens_file(file.path(), Styles::PLAIN).is_err());
    }

    #[test]
    fn test_run_tokens_with_missing_file() {
        let args = TokensArgs {
            files: vec![PathBuf::from("missing.cpp")],
        };
        let error = run_tokens(args, Styles::PLAIN).expect_err("missing file fails");
        assert!(matches!(error, CcttError::Failures(1)));
    }
}
