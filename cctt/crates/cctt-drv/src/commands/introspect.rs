//! The `introspect` command: walk marked declarations and dump them.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use cctt_introspect::{introspect, Dumper};
use cctt_lex::TokenTree;

use crate::commands::slurp;
use crate::error::{CcttError, Result};
use crate::style::Styles;

/// Arguments for the introspect command.
#[derive(Debug, Clone)]
pub struct IntrospectArgs {
    /// Input files to process.
    pub files: Vec<PathBuf>,
}

/// Why one input file failed.
enum FileFailure {
    /// The file could not be read at all.
    Load(CcttError),
    /// The core pipeline rejected the contents.
    Core(cctt_util::Error),
}

/// Process every file; failed files are reported on the diagnostic
/// stream and counted, and processing continues with the next file.
pub fn run_introspect(args: IntrospectArgs, styles: Styles) -> Result<()> {
    let mut failures = 0;

    for path in &args.files {
        if let Err(failure) = introspect_file(path) {
            report_failure(path, &failure, styles);
            failures += 1;
        }
    }

    if failures == 0 {
        Ok(())
    } else {
        Err(CcttError::Failures(failures))
    }
}

fn report_failure(path: &Path, failure: &FileFailure, styles: Styles) {
    match failure {
        FileFailure::Load(error) => {
            eprintln!("{}{error}{}", styles.error, styles.normal);
        }
        FileFailure::Core(error) => {
            eprintln!("{}", styles.render_failure(path, error));
        }
    }
}

fn introspect_file(path: &Path) -> std::result::Result<(), FileFailure> {
    let source = slurp(path).map_err(FileFailure::Load)?;

    let tree = TokenTree::new(&source).map_err(FileFailure::Core)?;
    debug!(
        path = %path.display(),
        tokens = tree.tokens().len(),
        "token tree built"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}:", path.display()).map_err(|e| FileFailure::Core(e.into()))?;

    let mut dumper = Dumper::new(&tree, &mut out);
    introspect(&tree, &mut dumper).map_err(FileFailure::Core)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_introspect_file_success() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "namespace a {{ CCTT_INTROSPECT() int x; }}").expect("write");
        assert!(introspect_file(file.path()).is_ok());
    }

    #[test]
    fn test_introspect_file_with_scan_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "\"never closed").expect("write");
        assert!(matches!(
            introspect_file(file.path()),
            Err(FileFailure::Core(_))
        ));
    }

    #[test]
    fn test_missing_file_is_a_load_failure() {
        assert!(matches!(
            introspect_file(Path::new("no/such/file.cpp")),
            Err(FileFailure::Load(_))
        ));
    }

    #[test]
    fn test_run_counts_failures_but_continues() {
        let mut good = tempfile::NamedTempFile::new().expect("temp file");
        write!(good, "int x;").expect("write");

        let args = IntrospectArgs {
            files: vec![PathBuf::from("missing.cpp"), good.path().to_path_buf()],
        };
        let error = run_introspect(args, Styles::PLAIN).expect_err("one file fails");
        assert!(matches!(error, CcttError::Failures(1)));
    }

    #[test]
    fn test_run_with_all_good_files() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "namespace a {{ CCTT_INTROSPECT() enum E {{ X }}; }}").expect("write");
        let args = IntrospectArgs {
            files: vec![file.path().to_path_buf()],
        };
        assert!(run_introspect(args, Styles::PLAIN).is_ok());
    }
}
