//! Error handling for the cctt driver.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the driver itself (not by the core pipeline).
#[derive(Error, Debug)]
pub enum CcttError {
    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A source file could not be read.
    #[error("cannot load file {}: {source}", path.display())]
    Load {
        path: PathBuf,
        source: std::io::Error,
    },

    /// One or more input files failed to process; details were already
    /// reported on the diagnostic stream.
    #[error("failed to process {0} file(s)")]
    Failures(usize),

    /// IO failure outside of file loading.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the driver.
pub type Result<T> = std::result::Result<T, CcttError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = CcttError::Config("bad color choice".to_string());
        assert_eq!(err.to_string(), "configuration error: bad color choice");
    }

    #[test]
    fn test_load_error_display() {
        let err = CcttError::Load {
            path: PathBuf::from("missing.cpp"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("missing.cpp"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_failures_display() {
        let err = CcttError::Failures(3);
        assert_eq!(err.to_string(), "failed to process 3 file(s)");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: CcttError = io_err.into();
        assert!(matches!(err, CcttError::Io(_)));
    }
}
