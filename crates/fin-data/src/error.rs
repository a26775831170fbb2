//! Error types for record-store I/O and shuffle configuration.

use std::path::PathBuf;

/// Errors from reading or writing record-store files.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The path does not exist.
    #[error("no such file: {path}")]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The path exists but is not a regular file.
    #[error("not a file: {path}")]
    NotAFile {
        /// The offending path.
        path: PathBuf,
    },

    /// The file ends before the bytes its header promises.
    #[error("truncated file: wanted {wanted} bytes, only {got} available")]
    Truncated {
        /// Bytes the read needed.
        wanted: u64,
        /// Bytes actually available.
        got: u64,
    },

    /// The destination of a no-clobber operation already exists.
    #[error("output file already exists: {path}")]
    AlreadyExists {
        /// The existing path.
        path: PathBuf,
    },

    /// A stored record failed to decode.
    #[error("corrupt record: {source}")]
    Record {
        /// The underlying codec error.
        #[from]
        source: fin_core::EncodingError,
    },

    /// An underlying I/O error (includes disk-full on write).
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

/// Errors from invalid shuffle configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The bucket count (or per-bucket record budget) is zero.
    #[error("invalid bucket count: {given}, must be at least 1")]
    InvalidBucketCount {
        /// The rejected value.
        given: u64,
    },

    /// The temporary bucket directory cannot be created.
    #[error("cannot create temp directory: {path}")]
    InvalidTempDir {
        /// The unusable directory path.
        path: PathBuf,
    },

    /// A multi-output path pattern is missing the part placeholder.
    #[error("output pattern \"{pattern}\" does not contain '$'")]
    InvalidOutputPattern {
        /// The rejected pattern.
        pattern: String,
    },
}

/// Errors from the external shuffle engine.
#[derive(Debug, thiserror::Error)]
pub enum ShuffleError {
    /// The shuffle options are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A fatal store error (temp directory, bucket or output I/O).
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ConfigError, StoreError};

    #[test]
    fn store_error_display() {
        let err = StoreError::Truncated { wanted: 100, got: 3 };
        assert_eq!(
            format!("{err}"),
            "truncated file: wanted 100 bytes, only 3 available"
        );

        let err = StoreError::NotAFile {
            path: PathBuf::from("/tmp"),
        };
        assert_eq!(format!("{err}"), "not a file: /tmp");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidBucketCount { given: 0 };
        assert_eq!(format!("{err}"), "invalid bucket count: 0, must be at least 1");

        let err = ConfigError::InvalidTempDir {
            path: PathBuf::from("/dev/null/tmp"),
        };
        assert_eq!(format!("{err}"), "cannot create temp directory: /dev/null/tmp");

        let err = ConfigError::InvalidOutputPattern {
            pattern: "out.fin".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "output pattern \"out.fin\" does not contain '$'"
        );
    }
}
