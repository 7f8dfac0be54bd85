//! Dex store errors definitions.

use ds_utils::errors::UtilsError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

/// An alias for result that can be a [`StoreError`].
pub type StoreResult<T> = Result<T, StoreError>;

/// The dex store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Error that can be returned when doing [std::io](I/O) operations.
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// Error that can be returned when opening or saving a zip file.
    #[error("zip error: {0}")]
    Zip(#[from] ZipError),

    /// Error that can be returned from [`ds_utils`] helpers, including
    /// failures of the external compressor.
    #[error(transparent)]
    Utils(#[from] UtilsError),

    /// No secondary dex mode recognizes the extracted application.
    #[error("unknown secondary dex mode for {0:?}")]
    UnknownMode(PathBuf),

    /// A secondary dex mode was requested by a name that does not exist.
    #[error("unknown secondary dex mode name '{0}'")]
    UnknownModeName(String),

    /// A container does not have the expected structure.
    #[error("unexpected container format: {0}")]
    Format(String),

    /// Recorded and observed sizes disagree.
    #[error("integrity check failed: {0}")]
    Integrity(String),

    /// A sidecar metadata file does not start with `jar:<size>`.
    #[error("malformed sidecar metadata {path:?}: {content:?}")]
    BadSidecar { path: PathBuf, content: String },
}
