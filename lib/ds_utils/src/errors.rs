//! Utilities errors definitions.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// An alias for result that can be a [`UtilsError`].
pub type UtilsResult<T> = Result<T, UtilsError>;

/// The utilities error type.
#[derive(Debug, Error)]
pub enum UtilsError {
    /// Error that can be returned when doing [std::io](I/O) operations.
    #[error("IO error: {0}")]
    IO(#[from] io::Error),

    /// Error that can be returned while walking a directory tree.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Error that can be returned when compiling a glob pattern.
    #[error("glob error: {0}")]
    Glob(#[from] globset::Error),

    /// Error that can be returned when an external tool is not in `PATH`.
    #[error("external tool '{0}' not found")]
    ToolNotFound(String),

    /// Error that can be returned when an external tool exits unsuccessfully.
    #[error("external tool '{tool}' failed ({status})")]
    ToolFailed { tool: String, status: ExitStatus },
}
