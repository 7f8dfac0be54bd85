//! Global error handling.
//!
//! Each sub-crate of the project defines its own type error.
//! Their types are unified here when winding results at the top-level.
//!
//! ```rust
//! use dexstore::prelude::*;
//!
//! fn main() -> DsResult<()> { // can return a DsError
//!    let _mode = DexMode::from_name("xzs", &Options::default())?; // can return a StoreError
//!    Ok(())
//! }
//! ```

use ds_store::errors::StoreError;
use ds_utils::errors::UtilsError;
use std::io;
use thiserror::Error;

/// An alias for result that can be a [`DsError`].
pub type DsResult<T> = Result<T, DsError>;

/// The main error type for error winding at the top-level.
#[derive(Debug, Error)]
pub enum DsError {
    /// Custom error for reporting bad command line arguments usage.
    #[error("bad arguments: {0}")]
    BadArguments(String),

    /// Error that can be returned from [I/O operations](std::io).
    #[error(transparent)]
    IO(#[from] io::Error),

    /// Error that can be returned from [`ds_store`] functions.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Error that can be returned from [`ds_utils`] functions.
    #[error(transparent)]
    Utils(#[from] UtilsError),
}
