//! `dexstore` sub-crate to unpack and repackage the secondary dexes of an
//! extracted Android application.
//!
//! Depending on how it was built, an application stores its secondary dexes
//! in one of several [layouts](modes::DexMode). The typical flow is:
//!
//! ```no_run
//! use ds_store::modes::{detect_secondary_dex_mode, Options};
//!
//! let options = Options::default();
//! let mode = detect_secondary_dex_mode("extracted_apk", &options)?;
//! mode.unpackage("extracted_apk", "dexen")?;
//! // ... process dexen/classes*.dex ...
//! mode.repackage("extracted_apk", "dexen", false)?;
//! # Ok::<(), ds_store::errors::StoreError>(())
//! ```

pub mod errors;
pub mod jar;
pub mod metadata;
pub mod modes;
pub mod sidecar;

pub use metadata::DexMetadata;
pub use modes::{detect_secondary_dex_mode, DexMode, Options};
