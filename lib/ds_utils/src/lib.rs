//! Small helpers shared by the `dexstore` sub-crates: hexadecimal rendering,
//! filesystem moves and globbing, and the driver for the external `xz` tool.

pub mod errors;
pub mod files;
pub mod hexlify;
pub mod xz;

pub use errors::{UtilsError, UtilsResult};
