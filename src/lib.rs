//! # `dexstore`
//!
//! `dexstore` moves the secondary dexes of an extracted Android application
//! between their packaged layout and a flat working directory, so that a
//! bytecode processing stage can work on plain `classes*.dex` files.
//!
//! ```no_run
//! use dexstore::prelude::*;
//!
//! let options = Options::default();
//! let mode = detect_secondary_dex_mode("extracted_apk", &options)?;
//! mode.unpackage("extracted_apk", "dexen")?;
//! // ... process dexen/classes*.dex ...
//! mode.repackage("extracted_apk", "dexen", false)?;
//! # Ok::<(), DsError>(())
//! ```
//!
//! ## Sub-crates
//!
//!  - [`ds_store`] contains the packaging modes, the dex jars helpers and
//!    the metadata manifest writer,
//!  - [`ds_utils`] contains small filesystem helpers and the driver for the
//!    external `xz` tool.

mod errors;

pub mod cli;
pub mod ds_detect;
pub mod ds_repack;
pub mod ds_unpack;

pub use ds_store as store;
pub use ds_utils as utils;

/// Reexport module of commonly used structures and functions:
///
/// ```rust
/// use dexstore::prelude::*;
/// ```
pub mod prelude {
    pub use crate::errors::{DsError, DsResult};

    pub use ds_store::{detect_secondary_dex_mode, DexMetadata, DexMode, Options};

    pub use ds_utils::xz::Xz;

    use clap::ArgMatches;

    pub fn init_logger(args: &ArgMatches) {
        let env = env_logger::Env::new()
            .filter_or("DS_LOG", "info")
            .write_style("DS_LOG_STYLE");

        let mut builder = env_logger::Builder::from_env(env);
        if args.get_flag("verbose") {
            builder.filter_level(log::LevelFilter::Trace);
        } else if args.get_flag("debug") {
            builder.filter_level(log::LevelFilter::Debug);
        }
        if args.get_flag("ecslog") {
            builder.format(ecs_logger::format);
        }
        builder.init();
    }

    /// Builds layout [`Options`] from the command line layout arguments,
    /// keeping defaults for those that are not given.
    #[must_use]
    pub fn layout_options(args: &ArgMatches) -> Options {
        let mut options = Options::default();
        if let Some(dir) = args.get_one::<String>("asset-dir") {
            options = options.dex_asset_dir(dir);
        }
        if let Some(name) = args.get_one::<String>("store-name") {
            options = options.store_name(name);
        }
        if let Some(prefix) = args.get_one::<String>("dex-prefix") {
            options = options.dex_prefix(prefix);
        }
        if let Some(prefix) = args.get_one::<String>("canary-prefix") {
            options = options.canary_prefix(prefix);
        }

        let mut xz = Xz::default();
        if let Some(program) = args.get_one::<String>("xz") {
            xz = xz.program(program);
        }
        if let Some(threads) = args.get_one::<u32>("xz-threads") {
            xz = xz.threads(*threads);
        }
        options.xz(xz)
    }
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::cli;

    #[test]
    fn layout_options_from_arguments() {
        let args = cli::unpack()
            .try_get_matches_from([
                "ds-unpack",
                "-i",
                "apk",
                "-o",
                "dexen",
                "--store-name",
                "dex",
                "--xz-threads",
                "1",
            ])
            .unwrap();
        let options = layout_options(&args);
        let expected = Options::default()
            .store_name("dex")
            .xz(Xz::default().threads(1));
        assert_eq!(format!("{options:?}"), format!("{expected:?}"));
    }

    #[test]
    fn default_layout_options() {
        let args = cli::detect()
            .try_get_matches_from(["ds-detect", "-i", "apk"])
            .unwrap();
        assert_eq!(
            format!("{:?}", layout_options(&args)),
            format!("{:?}", Options::default())
        );
    }
}
