use super::{
    repackage_primary, unpackage_primary, Options, MAX_SECONDARY_DEXES, METADATA_FILENAME,
};
use crate::errors::StoreResult;
use crate::metadata::DexMetadata;
use ds_utils::files;
use std::fs;
use std::path::Path;

/// On API 21+, secondary dexes sit uncompressed at the root of the
/// application as `classes2.dex`, `classes3.dex`, ...
///
/// This is the fallback mode, also used for applications without any
/// secondary dex: it must be checked last.
#[derive(Debug, Clone)]
pub struct Api21Mode {
    options: Options,
}

impl Api21Mode {
    #[must_use]
    pub const fn new(options: Options) -> Self {
        Self { options }
    }

    pub(crate) fn detect(&self, apk_dir: &Path) -> bool {
        apk_dir.join(self.options.primary_dex()).is_file()
    }

    pub(crate) fn unpackage(&self, apk_dir: &Path, dex_dir: &Path) -> StoreResult<()> {
        unpackage_primary(&self.options, apk_dir, dex_dir)?;

        let jar_meta_path = self.options.asset_dir(apk_dir).join(METADATA_FILENAME);
        if jar_meta_path.exists() {
            fs::remove_file(jar_meta_path)?;
        }
        for path in files::abs_glob(apk_dir, "*.dex")? {
            files::move_into(path, dex_dir)?;
        }
        Ok(())
    }

    pub(crate) fn repackage(
        &self,
        apk_dir: &Path,
        dex_dir: &Path,
        have_locators: bool,
    ) -> StoreResult<()> {
        repackage_primary(&self.options, apk_dir, dex_dir)?;

        let mut metadata = DexMetadata::new()
            .root_relative(true)
            .have_locators(have_locators);
        // classes2.dex up to classes<MAX_SECONDARY_DEXES>.dex
        for index in 1..MAX_SECONDARY_DEXES {
            let dex_path = dex_dir.join(self.options.secondary_dex(index));
            if !dex_path.is_file() {
                break;
            }
            metadata.add_dex(&dex_path, self.options.canary_class(index), None)?;
            files::move_into(dex_path, apk_dir)?;
        }

        let asset_dir = self.options.asset_dir(apk_dir);
        if asset_dir.is_dir() {
            metadata.write(asset_dir.join(METADATA_FILENAME))?;
        } else {
            log::debug!("no {asset_dir:?} directory, skipping dex metadata");
        }
        Ok(())
    }
}
