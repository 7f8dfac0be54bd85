use super::{
    canonicalize_store_dexes, pack_store_dex, repackage_primary, unpackage_primary, with_suffix,
    without_suffix, Options, MAX_SECONDARY_DEXES, METADATA_FILENAME,
};
use crate::errors::StoreResult;
use crate::jar;
use crate::metadata::DexMetadata;
use ds_utils::files;
use std::fs;
use std::path::Path;

/// Each secondary dex is wrapped, uncompressed, in its own
/// `<store>-<n>.dex.jar` inside the asset directory, next to a
/// `<store>-<n>.dex.jar.meta` sizes sidecar.
#[derive(Debug, Clone)]
pub struct SubdirMode {
    options: Options,
}

impl SubdirMode {
    #[must_use]
    pub const fn new(options: Options) -> Self {
        Self { options }
    }

    pub(crate) fn detect(&self, apk_dir: &Path) -> bool {
        let secondary_dir = self.options.asset_dir(apk_dir);
        secondary_dir.is_dir()
            && files::abs_glob(&secondary_dir, "*.dex.jar")
                .map(|jars| !jars.is_empty())
                .unwrap_or(false)
    }

    pub(crate) fn unpackage(&self, apk_dir: &Path, dex_dir: &Path) -> StoreResult<()> {
        let secondary_dir = self.options.asset_dir(apk_dir);
        for jar_path in files::abs_glob(&secondary_dir, "*.dex.jar")? {
            let name = jar_path.file_name().unwrap_or_default();
            let dex_path = without_suffix(&dex_dir.join(name), ".jar");
            jar::extract_single_dex(&jar_path, &dex_path)?;
            fs::remove_file(with_suffix(&jar_path, ".meta"))?;
            fs::remove_file(&jar_path)?;
        }
        fs::remove_file(secondary_dir.join(METADATA_FILENAME))?;
        canonicalize_store_dexes(&self.options, dex_dir)?;
        unpackage_primary(&self.options, apk_dir, dex_dir)
    }

    pub(crate) fn repackage(
        &self,
        apk_dir: &Path,
        dex_dir: &Path,
        have_locators: bool,
    ) -> StoreResult<()> {
        repackage_primary(&self.options, apk_dir, dex_dir)?;

        let secondary_dir = self.options.asset_dir(apk_dir);
        let mut metadata = DexMetadata::new().have_locators(have_locators);
        for index in 1..=MAX_SECONDARY_DEXES {
            let Some(packed) = pack_store_dex(&self.options, dex_dir, index)? else {
                break;
            };
            metadata.add_dex(&packed.jar, self.options.canary_class(index), None)?;

            let dex_meta_path = with_suffix(&packed.jar, ".meta");
            fs::write(&dex_meta_path, format!("{}\n", packed.sizes))?;

            files::move_into(&dex_meta_path, &secondary_dir)?;
            files::move_into(&packed.jar, &secondary_dir)?;
            log::debug!("stored {:?} in {secondary_dir:?}", packed.dex);
        }

        let jar_meta_path = dex_dir.join(METADATA_FILENAME);
        metadata.write(&jar_meta_path)?;
        files::move_into(jar_meta_path, secondary_dir)?;
        Ok(())
    }
}
