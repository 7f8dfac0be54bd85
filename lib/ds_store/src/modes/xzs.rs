use super::{
    canonicalize_store_dexes, pack_store_dex, repackage_primary, unpackage_primary, with_suffix,
    without_suffix, Options, MAX_SECONDARY_DEXES, METADATA_FILENAME,
};
use crate::errors::{StoreError, StoreResult};
use crate::jar;
use crate::metadata::{sha1_hex, DexMetadata};
use crate::sidecar;
use ds_utils::files;
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};

const XZS_SUFFIX: &str = ".xzs";
const SIDECAR_SUFFIX: &str = ".xzs.tmp~.meta";
const ENTRY_SUFFIX: &str = ".xzs.tmp~";

/// Secondary dexes are wrapped in individual jars, which are concatenated
/// into a single blob and compressed with xz as `<store>.dex.jar.xzs`.
///
/// Jar sizes needed to split the blob back are kept in one
/// `<store>-<n>.dex.jar.xzs.tmp~.meta` sidecar per dex.
#[derive(Debug, Clone)]
pub struct XzsMode {
    options: Options,
}

impl XzsMode {
    #[must_use]
    pub const fn new(options: Options) -> Self {
        Self { options }
    }

    /// `<store>.dex.jar`, the concatenated jars blob.
    fn concat_jar_name(&self) -> String {
        format!("{}.dex.jar", self.options.store_name)
    }

    fn xzs_name(&self) -> String {
        format!("{}{XZS_SUFFIX}", self.concat_jar_name())
    }

    fn store_jar(&self, index: usize) -> String {
        format!("{}.jar", self.options.store_dex(index))
    }

    pub(crate) fn detect(&self, apk_dir: &Path) -> bool {
        self.options
            .asset_dir(apk_dir)
            .join(self.xzs_name())
            .is_file()
    }

    pub(crate) fn unpackage(&self, apk_dir: &Path, dex_dir: &Path) -> StoreResult<()> {
        let secondary_dir = self.options.asset_dir(apk_dir);
        let dest = files::move_into(secondary_dir.join(self.xzs_name()), dex_dir)?;

        let concat_jar = without_suffix(&dest, XZS_SUFFIX);
        self.options.xz.decompress(&dest, &concat_jar)?;

        let mut jar_sizes = Vec::new();
        for index in 1..=MAX_SECONDARY_DEXES {
            let metadata_path = secondary_dir.join(format!(
                "{}{SIDECAR_SUFFIX}",
                self.store_jar(index)
            ));
            if !metadata_path.is_file() {
                break;
            }
            jar_sizes.push(sidecar::read_jar_size(&metadata_path)?);
            fs::remove_file(metadata_path)?;
        }
        log::debug!("splitting {concat_jar:?} into {} jars", jar_sizes.len());

        let mut jars: Vec<PathBuf> = Vec::with_capacity(jar_sizes.len());
        let mut reader = BufReader::new(File::open(&concat_jar)?);
        for (i, size) in jar_sizes.iter().enumerate() {
            let jar_path = dex_dir.join(self.store_jar(i + 1));
            let mut jar = File::create(&jar_path)?;
            io::copy(&mut (&mut reader).take(*size), &mut jar)?;
            jars.push(jar_path);
        }
        drop(reader);

        for (jar_path, size) in jars.iter().zip(&jar_sizes) {
            let actual = files::file_size(jar_path)?;
            if actual != *size {
                return Err(StoreError::Integrity(format!(
                    "{jar_path:?} is {actual} bytes, expected {size}"
                )));
            }
        }
        let expected: u64 = jar_sizes.iter().sum();
        let actual = files::file_size(&concat_jar)?;
        if expected != actual {
            return Err(StoreError::Integrity(format!(
                "{concat_jar:?} is {actual} bytes, sidecars account for {expected}"
            )));
        }

        fs::remove_file(&concat_jar)?;
        fs::remove_file(&dest)?;

        for jar_path in jars {
            jar::extract_single_dex(&jar_path, without_suffix(&jar_path, ".jar"))?;
            fs::remove_file(&jar_path)?;
        }
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

        let concat_jar_path = dex_dir.join(self.concat_jar_name());
        let concat_jar_meta = dex_dir.join(METADATA_FILENAME);
        let mut dex_metadata = DexMetadata::new().have_locators(have_locators);

        let mut concat_jar = File::create(&concat_jar_path)?;
        for index in 1..=MAX_SECONDARY_DEXES {
            let Some(packed) = pack_store_dex(&self.options, dex_dir, index)? else {
                break;
            };
            fs::write(
                with_suffix(&packed.jar, SIDECAR_SUFFIX),
                packed.sizes.to_string(),
            )?;

            let contents = fs::read(&packed.jar)?;
            concat_jar.write_all(&contents)?;
            let sha1hash = sha1_hex(&contents);

            dex_metadata.add_dex(
                with_suffix(&packed.jar, ENTRY_SUFFIX),
                self.options.canary_class(index),
                Some(sha1hash),
            )?;
            log::debug!("appended {:?} to {concat_jar_path:?}", packed.dex);
        }
        concat_jar.flush()?;
        drop(concat_jar);

        dex_metadata.write(&concat_jar_meta)?;

        let pattern = format!("{}-*.dex.jar", self.options.store_name);
        let mut jars_size = 0;
        for jar_path in files::abs_glob(dex_dir, &pattern)? {
            jars_size += files::file_size(jar_path)?;
        }
        let concat_size = files::file_size(&concat_jar_path)?;
        if concat_size != jars_size {
            return Err(StoreError::Integrity(format!(
                "{concat_jar_path:?} is {concat_size} bytes, jars account for {jars_size}"
            )));
        }

        let compressed = self.options.xz.compress_in_place(&concat_jar_path)?;

        let secondary_dir = self.options.asset_dir(apk_dir);
        let sidecars = format!("{}*.meta", self.options.store_name);
        for path in files::abs_glob(dex_dir, &sidecars)? {
            files::copy_into(path, &secondary_dir)?;
        }
        fs::copy(&concat_jar_meta, secondary_dir.join(METADATA_FILENAME))?;
        fs::copy(&compressed, secondary_dir.join(self.xzs_name()))?;
        Ok(())
    }
}
