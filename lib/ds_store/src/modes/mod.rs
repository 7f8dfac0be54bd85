//! Secondary dex packaging modes.
//!
//! An extracted application stores its secondary dexes in one of several
//! layouts. Each [`DexMode`] knows how to recognize its layout, how to move
//! the dexes out of it into a flat working directory (`classes.dex`,
//! `classes2.dex`, ...) and how to put processed dexes back.

mod api21;
mod subdir;
mod xzs;

pub use api21::Api21Mode;
pub use subdir::SubdirMode;
pub use xzs::XzsMode;

use crate::errors::{StoreError, StoreResult};
use crate::jar;
use crate::sidecar::JarSizes;
use ds_utils::files;
use ds_utils::xz::Xz;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// Highest secondary dex store index handled by any mode.
pub const MAX_SECONDARY_DEXES: usize = 99;

/// Name of the manifest file in the secondary dex asset directory.
pub const METADATA_FILENAME: &str = "metadata.txt";

/// Layout parameters shared by all modes.
#[derive(Debug, Clone)]
pub struct Options {
    pub(crate) dex_asset_dir: PathBuf,
    pub(crate) store_name: String,
    pub(crate) dex_prefix: String,
    pub(crate) canary_prefix: String,
    pub(crate) xz: Xz,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            dex_asset_dir: PathBuf::from("assets/secondary-program-dex-jars"),
            store_name: "secondary".to_string(),
            dex_prefix: "classes".to_string(),
            canary_prefix: "secondary".to_string(),
            xz: Xz::default(),
        }
    }
}

impl Options {
    /// Directory holding secondary dexes, relative to the application root.
    #[must_use]
    pub fn dex_asset_dir<P: Into<PathBuf>>(self, dex_asset_dir: P) -> Self {
        Self {
            dex_asset_dir: dex_asset_dir.into(),
            ..self
        }
    }

    #[must_use]
    pub fn store_name<S: Into<String>>(self, store_name: S) -> Self {
        Self {
            store_name: store_name.into(),
            ..self
        }
    }

    #[must_use]
    pub fn dex_prefix<S: Into<String>>(self, dex_prefix: S) -> Self {
        Self {
            dex_prefix: dex_prefix.into(),
            ..self
        }
    }

    #[must_use]
    pub fn canary_prefix<S: Into<String>>(self, canary_prefix: S) -> Self {
        Self {
            canary_prefix: canary_prefix.into(),
            ..self
        }
    }

    #[must_use]
    pub fn xz(self, xz: Xz) -> Self {
        Self { xz, ..self }
    }

    fn primary_dex(&self) -> String {
        format!("{}.dex", self.dex_prefix)
    }

    /// Working directory name of the dex at store index `index`.
    fn secondary_dex(&self, index: usize) -> String {
        format!("{}{}.dex", self.dex_prefix, index + 1)
    }

    fn store_dex(&self, index: usize) -> String {
        format!("{}-{index}.dex", self.store_name)
    }

    fn canary_class(&self, index: usize) -> String {
        format!("{}.dex{index:02}.Canary", self.canary_prefix)
    }

    fn asset_dir(&self, extracted_apk_dir: &Path) -> PathBuf {
        extracted_apk_dir.join(&self.dex_asset_dir)
    }
}

/// A secondary dex packaging mode.
#[derive(Debug, Clone)]
pub enum DexMode {
    Xzs(XzsMode),
    Subdir(SubdirMode),
    Api21(Api21Mode),
}

impl DexMode {
    /// All modes in detection order: most specific layouts first, the
    /// API 21 fallback last.
    #[must_use]
    pub fn all(options: &Options) -> [Self; 3] {
        [
            Self::Xzs(XzsMode::new(options.clone())),
            Self::Subdir(SubdirMode::new(options.clone())),
            Self::Api21(Api21Mode::new(options.clone())),
        ]
    }

    /// Looks a mode up by its [name](Self::name).
    pub fn from_name(name: &str, options: &Options) -> StoreResult<Self> {
        Self::all(options)
            .into_iter()
            .find(|mode| mode.name() == name)
            .ok_or_else(|| StoreError::UnknownModeName(name.to_string()))
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Xzs(_) => "xzs",
            Self::Subdir(_) => "subdir",
            Self::Api21(_) => "api21",
        }
    }

    /// Returns whether the extracted application uses this mode's layout.
    #[must_use]
    pub fn detect<P: AsRef<Path>>(&self, extracted_apk_dir: P) -> bool {
        let dir = extracted_apk_dir.as_ref();
        match self {
            Self::Xzs(mode) => mode.detect(dir),
            Self::Subdir(mode) => mode.detect(dir),
            Self::Api21(mode) => mode.detect(dir),
        }
    }

    /// Moves primary and secondary dexes out of the extracted application
    /// into `dex_dir`.
    pub fn unpackage<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        extracted_apk_dir: P,
        dex_dir: Q,
    ) -> StoreResult<()> {
        let (apk_dir, dex_dir) = (extracted_apk_dir.as_ref(), dex_dir.as_ref());
        log::info!("unpacking {apk_dir:?} into {dex_dir:?} ({self} mode)");
        match self {
            Self::Xzs(mode) => mode.unpackage(apk_dir, dex_dir),
            Self::Subdir(mode) => mode.unpackage(apk_dir, dex_dir),
            Self::Api21(mode) => mode.unpackage(apk_dir, dex_dir),
        }
    }

    /// Moves dexes from `dex_dir` back into the extracted application,
    /// regenerating containers and metadata for this mode's layout.
    pub fn repackage<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        extracted_apk_dir: P,
        dex_dir: Q,
        have_locators: bool,
    ) -> StoreResult<()> {
        let (apk_dir, dex_dir) = (extracted_apk_dir.as_ref(), dex_dir.as_ref());
        log::info!("repackaging {dex_dir:?} into {apk_dir:?} ({self} mode)");
        match self {
            Self::Xzs(mode) => mode.repackage(apk_dir, dex_dir, have_locators),
            Self::Subdir(mode) => mode.repackage(apk_dir, dex_dir, have_locators),
            Self::Api21(mode) => mode.repackage(apk_dir, dex_dir, have_locators),
        }
    }
}

impl fmt::Display for DexMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns the first mode, in [detection order](DexMode::all), whose layout
/// matches the extracted application.
pub fn detect_secondary_dex_mode<P: AsRef<Path>>(
    extracted_apk_dir: P,
    options: &Options,
) -> StoreResult<DexMode> {
    let dir = extracted_apk_dir.as_ref();
    for mode in DexMode::all(options) {
        if mode.detect(dir) {
            log::debug!("{dir:?} uses {mode} secondary dex mode");
            return Ok(mode);
        }
    }
    Err(StoreError::UnknownMode(dir.to_path_buf()))
}

fn unpackage_primary(options: &Options, apk_dir: &Path, dex_dir: &Path) -> StoreResult<()> {
    let primary = apk_dir.join(options.primary_dex());
    if primary.exists() {
        files::move_into(primary, dex_dir)?;
    }
    Ok(())
}

fn repackage_primary(options: &Options, apk_dir: &Path, dex_dir: &Path) -> StoreResult<()> {
    let primary = dex_dir.join(options.primary_dex());
    if primary.exists() {
        files::move_into(primary, apk_dir)?;
    }
    Ok(())
}

/// A secondary dex renamed after its store and wrapped in a jar.
struct PackedDex {
    dex: PathBuf,
    jar: PathBuf,
    sizes: JarSizes,
}

/// Renames the working dex of store `index` to `<store>-<index>.dex` and
/// wraps it in `<store>-<index>.dex.jar`. Returns `None` when there is no
/// dex for that index.
fn pack_store_dex(
    options: &Options,
    dex_dir: &Path,
    index: usize,
) -> StoreResult<Option<PackedDex>> {
    let oldpath = dex_dir.join(options.secondary_dex(index));
    if !oldpath.is_file() {
        return Ok(None);
    }
    let dex = dex_dir.join(options.store_dex(index));
    files::move_file(&oldpath, &dex)?;

    let jar = with_suffix(&dex, ".jar");
    jar::pack_single_dex(&jar, &dex)?;
    let sizes = JarSizes {
        jar: files::file_size(&jar)?,
        dex: files::file_size(&dex)?,
    };
    log::debug!("packed {oldpath:?} into {jar:?} ({sizes})");
    Ok(Some(PackedDex { dex, jar, sizes }))
}

/// Renames the `<store>-<index>.dex` files left by jar extraction to their
/// canonical `classes<index + 1>.dex` names.
fn canonicalize_store_dexes(options: &Options, dex_dir: &Path) -> StoreResult<()> {
    for index in 1..=MAX_SECONDARY_DEXES {
        let store_dex = dex_dir.join(options.store_dex(index));
        if !store_dex.is_file() {
            break;
        }
        files::move_file(store_dex, dex_dir.join(options.secondary_dex(index)))?;
    }
    Ok(())
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Strips `suffix` from the file name of `path`, if present.
/// The parent directories are kept as is, whatever their encoding.
fn without_suffix(path: &Path, suffix: &str) -> PathBuf {
    match path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(suffix))
    {
        Some(stripped) if !stripped.is_empty() => path.with_file_name(stripped),
        _ => path.to_path_buf(),
    }
}
