//! The `metadata.txt` manifest read by the secondary dex loader at runtime.
//!
//! The manifest is a small line-oriented text file: optional header
//! directives (`.id`, `.requires`, `.root_relative`, `.locators`) followed
//! by one `<filename> <sha1> <canary class>` line per secondary dex. The
//! loader resolves dexes by position, so records must be added in ascending
//! store index order.

use crate::errors::{StoreError, StoreResult};
use ds_utils::hexlify::hexlify;
use sha1::{Digest, Sha1};
use std::fmt;
use std::fs;
use std::path::Path;

/// Computes the lowercase hexadecimal SHA-1 of a buffer.
#[must_use]
pub fn sha1_hex(buf: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(buf);
    hexlify(&hasher.finalize())
}

/// A single manifest record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DexEntry {
    pub filename: String,
    pub sha1: String,
    pub canary_class: String,
}

/// Manifest builder.
#[derive(Debug, Default)]
pub struct DexMetadata {
    store: Option<String>,
    dependencies: Vec<String>,
    have_locators: bool,
    root_relative: bool,
    dexen: Vec<DexEntry>,
}

impl DexMetadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the store identifier (`.id` line).
    #[must_use]
    pub fn store<S: Into<String>>(self, store: S) -> Self {
        Self {
            store: Some(store.into()),
            ..self
        }
    }

    /// Sets the stores this one depends on (`.requires` lines).
    #[must_use]
    pub fn dependencies(self, dependencies: Vec<String>) -> Self {
        Self {
            dependencies,
            ..self
        }
    }

    #[must_use]
    pub fn have_locators(self, have_locators: bool) -> Self {
        Self {
            have_locators,
            ..self
        }
    }

    /// Marks dex filenames as relative to the application root rather than
    /// to the manifest's directory.
    #[must_use]
    pub fn root_relative(self, root_relative: bool) -> Self {
        Self {
            root_relative,
            ..self
        }
    }

    /// Appends a record for the container at `path`. When `hash` is `None`
    /// the container is read from disk and hashed now.
    pub fn add_dex<P: AsRef<Path>>(
        &mut self,
        path: P,
        canary_class: String,
        hash: Option<String>,
    ) -> StoreResult<()> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                StoreError::Format(format!("{path:?} has no UTF-8 file name for the manifest"))
            })?
            .to_string();
        let sha1 = match hash {
            Some(hash) => hash,
            None => sha1_hex(&fs::read(path)?),
        };
        log::debug!("manifest: {filename} {sha1} {canary_class}");
        self.dexen.push(DexEntry {
            filename,
            sha1,
            canary_class,
        });
        Ok(())
    }

    #[must_use]
    pub fn entries(&self) -> &[DexEntry] {
        &self.dexen
    }

    /// Writes the manifest text to `path`, overwriting any existing file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> StoreResult<()> {
        log::trace!("writing dex metadata to {:?}", path.as_ref());
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl fmt::Display for DexMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(store) = &self.store {
            writeln!(f, ".id {store}")?;
        }
        for dependency in &self.dependencies {
            writeln!(f, ".requires {dependency}")?;
        }
        if self.root_relative {
            writeln!(f, ".root_relative")?;
        }
        if self.have_locators {
            writeln!(f, ".locators")?;
        }
        for dex in &self.dexen {
            writeln!(f, "{} {} {}", dex.filename, dex.sha1, dex.canary_class)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_of_known_input() {
        assert_eq!(sha1_hex(b"abc"), "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn locators_then_record() {
        let hash = "a".repeat(40);
        let mut metadata = DexMetadata::new().have_locators(true);
        metadata
            .add_dex(
                "classes2.dex.jar",
                "secondary.dex01.Canary".to_string(),
                Some(hash.clone()),
            )
            .unwrap();
        assert_eq!(
            metadata.to_string(),
            format!(".locators\nclasses2.dex.jar {hash} secondary.dex01.Canary\n")
        );
    }

    #[test]
    fn all_directives_in_order() {
        let mut metadata = DexMetadata::new()
            .store("dex")
            .dependencies(vec!["a".to_string(), "b".to_string()])
            .root_relative(true)
            .have_locators(true);
        metadata
            .add_dex("/x/y/one.dex", "p.dex01.Canary".to_string(), Some("11".into()))
            .unwrap();
        metadata
            .add_dex("two.dex", "p.dex02.Canary".to_string(), Some("22".into()))
            .unwrap();
        assert_eq!(
            metadata.to_string(),
            ".id dex\n.requires a\n.requires b\n.root_relative\n.locators\n\
             one.dex 11 p.dex01.Canary\ntwo.dex 22 p.dex02.Canary\n"
        );
    }

    #[test]
    fn hashes_from_disk_when_needed() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("secondary-1.dex.jar");
        fs::write(&path, b"abc").unwrap();

        let mut metadata = DexMetadata::new();
        metadata
            .add_dex(&path, "secondary.dex01.Canary".to_string(), None)
            .unwrap();
        assert_eq!(
            metadata.entries(),
            &[DexEntry {
                filename: "secondary-1.dex.jar".to_string(),
                sha1: "a9993e364706816aba3e25717850c26c9cd0d89d".to_string(),
                canary_class: "secondary.dex01.Canary".to_string(),
            }]
        );

        let out = tmp.path().join("metadata.txt");
        metadata.write(&out).unwrap();
        assert_eq!(
            fs::read_to_string(out).unwrap(),
            "secondary-1.dex.jar a9993e364706816aba3e25717850c26c9cd0d89d secondary.dex01.Canary\n"
        );
    }

    #[test]
    fn missing_container_fails() {
        let mut metadata = DexMetadata::new();
        assert!(metadata
            .add_dex("/does/not/exist.jar", "c".to_string(), None)
            .is_err());
        assert!(metadata.entries().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_file_name_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let mut metadata = DexMetadata::new();
        let path = Path::new(OsStr::from_bytes(b"classes\xff.dex"));
        assert!(matches!(
            metadata.add_dex(path, "c".to_string(), Some("11".into())),
            Err(StoreError::Format(_))
        ));
        assert!(metadata.entries().is_empty());
    }
}
