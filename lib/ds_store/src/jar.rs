//! Single-dex jar containers.
//!
//! Legacy secondary dex layouts wrap each dex in its own zip archive holding
//! a `classes.dex` entry and a minimal jar manifest.

use crate::errors::{StoreError, StoreResult};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Entry name of the dex inside a dex jar.
pub const DEX_ENTRY: &str = "classes.dex";

/// Entry name of the jar manifest inside a dex jar.
pub const MANIFEST_ENTRY: &str = "/META-INF/MANIFEST.MF";

const MANIFEST_CONTENT: &[u8] =
    b"Manifest-Version: 1.0\nDex-Location: classes.dex\nCreated-By: dexstore\n\n";

/// Extracts the only dex entry of the jar at `jar_path` into `dex_path`.
///
/// Entries are selected by their name ending in `dex`; the jar must contain
/// exactly one of them.
pub fn extract_single_dex<P: AsRef<Path>, Q: AsRef<Path>>(
    jar_path: P,
    dex_path: Q,
) -> StoreResult<()> {
    let (jar_path, dex_path) = (jar_path.as_ref(), dex_path.as_ref());
    log::trace!("extracting dex from {jar_path:?} to {dex_path:?}");

    let mut jar = ZipArchive::new(File::open(jar_path)?)?;
    let dexfiles: Vec<String> = jar
        .file_names()
        .filter(|name| name.ends_with("dex"))
        .map(String::from)
        .collect();
    if dexfiles.len() != 1 {
        return Err(StoreError::Format(format!(
            "expected a single dex file in {jar_path:?}, found {}",
            dexfiles.len()
        )));
    }

    let mut entry = jar.by_name(&dexfiles[0])?;
    let mut output = File::create(dex_path)?;
    io::copy(&mut entry, &mut output)?;
    Ok(())
}

/// Wraps the dex at `dex_path` in a new jar at `jar_path`, stored without
/// compression.
pub fn pack_single_dex<P: AsRef<Path>, Q: AsRef<Path>>(
    jar_path: P,
    dex_path: Q,
) -> StoreResult<()> {
    pack_single_dex_with(jar_path, dex_path, CompressionMethod::Stored)
}

/// Same as [`pack_single_dex`], with an explicit compression method for the
/// dex entry.
pub fn pack_single_dex_with<P: AsRef<Path>, Q: AsRef<Path>>(
    jar_path: P,
    dex_path: Q,
    compression: CompressionMethod,
) -> StoreResult<()> {
    let (jar_path, dex_path) = (jar_path.as_ref(), dex_path.as_ref());
    log::trace!("packing {dex_path:?} into {jar_path:?}");

    let mut jar = ZipWriter::new(File::create(jar_path)?);
    let options = FileOptions::default().last_modified_time(DateTime::default());

    jar.start_file(DEX_ENTRY, options.compression_method(compression))?;
    io::copy(&mut File::open(dex_path)?, &mut jar)?;

    jar.start_file(
        MANIFEST_ENTRY,
        options.compression_method(CompressionMethod::Stored),
    )?;
    jar.write_all(MANIFEST_CONTENT)?;

    jar.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Read;

    fn zip_with_entries(path: &Path, names: &[&str]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for name in names {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(name.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn pack_then_extract() {
        let tmp = tempfile::tempdir().unwrap();
        let dex = tmp.path().join("secondary-1.dex");
        let jar = tmp.path().join("secondary-1.dex.jar");
        let content: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        fs::write(&dex, &content).unwrap();

        pack_single_dex(&jar, &dex).unwrap();

        let mut archive = ZipArchive::new(File::open(&jar).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        {
            let entry = archive.by_name(DEX_ENTRY).unwrap();
            assert_eq!(entry.compression(), CompressionMethod::Stored);
            assert_eq!(entry.size(), 1000);
        }
        let mut manifest = String::new();
        archive
            .by_name(MANIFEST_ENTRY)
            .unwrap()
            .read_to_string(&mut manifest)
            .unwrap();
        assert_eq!(
            manifest,
            "Manifest-Version: 1.0\nDex-Location: classes.dex\nCreated-By: dexstore\n\n"
        );

        let out = tmp.path().join("out.dex");
        extract_single_dex(&jar, &out).unwrap();
        assert_eq!(fs::read(out).unwrap(), content);
    }

    #[test]
    fn packing_is_deterministic() {
        let tmp = tempfile::tempdir().unwrap();
        let dex = tmp.path().join("a.dex");
        fs::write(&dex, b"dex\n035\0payload").unwrap();
        pack_single_dex(tmp.path().join("1.jar"), &dex).unwrap();
        pack_single_dex(tmp.path().join("2.jar"), &dex).unwrap();
        assert_eq!(
            fs::read(tmp.path().join("1.jar")).unwrap(),
            fs::read(tmp.path().join("2.jar")).unwrap()
        );
    }

    #[test]
    fn deflated_dex_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let dex = tmp.path().join("a.dex");
        let jar = tmp.path().join("a.dex.jar");
        fs::write(&dex, vec![0u8; 4096]).unwrap();
        pack_single_dex_with(&jar, &dex, CompressionMethod::Deflated).unwrap();

        let mut archive = ZipArchive::new(File::open(&jar).unwrap()).unwrap();
        assert_eq!(
            archive.by_name(DEX_ENTRY).unwrap().compression(),
            CompressionMethod::Deflated
        );
        let out = tmp.path().join("b.dex");
        extract_single_dex(&jar, &out).unwrap();
        assert_eq!(fs::read(out).unwrap(), vec![0u8; 4096]);
    }

    #[test]
    fn no_dex_entry_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let jar = tmp.path().join("empty.jar");
        zip_with_entries(&jar, &["META-INF/MANIFEST.MF"]);
        assert!(matches!(
            extract_single_dex(&jar, tmp.path().join("out.dex")),
            Err(StoreError::Format(_))
        ));
    }

    #[test]
    fn several_dex_entries_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let jar = tmp.path().join("two.jar");
        zip_with_entries(&jar, &["classes.dex", "classes2.dex"]);
        assert!(matches!(
            extract_single_dex(&jar, tmp.path().join("out.dex")),
            Err(StoreError::Format(_))
        ));
        assert!(!tmp.path().join("out.dex").exists());
    }

    #[test]
    fn not_a_zip() {
        let tmp = tempfile::tempdir().unwrap();
        let jar = tmp.path().join("bad.jar");
        fs::write(&jar, b"garbage").unwrap();
        assert!(matches!(
            extract_single_dex(&jar, tmp.path().join("out.dex")),
            Err(StoreError::Zip(_))
        ));
    }
}
