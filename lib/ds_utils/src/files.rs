//! Filesystem helpers: recursive globbing and file moves/copies into
//! directories.

use crate::errors::{UtilsError, UtilsResult};
use globset::Glob;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collects files under `root` whose file name matches the
/// glob `pattern` (e.g. `*.dex.jar`). Returned paths are rooted at `root`,
/// sorted for reproducibility; callers must not rely on that order for
/// anything meaningful.
pub fn abs_glob<P: AsRef<Path>>(root: P, pattern: &str) -> UtilsResult<Vec<PathBuf>> {
    let matcher = Glob::new(pattern)?.compile_matcher();
    let mut paths = Vec::new();
    for entry in WalkDir::new(root.as_ref()) {
        let entry = entry?;
        if entry.file_type().is_file() && matcher.is_match(entry.file_name()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Moves `src` to `dst`, falling back to copy-then-delete when a plain
/// rename is not possible (e.g. across filesystems).
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dst: Q) -> UtilsResult<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    log::trace!("moving {src:?} to {dst:?}");
    if fs::rename(src, dst).is_err() {
        fs::copy(src, dst)?;
        fs::remove_file(src)?;
    }
    Ok(())
}

/// Moves `src` into directory `dir`, keeping its file name. Returns the new
/// path. Fails with [`io::ErrorKind::AlreadyExists`] if `dir` already holds
/// a file of that name.
pub fn move_into<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dir: Q) -> UtilsResult<PathBuf> {
    let dst = dir.as_ref().join(file_name(src.as_ref())?);
    if dst.exists() {
        return Err(UtilsError::IO(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("destination path {dst:?} already exists"),
        )));
    }
    move_file(src, &dst)?;
    Ok(dst)
}

/// Copies `src` into directory `dir`, keeping its file name. Returns the
/// path of the copy.
pub fn copy_into<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dir: Q) -> UtilsResult<PathBuf> {
    let src = src.as_ref();
    let dst = dir.as_ref().join(file_name(src)?);
    log::trace!("copying {src:?} to {dst:?}");
    fs::copy(src, &dst)?;
    Ok(dst)
}

/// Size in bytes of the file at `path`.
pub fn file_size<P: AsRef<Path>>(path: P) -> UtilsResult<u64> {
    Ok(fs::metadata(path)?.len())
}

fn file_name(path: &Path) -> UtilsResult<&std::ffi::OsStr> {
    path.file_name().ok_or_else(|| {
        UtilsError::IO(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path:?} has no file name"),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_is_recursive() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("classes.dex"), b"x").unwrap();
        fs::write(tmp.path().join("a/b/classes2.dex"), b"y").unwrap();
        fs::write(tmp.path().join("a/classes2.dex.jar"), b"z").unwrap();

        let found = abs_glob(tmp.path(), "*.dex").unwrap();
        assert_eq!(
            found,
            vec![
                tmp.path().join("a/b/classes2.dex"),
                tmp.path().join("classes.dex"),
            ]
        );
        assert_eq!(abs_glob(tmp.path(), "*.dex.jar").unwrap().len(), 1);
    }

    #[test]
    fn move_and_copy_into_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("dest");
        fs::create_dir(&dir).unwrap();
        let src = tmp.path().join("f.txt");
        fs::write(&src, b"hello").unwrap();

        let copied = copy_into(&src, &dir).unwrap();
        assert_eq!(copied, dir.join("f.txt"));
        assert!(src.is_file());

        fs::remove_file(&copied).unwrap();
        let moved = move_into(&src, &dir).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read(moved).unwrap(), b"hello");
        assert_eq!(file_size(dir.join("f.txt")).unwrap(), 5);
    }

    #[test]
    fn move_into_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("dest");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("classes2.dex"), b"first").unwrap();
        let src = tmp.path().join("classes2.dex");
        fs::write(&src, b"second").unwrap();

        match move_into(&src, &dir) {
            Err(UtilsError::IO(err)) => assert_eq!(err.kind(), io::ErrorKind::AlreadyExists),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(fs::read(dir.join("classes2.dex")).unwrap(), b"first");
        assert_eq!(fs::read(&src).unwrap(), b"second");
    }

    #[test]
    fn missing_source_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(move_into(tmp.path().join("nope"), tmp.path()).is_err());
    }
}
