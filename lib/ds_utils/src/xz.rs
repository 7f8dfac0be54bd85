//! Driver for the external `xz` command line tool.
//!
//! Compression and decompression block until the tool exits; any non-zero
//! exit status is reported as [`UtilsError::ToolFailed`]. The thread count
//! is only a hint forwarded to the tool.

use crate::errors::{UtilsError, UtilsResult};
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// `xz` invocation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xz {
    program: String,
    threads: u32,
    level: u32,
}

/// Default values match what the secondary dex loader was built against:
/// preset 6 with 6 threads.
impl Default for Xz {
    fn default() -> Self {
        Self {
            program: "xz".to_string(),
            threads: 6,
            level: 6,
        }
    }
}

impl Xz {
    #[must_use]
    pub fn program<S: Into<String>>(self, program: S) -> Self {
        Self {
            program: program.into(),
            ..self
        }
    }

    #[must_use]
    pub fn threads(self, threads: u32) -> Self {
        Self { threads, ..self }
    }

    #[must_use]
    pub fn level(self, level: u32) -> Self {
        Self { level, ..self }
    }

    /// Returns whether the configured program can be found.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.locate().is_ok()
    }

    /// Compresses `path` in place with a crc32 integrity check. `xz` removes
    /// the input and leaves `<path>.xz`, whose path is returned.
    pub fn compress_in_place<P: AsRef<Path>>(&self, path: P) -> UtilsResult<PathBuf> {
        let path = path.as_ref();
        log::debug!("xz-compressing {path:?} (level {})", self.level);
        let mut cmd = Command::new(self.locate()?);
        cmd.arg(format!("-z{}", self.level))
            .arg("--check=crc32")
            .arg(format!("--threads={}", self.threads))
            .arg(path);
        self.run(&mut cmd)?;

        let mut out = OsString::from(path.as_os_str());
        out.push(".xz");
        Ok(PathBuf::from(out))
    }

    /// Decompresses `src` into `dest`, leaving `src` untouched.
    pub fn decompress<P: AsRef<Path>, Q: AsRef<Path>>(&self, src: P, dest: Q) -> UtilsResult<()> {
        let (src, dest) = (src.as_ref(), dest.as_ref());
        log::debug!("xz-decompressing {src:?} into {dest:?}");
        let mut cmd = Command::new(self.locate()?);
        cmd.arg("-d")
            .arg(format!("--threads={}", self.threads))
            .stdin(Stdio::from(File::open(src)?))
            .stdout(Stdio::from(File::create(dest)?));
        self.run(&mut cmd)
    }

    fn locate(&self) -> UtilsResult<PathBuf> {
        which::which(&self.program).map_err(|_| UtilsError::ToolNotFound(self.program.clone()))
    }

    fn run(&self, cmd: &mut Command) -> UtilsResult<()> {
        let status = cmd.status()?;
        if !status.success() {
            return Err(UtilsError::ToolFailed {
                tool: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}
