//! Per-dex sidecar files recording `jar:<jar size> dex:<dex size>`.

use crate::errors::{StoreError, StoreResult};
use lazy_static::lazy_static;
use regex::bytes::Regex;
use std::fmt;
use std::fs;
use std::path::Path;

/// Byte sizes of a dex jar and of the dex it wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JarSizes {
    pub jar: u64,
    pub dex: u64,
}

impl fmt::Display for JarSizes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "jar:{} dex:{}", self.jar, self.dex)
    }
}

/// Extracts the jar size from raw sidecar content. Only the leading
/// `jar:<N>` is looked at; whatever follows is ignored, encoded or not.
#[must_use]
pub fn parse_jar_size(content: &[u8]) -> Option<u64> {
    lazy_static! {
        static ref RE: Regex =
            Regex::new(r"^jar:([0-9]+)").expect("failed to compile sidecar regex");
    }
    RE.captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|size| std::str::from_utf8(size.as_bytes()).ok())
        .and_then(|size| size.parse().ok())
}

/// Reads the jar size recorded in the sidecar at `path`.
pub fn read_jar_size<P: AsRef<Path>>(path: P) -> StoreResult<u64> {
    let path = path.as_ref();
    let content = fs::read(path)?;
    parse_jar_size(&content).ok_or_else(|| StoreError::BadSidecar {
        path: path.to_path_buf(),
        content: String::from_utf8_lossy(&content).into_owned(),
    })
}
