use std::borrow::Cow;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::{Error, Result};
use crate::mount_point::MountPoint;

/// A path-like query argument.
///
/// POSIX paths are byte strings that need not be valid UTF-8, so lookups accept
/// either form and compare everything as bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathArg<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl<'a> PathArg<'a> {
    pub fn as_bytes(&self) -> &'a [u8] {
        match *self {
            PathArg::Text(text) => text.as_bytes(),
            PathArg::Bytes(bytes) => bytes,
        }
    }

    /// Absolute byte form used to compare against mount targets.
    ///
    /// Existing paths are canonicalized, so a symlink finds the mount behind it.
    /// Paths that do not exist are cleaned lexically instead.
    pub fn normalized(&self) -> Result<Vec<u8>> {
        let raw = self.as_bytes();
        let absolute: Cow<'_, [u8]> = if raw.starts_with(b"/") {
            Cow::Borrowed(raw)
        } else {
            let cwd = env::current_dir().map_err(Error::CurrentDir)?;
            let mut joined = cwd.into_os_string().into_vec();
            joined.push(b'/');
            joined.extend_from_slice(raw);
            Cow::Owned(joined)
        };
        match fs::canonicalize(OsStr::from_bytes(&absolute)) {
            Ok(resolved) => Ok(resolved.into_os_string().into_vec()),
            Err(e) => {
                trace!(%e, "Cleaning unresolvable path lexically");
                Ok(normalize_absolute(&absolute))
            }
        }
    }
}

// Collapse `//`, `.`, `..` and the trailing slash without touching the filesystem
// `..` at the root stays at the root, as the kernel does
fn normalize_absolute(path: &[u8]) -> Vec<u8> {
    let mut parts: Vec<&[u8]> = Vec::new();
    for part in path.split(|&b| b == b'/') {
        match part {
            b"" | b"." => {}
            b".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }

    if parts.is_empty() {
        return b"/".to_vec();
    }

    let mut out = Vec::with_capacity(path.len());
    for part in parts {
        out.push(b'/');
        out.extend_from_slice(part);
    }
    out
}

impl<'a> From<&'a str> for PathArg<'a> {
    fn from(value: &'a str) -> Self {
        PathArg::Text(value)
    }
}

impl<'a> From<&'a String> for PathArg<'a> {
    fn from(value: &'a String) -> Self {
        PathArg::Text(value)
    }
}

impl<'a> From<&'a [u8]> for PathArg<'a> {
    fn from(value: &'a [u8]) -> Self {
        PathArg::Bytes(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for PathArg<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        PathArg::Bytes(value)
    }
}

impl<'a> From<&'a Vec<u8>> for PathArg<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        PathArg::Bytes(value)
    }
}

impl<'a> From<&'a OsStr> for PathArg<'a> {
    fn from(value: &'a OsStr) -> Self {
        PathArg::Bytes(value.as_bytes())
    }
}

impl<'a> From<&'a Path> for PathArg<'a> {
    fn from(value: &'a Path) -> Self {
        PathArg::Bytes(value.as_os_str().as_bytes())
    }
}

impl<'a> From<&'a PathBuf> for PathArg<'a> {
    fn from(value: &'a PathBuf) -> Self {
        PathArg::Bytes(value.as_os_str().as_bytes())
    }
}

impl<'a> From<&'a MountPoint> for PathArg<'a> {
    fn from(value: &'a MountPoint) -> Self {
        PathArg::from(value.target())
    }
}
