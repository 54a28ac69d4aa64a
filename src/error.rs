use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Missing file, permission denied, or the process behind `/proc/<pid>` is gone
    #[error("mount table `{}` is unavailable: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed mount table at line {line}: {reason}")]
    MalformedTable { line: usize, reason: String },

    #[error("mount points are only ordered strictly; `<=` and `>=` are not supported")]
    UnsupportedOrdering,

    #[error("cannot resolve relative path: {0}")]
    CurrentDir(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedTable {
            line,
            reason: reason.into(),
        }
    }
}
