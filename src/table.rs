use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libc::pid_t;
use tracing::debug;

use crate::error::{Error, Result};
use crate::mount_point::{Identity, MountPoint};
use crate::parser;
use crate::path_arg::PathArg;
use crate::query::{self, MountFilter};

/// Which mount table to read.
///
/// A `MountTable` is only a location: every query opens, reads and parses the
/// file again, so answers always reflect the table at the moment of the call.
/// Nothing read from it is ever kept around.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MountTable {
    path: Arc<Path>,
}

impl MountTable {
    /// The calling process's own table, `/proc/self/mounts`.
    pub fn current() -> Self {
        Self::from_path("/proc/self/mounts")
    }

    /// The table seen by another process, `/proc/<pid>/mounts`.
    pub fn for_pid(pid: pid_t) -> Self {
        Self::from_path(format!("/proc/{pid}/mounts"))
    }

    /// Any file in the `/proc/mounts` format.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::from(path.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse a fresh snapshot, in kernel order.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn snapshot(&self) -> Result<Vec<MountPoint>> {
        let content = fs::read(&self.path).map_err(|source| Error::SourceUnavailable {
            path: self.path.to_path_buf(),
            source,
        })?;
        debug!("Read {} bytes from `{}`", content.len(), self.path.display());

        let snapshot = parser::parse(&content, self)?;
        debug!("Successfully parsed {} mount entries", snapshot.len());
        Ok(snapshot)
    }

    /// The effective mount at `target`, i.e. the last matching entry.
    pub fn find<'a>(&self, target: impl Into<PathArg<'a>>) -> Result<Option<MountPoint>> {
        let target = target.into().normalized()?;
        let snapshot = self.snapshot()?;
        Ok(query::find_by_target(&snapshot, &target).cloned())
    }

    pub fn all(&self) -> Result<Vec<MountPoint>> {
        self.snapshot()
    }

    /// Every entry satisfying `filter`, in table order.
    pub fn list(&self, filter: &MountFilter<'_>) -> Result<Vec<MountPoint>> {
        let criteria = filter.resolve()?;
        let snapshot = self.snapshot()?;
        Ok(query::filter_snapshot(snapshot, &criteria))
    }

    pub fn is_mount_point<'a>(&self, target: impl Into<PathArg<'a>>) -> Result<bool> {
        Ok(self.find(target)?.is_some())
    }

    /// Like [`MountTable::is_mount_point`], but the effective mount at `target`
    /// must also satisfy `filter`.
    pub fn is_mount_point_matching<'a>(
        &self,
        target: impl Into<PathArg<'a>>,
        filter: &MountFilter<'_>,
    ) -> Result<bool> {
        let criteria = filter.resolve()?;
        Ok(self
            .find(target)?
            .is_some_and(|mount| criteria.matches(&mount)))
    }

    /// Whether `mount` is still the effective mount at its target in this table.
    pub fn is_live(&self, mount: &MountPoint, identity: Identity) -> Result<bool> {
        let current = self.find(mount)?;
        let live = current.is_some_and(|current| identity.matches(mount, &current));
        tracing::trace!(target_path = %mount.target().display(), live, "Re-evaluated mount liveness");
        Ok(live)
    }
}
