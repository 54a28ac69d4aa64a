use std::os::unix::ffi::OsStrExt;

use crate::error::Result;
use crate::mount_point::MountPoint;
use crate::path_arg::PathArg;

/// Exact-match criteria for listing mount points.
///
/// Unset criteria match everything, so `MountFilter::new()` selects the whole table.
#[derive(Debug, Clone, Copy, Default)]
pub struct MountFilter<'a> {
    source: Option<PathArg<'a>>,
    target: Option<PathArg<'a>>,
    fstype: Option<&'a str>,
}

impl<'a> MountFilter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(mut self, source: impl Into<PathArg<'a>>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn target(mut self, target: impl Into<PathArg<'a>>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn fstype(mut self, fstype: &'a str) -> Self {
        self.fstype = Some(fstype);
        self
    }

    pub fn matches(&self, mount: &MountPoint) -> Result<bool> {
        Ok(self.resolve()?.matches(mount))
    }

    // The target is normalized once per query, not once per entry
    pub(crate) fn resolve(&self) -> Result<Criteria<'a>> {
        Ok(Criteria {
            source: self.source.map(|source| source.as_bytes()),
            target: self.target.map(|target| target.normalized()).transpose()?,
            fstype: self.fstype,
        })
    }
}

#[derive(Debug)]
pub(crate) struct Criteria<'a> {
    source: Option<&'a [u8]>,
    target: Option<Vec<u8>>,
    fstype: Option<&'a str>,
}

impl Criteria<'_> {
    pub(crate) fn matches(&self, mount: &MountPoint) -> bool {
        if let Some(source) = self.source {
            if mount.source().as_bytes() != source {
                return false;
            }
        }
        if let Some(target) = &self.target {
            if mount.target().as_os_str().as_bytes() != target.as_slice() {
                return false;
            }
        }
        if let Some(fstype) = self.fstype {
            if mount.fstype() != fstype {
                return false;
            }
        }
        true
    }
}

/// Last entry whose target equals `target` (already normalized).
///
/// Later lines stack on earlier ones, so the last match is the mount in effect.
pub fn find_by_target<'s>(snapshot: &'s [MountPoint], target: &[u8]) -> Option<&'s MountPoint> {
    snapshot
        .iter()
        .rev()
        .find(|mount| mount.target().as_os_str().as_bytes() == target)
}

pub(crate) fn filter_snapshot(
    snapshot: Vec<MountPoint>,
    criteria: &Criteria<'_>,
) -> Vec<MountPoint> {
    snapshot
        .into_iter()
        .filter(|mount| criteria.matches(mount))
        .collect()
}
