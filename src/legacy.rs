use crate::error::Result;
use crate::mount_point::{Identity, MountPoint};

/// Liveness check with the historical latching behavior.
///
/// Once a check finds the mount gone, every later check answers `false` without
/// reading the table again, even if the same filesystem is mounted back. While it
/// is still mounted, each check re-reads the table. Identity is target-only, as
/// it always was.
///
/// Only kept for callers relying on that behavior; new code should call
/// [`MountPoint::is_mounted`], which is never sticky.
#[derive(Debug, Clone)]
pub struct LatchedMountPoint {
    mount: MountPoint,
    gone: bool,
}

impl LatchedMountPoint {
    pub fn new(mount: MountPoint) -> Self {
        Self { mount, gone: false }
    }

    pub fn mount(&self) -> &MountPoint {
        &self.mount
    }

    pub fn is_mounted(&mut self) -> Result<bool> {
        if self.gone {
            return Ok(false);
        }

        let live = self.mount.is_mounted_with(Identity::Target)?;
        if !live {
            tracing::debug!(
                target_path = %self.mount.target().display(),
                "Mount gone, latching as unmounted"
            );
            self.gone = true;
        }
        Ok(live)
    }

    pub fn into_inner(self) -> MountPoint {
        self.mount
    }
}

impl From<MountPoint> for LatchedMountPoint {
    fn from(mount: MountPoint) -> Self {
        Self::new(mount)
    }
}
