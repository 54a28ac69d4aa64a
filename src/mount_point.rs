use std::cmp::Ordering;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::escape::escape;
use crate::table::MountTable;

/// One entry of a mount table, as read at a single point in time.
///
/// A `MountPoint` is an immutable snapshot value: it owns nothing on the system
/// and may go stale as soon as it is built. Use [`MountPoint::is_mounted`] to ask
/// whether it still describes the live table.
///
/// Equality and hashing cover `source`, `target`, `fstype` and `options`.
/// Ordering only looks at `target`, so the type deliberately does not implement
/// `PartialOrd`: use [`MountPoint::is_before`] / [`MountPoint::is_after`] for
/// strict comparisons and [`MountPoint::cmp_target`] to sort.
#[derive(Debug, Clone)]
pub struct MountPoint {
    source: OsString,
    target: PathBuf,
    fstype: String,
    options: Vec<String>,
    // Where the entry was read from, consulted again by liveness checks
    origin: MountTable,
}

/// How strictly a liveness check identifies "the same mount".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Identity {
    /// Anything mounted at the same target counts.
    Target,
    /// Same target, source and filesystem type. Options may change (remount).
    #[default]
    Filesystem,
    /// All four fields must still match.
    Exact,
}

impl Identity {
    // `current` is already known to sit at the same target
    pub(crate) fn matches(self, recorded: &MountPoint, current: &MountPoint) -> bool {
        match self {
            Identity::Target => true,
            Identity::Filesystem => {
                recorded.source == current.source && recorded.fstype == current.fstype
            }
            Identity::Exact => recorded == current,
        }
    }
}

impl MountPoint {
    pub(crate) fn new(
        source: OsString,
        target: PathBuf,
        fstype: String,
        options: Vec<String>,
        origin: MountTable,
    ) -> Self {
        Self {
            source,
            target,
            fstype,
            options,
            origin,
        }
    }

    /// Device or pseudo-device name, e.g. `/dev/sda1` or `proc`.
    pub fn source(&self) -> &OsStr {
        &self.source
    }

    /// Absolute path the filesystem is mounted on.
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn fstype(&self) -> &str {
        &self.fstype
    }

    /// Mount options in kernel order, duplicates included.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// The table this entry was read from.
    pub fn table(&self) -> &MountTable {
        &self.origin
    }

    /// The mount point as a path, for APIs taking `&Path`.
    pub fn as_path(&self) -> &Path {
        &self.target
    }

    pub fn cmp_target(&self, other: &Self) -> Ordering {
        self.target.cmp(&other.target)
    }

    /// `self < other`, by target only.
    pub fn is_before(&self, other: &Self) -> bool {
        self.cmp_target(other) == Ordering::Less
    }

    /// `self > other`, by target only.
    pub fn is_after(&self, other: &Self) -> bool {
        self.cmp_target(other) == Ordering::Greater
    }

    /// `self <= other` is never answered: equality involves all four fields while
    /// ordering involves only the target, so the combination has no meaning.
    pub fn at_most(&self, _other: &Self) -> Result<bool> {
        Err(Error::UnsupportedOrdering)
    }

    /// See [`MountPoint::at_most`].
    pub fn at_least(&self, _other: &Self) -> Result<bool> {
        Err(Error::UnsupportedOrdering)
    }

    /// Whether this exact filesystem is still mounted at `target`.
    ///
    /// Re-reads the table this entry came from on every call; nothing is cached.
    /// Identity is [`Identity::Filesystem`]: a different filesystem mounted on
    /// the same path afterwards does not count.
    pub fn is_mounted(&self) -> Result<bool> {
        self.is_mounted_with(Identity::default())
    }

    pub fn is_mounted_with(&self, identity: Identity) -> Result<bool> {
        self.origin.is_live(self, identity)
    }
}

impl PartialEq for MountPoint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.fstype == other.fstype
            && self.options == other.options
    }
}

impl Eq for MountPoint {}

impl Hash for MountPoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.target.hash(state);
        self.fstype.hash(state);
        self.options.hash(state);
    }
}

impl AsRef<Path> for MountPoint {
    fn as_ref(&self) -> &Path {
        &self.target
    }
}

// Renders a mount-table line, e.g. `proc /proc proc rw,nosuid 0 0`
impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = self
            .options
            .iter()
            .map(|option| escape(option.as_bytes(), b","))
            .collect::<Vec<_>>()
            .join(",");

        write!(
            f,
            "{} {} {} {} 0 0",
            escape(self.source.as_bytes(), b""),
            escape(self.target.as_os_str().as_bytes(), b""),
            escape(self.fstype.as_bytes(), b""),
            options,
        )
    }
}
