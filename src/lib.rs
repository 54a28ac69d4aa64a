//! Read-only lookups in the Linux mount table (`/proc/<pid>/mounts`).
//!
//! Every query reads and parses the table again; nothing is cached, so answers
//! reflect the table at the moment of the call.
//!
//! ```no_run
//! if let Some(proc_fs) = mntfinder::get_mount_point("/proc")? {
//!     println!("{} is mounted from {:?}", proc_fs.target().display(), proc_fs.source());
//!     assert!(proc_fs.is_mounted()?);
//! }
//! # Ok::<(), mntfinder::Error>(())
//! ```

mod error;
mod escape;
mod legacy;
mod mount_point;
mod parser;
mod path_arg;
mod query;
mod table;

pub use error::{Error, Result};
pub use legacy::LatchedMountPoint;
pub use mount_point::{Identity, MountPoint};
pub use parser::parse;
pub use path_arg::PathArg;
pub use query::{MountFilter, find_by_target};
pub use table::MountTable;

/// The mount in effect at `target` in the current process's table, if any.
pub fn get_mount_point<'a>(target: impl Into<PathArg<'a>>) -> Result<Option<MountPoint>> {
    MountTable::current().find(target)
}

/// Every entry of the current process's table, in kernel order.
pub fn get_all_mount_points() -> Result<Vec<MountPoint>> {
    MountTable::current().all()
}

/// Entries of the current process's table matching `filter`, in kernel order.
pub fn list_mount_points(filter: &MountFilter<'_>) -> Result<Vec<MountPoint>> {
    MountTable::current().list(filter)
}

/// Whether anything is mounted at `target` in the current process's table.
pub fn is_a_mount_point<'a>(target: impl Into<PathArg<'a>>) -> Result<bool> {
    MountTable::current().is_mount_point(target)
}
