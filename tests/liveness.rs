use std::fs;
use std::path::Path;

use mntfinder::{Identity, LatchedMountPoint, MountFilter, MountTable};
use tempfile::TempDir;

const BASE: &str = "\
/dev/sda2 / ext4 rw,relatime 0 1
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
";
const USB: &str = "/dev/sdc1 /media/USB\\040DISK vfat rw,relatime 0 0\n";

struct Fixture {
    _dir: TempDir,
    table: MountTable,
}

impl Fixture {
    fn new(content: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let table = MountTable::from_path(dir.path().join("mounts"));
        let fixture = Self { _dir: dir, table };
        fixture.write(content);
        fixture
    }

    fn write(&self, content: &str) {
        fs::write(self.table.path(), content).unwrap();
    }
}

#[test]
fn liveness_follows_the_live_table() {
    let fixture = Fixture::new(&format!("{BASE}{USB}"));
    let usb = fixture.table.find("/media/USB DISK").unwrap().unwrap();
    assert_eq!(usb.target(), Path::new("/media/USB DISK"));
    assert!(usb.is_mounted().unwrap());

    fixture.write(BASE);
    assert!(!usb.is_mounted().unwrap());
    assert!(!usb.is_mounted().unwrap());

    fixture.write(&format!("{BASE}{USB}"));
    assert!(usb.is_mounted().unwrap());
}

#[test]
fn latched_check_stays_unmounted() {
    let fixture = Fixture::new(&format!("{BASE}{USB}"));
    let usb = fixture.table.find("/media/USB DISK").unwrap().unwrap();
    let mut latched = LatchedMountPoint::new(usb.clone());
    assert!(latched.is_mounted().unwrap());

    fixture.write(BASE);
    assert!(!latched.is_mounted().unwrap());

    fixture.write(&format!("{BASE}{USB}"));
    assert!(!latched.is_mounted().unwrap());
    assert!(usb.is_mounted().unwrap());
}

#[test]
fn latched_check_does_not_read_once_tripped() {
    let fixture = Fixture::new(&format!("{BASE}{USB}"));
    let usb = fixture.table.find("/media/USB DISK").unwrap().unwrap();
    let mut latched = LatchedMountPoint::from(usb);

    fixture.write(BASE);
    assert!(!latched.is_mounted().unwrap());

    // A vanished table would be an error for a dynamic check
    fs::remove_file(fixture.table.path()).unwrap();
    assert!(!latched.is_mounted().unwrap());
    assert!(latched.mount().is_mounted().is_err());
}

#[test]
fn replacement_filesystem_is_not_the_same_mount() {
    let fixture = Fixture::new(&format!("{BASE}{USB}"));
    let usb = fixture.table.find("/media/USB DISK").unwrap().unwrap();

    fixture.write(&format!(
        "{BASE}/dev/sdd1 /media/USB\\040DISK exfat rw 0 0\n"
    ));
    assert!(!usb.is_mounted().unwrap());
    assert!(!usb.is_mounted_with(Identity::Exact).unwrap());
    assert!(usb.is_mounted_with(Identity::Target).unwrap());
}

#[test]
fn remount_with_new_options_keeps_filesystem_identity() {
    let fixture = Fixture::new(&format!("{BASE}{USB}"));
    let usb = fixture.table.find("/media/USB DISK").unwrap().unwrap();

    fixture.write(&format!(
        "{BASE}/dev/sdc1 /media/USB\\040DISK vfat ro,relatime 0 0\n"
    ));
    assert!(usb.is_mounted().unwrap());
    assert!(!usb.is_mounted_with(Identity::Exact).unwrap());
}

#[test]
fn shadowing_mount_hides_the_one_below() {
    let fixture = Fixture::new(&format!("{BASE}{USB}"));
    let usb = fixture.table.find("/media/USB DISK").unwrap().unwrap();

    fixture.write(&format!(
        "{BASE}{USB}tmpfs /media/USB\\040DISK tmpfs rw 0 0\n"
    ));
    assert!(!usb.is_mounted().unwrap());
    let effective = fixture.table.find(&usb).unwrap().unwrap();
    assert_eq!(effective.fstype(), "tmpfs");

    let stacked = fixture
        .table
        .list(&MountFilter::new().target(&usb))
        .unwrap();
    assert_eq!(stacked.len(), 2);
    assert_eq!(stacked[0], usb);
}

#[test]
fn hash_survives_unmount() {
    use std::hash::{BuildHasher, RandomState};

    let fixture = Fixture::new(&format!("{BASE}{USB}"));
    let usb = fixture.table.find("/media/USB DISK").unwrap().unwrap();
    let state = RandomState::new();
    let before = state.hash_one(&usb);

    fixture.write(BASE);
    assert!(!usb.is_mounted().unwrap());
    assert_eq!(state.hash_one(&usb), before);
}

#[test]
fn each_query_sees_the_table_as_it_is_now() {
    let fixture = Fixture::new(BASE);
    assert!(!fixture.table.is_mount_point("/media/USB DISK").unwrap());

    fixture.write(&format!("{BASE}{USB}"));
    assert!(fixture.table.is_mount_point("/media/USB DISK").unwrap());
    assert_eq!(fixture.table.all().unwrap().len(), 3);
}
