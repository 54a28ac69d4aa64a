use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;
use std::path::PathBuf;

use tracing::warn;

use crate::error::{Error, Result};
use crate::escape::unescape;
use crate::mount_point::MountPoint;
use crate::table::MountTable;

// `/proc/<pid>/mounts` format, one mount per line, six fields:
//     <source> <target> <fstype> <options> <dump> <pass>
// e.g. `/dev/sdc1 /media/USB\040DISK vfat rw,relatime,uid=1000 0 0`
// Fields are octal-escaped (see `escape.rs`), options are comma separated.
const FIELD_COUNT: usize = 6;

/// Parse a whole mount table into records, in table order.
///
/// Any malformed line fails the whole parse: a partial table could silently drop
/// the very mount a caller is asking about.
pub fn parse(content: &[u8], origin: &MountTable) -> Result<Vec<MountPoint>> {
    content
        .split(|&b| b == b'\n')
        .enumerate()
        .filter(|(_, line)| !line.trim_ascii().is_empty())
        .map(|(index, line)| {
            parse_line(line, index + 1, origin).inspect_err(|e| {
                warn!(%e, "Rejecting mount table `{}`", origin.path().display());
            })
        })
        .collect()
}

fn parse_line(line: &[u8], line_no: usize, origin: &MountTable) -> Result<MountPoint> {
    let fields: Vec<&[u8]> = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|field| !field.is_empty())
        .collect();

    let [source, target, fstype, options, dump, pass] = fields[..] else {
        return Err(Error::malformed(
            line_no,
            format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        ));
    };

    let field = |raw: &[u8]| unescape(raw).map_err(|reason| Error::malformed(line_no, reason));
    let text = |raw: &[u8], name: &str| {
        String::from_utf8(field(raw)?)
            .map_err(|_| Error::malformed(line_no, format!("{name} is not valid UTF-8")))
    };

    let source = OsString::from_vec(field(source)?);

    let target = field(target)?;
    if !target.starts_with(b"/") {
        return Err(Error::malformed(
            line_no,
            format!(
                "target `{}` is not an absolute path",
                String::from_utf8_lossy(&target)
            ),
        ));
    }
    let target = PathBuf::from(OsString::from_vec(target));

    let fstype = text(fstype, "filesystem type")?;

    // Split before unescaping: an escaped comma belongs to its option value
    let options = options
        .split(|&b| b == b',')
        .map(|option| text(option, "mount option"))
        .collect::<Result<Vec<String>>>()?;

    // Dump frequency and fsck pass are validated, never exposed
    check_number(dump, "dump frequency", line_no)?;
    check_number(pass, "fsck pass number", line_no)?;

    Ok(MountPoint::new(source, target, fstype, options, origin.clone()))
}

fn check_number(raw: &[u8], name: &str, line_no: usize) -> Result<()> {
    std::str::from_utf8(raw)
        .ok()
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .map(|_| ())
        .ok_or_else(|| {
            Error::malformed(
                line_no,
                format!("invalid {name} `{}`", String::from_utf8_lossy(raw)),
            )
        })
}
