// Mount-table field escaping
// The kernel writes fields through `mangle()`/`seq_escape()`: a byte that would break the
// line format becomes a backslash followed by exactly three octal digits,
// e.g. `/media/USB\040DISK` for `/media/USB DISK`.
// A bare backslash never appears unescaped (it is written as `\134`).

use std::fmt::Write;

// Bytes the kernel always escapes in the `source`, `target` and `fstype` fields
const SPECIAL: &[u8] = b" \t\n\\";

/// Decode the octal escapes of a single field.
///
/// Returns the reason as text on failure so the caller can attach the line number.
pub fn unescape(field: &[u8]) -> Result<Vec<u8>, String> {
    let mut out = Vec::with_capacity(field.len());
    let mut i = 0;

    while i < field.len() {
        if field[i] != b'\\' {
            out.push(field[i]);
            i += 1;
            continue;
        }

        let digits = field
            .get(i + 1..i + 4)
            .filter(|d| d.iter().all(|b| (b'0'..=b'7').contains(b)))
            .ok_or_else(|| {
                format!(
                    "invalid escape sequence in `{}`",
                    String::from_utf8_lossy(field)
                )
            })?;

        // Three octal digits reach 0o777, a byte only holds 0o377
        let value = digits
            .iter()
            .fold(0u16, |acc, d| acc * 8 + u16::from(d - b'0'));
        let byte = u8::try_from(value).map_err(|_| {
            format!(
                "escape `\\{}` is out of byte range",
                String::from_utf8_lossy(digits)
            )
        })?;

        out.push(byte);
        i += 4;
    }

    Ok(out)
}

/// Encode a field the way the kernel does, plus any byte in `extra`.
///
/// Non-printable and non-ASCII bytes are escaped as well so the result is
/// always plain text, whatever the path encoding was.
pub fn escape(field: &[u8], extra: &[u8]) -> String {
    let mut out = String::with_capacity(field.len());
    for &b in field {
        if SPECIAL.contains(&b) || extra.contains(&b) || !(0x21..=0x7e).contains(&b) {
            // Writing to a String cannot fail
            let _ = write!(out, "\\{b:03o}");
        } else {
            out.push(char::from(b));
        }
    }
    out
}
