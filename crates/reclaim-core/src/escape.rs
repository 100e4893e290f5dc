//! Path fields of the text protocol.
//!
//! A path is written with `/` separators and every byte that could break
//! the line format is escaped, so each path stays on one line and reads
//! back to the same bytes:
//!
//! - `\` becomes `\\`
//! - newline, carriage return and tab become `\n`, `\r` and `\t`
//! - other control characters and bytes that are not valid UTF-8 become
//!   `\xNN`
//!
//! Leading and trailing spaces are kept verbatim; the path is always the
//! last field on its line.

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

/// Encode a path for one protocol field.
pub fn encode_path(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        match component {
            Component::RootDir => {
                if !out.ends_with('/') {
                    out.push('/');
                }
            }
            other => push_escaped(&mut out, &os_bytes(other.as_os_str())),
        }
    }
    out
}

/// Decode a protocol field back into a path.
pub fn decode_path(text: &str) -> Result<PathBuf, String> {
    let mut bytes = Vec::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('\\') => bytes.push(b'\\'),
            Some('n') => bytes.push(b'\n'),
            Some('r') => bytes.push(b'\r'),
            Some('t') => bytes.push(b'\t'),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                let byte = (hex.len() == 2)
                    .then(|| u8::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .ok_or_else(|| format!("invalid escape \\x{hex}"))?;
                bytes.push(byte);
            }
            Some(other) => return Err(format!("invalid escape \\{other}")),
            None => return Err("dangling escape at end of path".to_string()),
        }
    }
    path_from_bytes(bytes)
}

/// Whether a path survives an encode/decode cycle unchanged.
pub fn round_trips(path: &Path) -> bool {
    decode_path(&encode_path(path)).is_ok_and(|back| back.as_path() == path)
}

fn push_escaped(out: &mut String, bytes: &[u8]) {
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if c.is_control() => {
                    let mut buf = [0u8; 4];
                    for b in c.encode_utf8(&mut buf).bytes() {
                        let _ = write!(out, "\\x{b:02x}");
                    }
                }
                c => out.push(c),
            }
        }
        for b in chunk.invalid() {
            let _ = write!(out, "\\x{b:02x}");
        }
    }
}

#[cfg(unix)]
fn os_bytes(s: &std::ffi::OsStr) -> std::borrow::Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;
    std::borrow::Cow::Borrowed(s.as_bytes())
}

#[cfg(not(unix))]
fn os_bytes(s: &std::ffi::OsStr) -> std::borrow::Cow<'_, [u8]> {
    std::borrow::Cow::Owned(s.to_string_lossy().into_owned().into_bytes())
}

#[cfg(unix)]
fn path_from_bytes(bytes: Vec<u8>) -> Result<PathBuf, String> {
    use std::os::unix::ffi::OsStringExt;
    Ok(PathBuf::from(std::ffi::OsString::from_vec(bytes)))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: Vec<u8>) -> Result<PathBuf, String> {
    String::from_utf8(bytes)
        .map(PathBuf::from)
        .map_err(|_| "path is not valid Unicode".to_string())
}
