//! Small helpers shared by the parsing and packing layers.

use adler2::adler32_slice;
use encoding_rs::Encoding;
use ripemd::{Digest, Ripemd128};

use super::types::error::{Result, SnapshotError};

/// Number of lines in a file's content.
///
/// Every `\n` ends a line; a final line without a terminator still counts.
pub fn line_count(bytes: &[u8]) -> u64 {
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count() as u64;
    if bytes.last().is_some_and(|&b| b != b'\n') {
        newlines + 1
    } else {
        newlines
    }
}

/// Resolves an encoding label such as `utf-8`, `latin1` or `gbk`.
///
/// Header lines are located byte-wise on `\n`, so only ASCII-compatible
/// encodings can be used to decode paths.
pub fn parse_encoding(label: &str) -> Result<&'static Encoding> {
    match Encoding::for_label(label.trim().as_bytes()) {
        Some(encoding) if encoding.is_ascii_compatible() => Ok(encoding),
        _ => Err(SnapshotError::UnknownEncoding(label.to_string())),
    }
}

/// Adler-32 checksum of a fragment's content.
pub fn checksum(bytes: &[u8]) -> u32 {
    adler32_slice(bytes)
}

/// RIPEMD-128 digest of a fragment's content.
pub fn digest(bytes: &[u8]) -> [u8; 16] {
    Ripemd128::digest(bytes).into()
}

/// Hex form of [`digest`].
pub fn digest_hex(bytes: &[u8]) -> String {
    hex::encode(digest(bytes))
}
