//! Source fingerprints.
//!
//! The fingerprint is a CRC-32 of the source's *base filename*, not of its
//! bytes. Two sources named `photo.jpg` in different directories share a
//! fingerprint, and rewriting a source in place keeps its cache entries.

use super::sanitize::base_name;

/// Length of a rendered fingerprint in characters.
pub const FINGERPRINT_LEN: usize = 8;

/// Fingerprint the base filename of `path` as 8 lowercase hex digits.
pub fn fingerprint(path: &str) -> String {
    let checksum = crc32fast::hash(base_name(path).as_bytes());
    hex::encode(checksum.to_be_bytes())
}
