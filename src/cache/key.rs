//! Cache entry naming.
//!
//! A cache entry name is built from four parts:
//!
//! ```text
//! {slug}{-width}{xheight}-{fingerprint}{ext}
//!  photo  -800    x450   -1acfe4c4     .jpg
//! ```
//!
//! The width segment is left out when the width is zero, the height segment
//! when the height is zero. The extension follows the detected source format.

use crate::format::SourceFormat;

use super::fingerprint::fingerprint;
use super::sanitize::sanitize;

/// Aspect ratio used to derive a missing height (≈ 16:9).
pub const DEFAULT_ASPECT_RATIO: f64 = 1.777;

/// Height used when the caller gives none (or zero): `round(width / 1.777)`.
pub fn effective_height(width: u32, height: Option<u32>) -> u32 {
    match height {
        Some(h) if h > 0 => h,
        _ => (f64::from(width) / DEFAULT_ASPECT_RATIO).round() as u32,
    }
}

/// Build the cache filename for a source image at the given size.
pub fn build_name(source_path: &str, format: SourceFormat, width: u32, height: u32) -> String {
    let mut name = sanitize(source_path);

    if width > 0 {
        name.push('-');
        name.push_str(&width.to_string());
    }
    if height > 0 {
        name.push('x');
        name.push_str(&height.to_string());
    }

    name.push('-');
    name.push_str(&fingerprint(source_path));
    name.push_str(format.extension());
    name
}
