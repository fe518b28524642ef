//! Format detection for source images.
//!
//! The format is resolved from the leading bytes of the file, never from its
//! extension. Only two raster formats are accepted:
//!
//! - **JPEG**: SOI marker followed by any marker (`FF D8 FF`)
//! - **PNG**: the 8-byte PNG signature
//!
//! Anything else is rejected with [`ThumbError::UnsupportedFormat`].

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ThumbError;

// =============================================================================
// SourceFormat
// =============================================================================

/// Detected source image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// JPEG / JFIF / EXIF
    Jpeg,

    /// Portable Network Graphics
    Png,
}

impl SourceFormat {
    /// MIME type of the format.
    pub const fn mime_type(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
        }
    }

    /// Extension (with leading dot) used for cache entries of this format.
    pub const fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => ".jpg",
            SourceFormat::Png => ".png",
        }
    }
}

// =============================================================================
// Format Detection
// =============================================================================

/// Bytes read from the start of the file for detection.
const SNIFF_BYTES: usize = 16;

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Detect the format of the file at `path` by reading its header.
///
/// # Errors
///
/// - [`ThumbError::NotFound`] if nothing exists at `path`
/// - [`ThumbError::UnsupportedFormat`] if the path is not a regular file or
///   its content is neither JPEG nor PNG
/// - [`ThumbError::Io`] if the header cannot be read
pub fn detect_file_format(path: &Path) -> Result<SourceFormat, ThumbError> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ThumbError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ThumbError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
    })?;

    if !metadata.is_file() {
        return Err(ThumbError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: "not a regular file".to_string(),
        });
    }

    let header = read_header(path).map_err(|e| ThumbError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    detect_format(&header).ok_or_else(|| ThumbError::UnsupportedFormat {
        path: path.to_path_buf(),
        reason: describe_unsupported(&header),
    })
}

/// Detect the format from the leading bytes of an image.
pub fn detect_format(header: &[u8]) -> Option<SourceFormat> {
    if is_jpeg_header(header) {
        Some(SourceFormat::Jpeg)
    } else if is_png_header(header) {
        Some(SourceFormat::Png)
    } else {
        None
    }
}

/// Check for the JPEG SOI marker.
pub fn is_jpeg_header(bytes: &[u8]) -> bool {
    bytes.starts_with(JPEG_MAGIC)
}

/// Check for the PNG signature.
pub fn is_png_header(bytes: &[u8]) -> bool {
    bytes.starts_with(PNG_MAGIC)
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(SNIFF_BYTES);
    File::open(path)?
        .take(SNIFF_BYTES as u64)
        .read_to_end(&mut header)?;
    Ok(header)
}

/// Build the rejection reason, naming other image formats when recognizable.
fn describe_unsupported(header: &[u8]) -> String {
    if header.is_empty() {
        return "file is empty".to_string();
    }

    match image::guess_format(header) {
        Ok(other) => format!(
            "{} is not supported, expected a JPEG or PNG image",
            other.to_mime_type()
        ),
        Err(_) => "content is not a JPEG or PNG image".to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
