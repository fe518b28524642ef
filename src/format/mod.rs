//! Source image format handling.
//!
//! Use [`detect::detect_file_format`] to identify a source image from its
//! content. Supported formats:
//!
//! - **JPEG**: cached as `.jpg`, re-encoded at the configured quality
//! - **PNG**: cached as `.png`

pub mod detect;

pub use detect::{detect_file_format, detect_format, is_jpeg_header, is_png_header, SourceFormat};
