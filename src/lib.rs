//! # thumbcache
//!
//! On-demand image thumbnails backed by a flat, deterministic on-disk cache.
//!
//! A thumbnail request names a source image and a target size. The cache
//! filename is derived from the source's slug, the size and a fingerprint of
//! the source's base filename, so the same request always lands on the same
//! file. On a miss the source is decoded, fitted to the box and written to the
//! cache; on a hit the existing path is returned untouched.
//!
//! ## Architecture
//!
//! - [`cache`] - Cache naming (slug, fingerprint, key) and invalidation
//! - [`mod@format`] - Content-based JPEG/PNG detection
//! - [`thumbnail`] - Thumbnail service and the image-processing collaborator
//! - [`config`] - Library configuration and CLI types
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use thumbcache::{ThumbConfig, ThumbnailService};
//!
//! let service = ThumbnailService::with_default_processor(
//!     ThumbConfig::new("storage/images/cache").with_jpeg_quality(75),
//! )?;
//!
//! let thumb = service.make("images/photo.jpg", 800, None)?;
//! assert_eq!(thumb.height, 450);
//!
//! // Drop every size of this photo, then everything else
//! service.flush(Some(Path::new("images/photo.jpg")));
//! service.flush(None);
//! # Ok::<(), thumbcache::ThumbError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod format;
pub mod thumbnail;

// Re-export commonly used types
pub use cache::{
    build_name, effective_height, fingerprint, sanitize, CacheInvalidator, FlushFailure,
    FlushReport,
};
pub use config::{Cli, Command, FlushArgs, OutputFormat, SizeArgs, ThumbConfig};
pub use error::{ProcessingError, ThumbError};
pub use format::{detect_file_format, SourceFormat};
pub use thumbnail::{
    cache_name, FitOptions, ImageCrateProcessor, ImageProcessor, Thumbnail, ThumbnailService,
    DEFAULT_JPEG_QUALITY,
};
