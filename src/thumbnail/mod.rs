//! Thumbnail service layer.
//!
//! # Components
//!
//! - [`ThumbnailService`]: main entry point, lookup-or-generate against the
//!   cache directory
//! - [`ImageProcessor`]: seam to the image library (load, fit and save)
//! - [`ImageCrateProcessor`]: default processor built on the `image` crate
//! - [`Thumbnail`]: result of a request (path, cache hit, format, size)

mod processor;
mod service;

pub use processor::{
    clamp_quality, crop_to_aspect, is_valid_quality, FitOptions, ImageCrateProcessor,
    ImageProcessor, DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use service::{cache_name, Thumbnail, ThumbnailService};
